//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use prosumer_engine::api::{AppState, router};
use prosumer_engine::config::ScenarioConfig;
use prosumer_engine::runner::{load_catalogs, run_day};
use prosumer_engine::sim::FlowSimulator;

/// Run the high-solar preset and return the API state.
fn build_api_state() -> Arc<AppState> {
    let scenario = ScenarioConfig::high_solar();
    let date = chrono::NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
    Arc::new(AppState {
        simulator: FlowSimulator::from_scenario(&scenario).unwrap(),
        catalogs: load_catalogs(&scenario).unwrap(),
        run: run_day(&scenario, date).unwrap(),
    })
}

async fn send(req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let app = router(build_api_state());
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn state_reports_the_integrated_run() {
    let (status, json) = send(get("/state")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["config"]["soc_model"], "integrated");
    assert_eq!(json["date"], "2024-06-21");
    assert!(json["totals"]["solar_kwh"].as_f64().unwrap() > 0.0);
    let score = json["metrics"]["overall_sustainability_score"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&score));
    assert!(json["gamification"]["level"]["rank"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn snapshot_pages_cover_the_day() {
    let mut hours = Vec::new();
    for page in 1..=5 {
        let (status, json) = send(get(&format!("/snapshots?page={page}&page_size=5"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_items"], 24);
        assert_eq!(json["total_pages"], 5);
        for item in json["items"].as_array().unwrap() {
            hours.push(item["hour"].as_u64().unwrap());
        }
    }
    assert_eq!(hours, (0..24).collect::<Vec<u64>>());
}

#[tokio::test]
async fn snapshot_is_reproducible_per_seed() {
    let (_, a) = send(get("/snapshot?hour=12&seed=11")).await;
    let (_, b) = send(get("/snapshot?hour=12&seed=11")).await;
    assert_eq!(a, b);
    assert_eq!(a["hour"], 12);
    assert!(a["solar"]["production_kw"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn snapshot_without_hour_is_rejected() {
    let app = router(build_api_state());
    let resp = app.oneshot(get("/snapshot")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn posted_metrics_use_the_catalogs() {
    let body = r#"{
        "consumption": {"baseline_kwh": 1000.0, "actual_kwh": 880.0},
        "renewable_kwh": 0.0,
        "period_days": 365.0
    }"#;
    let req = Request::builder()
        .method("POST")
        .uri("/metrics")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let (status, json) = send(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["metrics"]["annual_energy_reduction"], 12.0);
    assert_eq!(
        json["gamification"]["highest_certification"]["id"],
        "silver"
    );
}

#[tokio::test]
async fn unknown_scoring_field_is_rejected() {
    let req = Request::builder()
        .method("POST")
        .uri("/metrics")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"renewable_kwh": 1.0, "mood": "great"}"#))
        .unwrap();
    let app = router(build_api_state());
    let resp = app.oneshot(req).await.unwrap();
    assert!(resp.status().is_client_error());
}
