//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use super::AppState;
use super::types::{
    DEFAULT_PAGE_SIZE, ErrorResponse, MetricsResponse, SnapshotQuery, SnapshotsQuery,
    StateResponse,
};
use crate::gamification;
use crate::pagination::{Page, paginate};
use crate::scoring::{ScoringInput, compute_sustainability_metrics};
use crate::sim::EnergyFlowSnapshot;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

fn bad_request(err: impl std::fmt::Display) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(err)))
}

/// Returns the run summary.
///
/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    let run = &state.run;
    Json(StateResponse {
        date: run.date,
        seed: run.seed,
        config: state.simulator.config().clone(),
        totals: run.totals.clone(),
        metrics: run.metrics.clone(),
        gamification: run.gamification.clone(),
        latest_snapshot: run.snapshots.last().cloned(),
    })
}

/// Returns one page of the run's snapshots.
///
/// `GET /snapshots` → first page of 24
/// `GET /snapshots?page=2&page_size=6` → snapshots 6..12
/// `GET /snapshots?page_size=0` → 400 + `ErrorResponse`
pub async fn get_snapshots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SnapshotsQuery>,
) -> ApiResult<Page<EnergyFlowSnapshot>> {
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    paginate(&state.run.snapshots, page, page_size)
        .map(Json)
        .map_err(bad_request)
}

/// Simulates a single hour of the run's date.
///
/// `GET /snapshot?hour=13&seed=7` → 200 + snapshot JSON
/// `GET /snapshot?hour=24` → 400 + `ErrorResponse`
pub async fn get_snapshot(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SnapshotQuery>,
) -> ApiResult<EnergyFlowSnapshot> {
    let seed = query.seed.unwrap_or(state.run.seed);
    let mut rng = StdRng::seed_from_u64(seed);
    debug!(hour = query.hour, seed, "simulating snapshot on request");
    state
        .simulator
        .simulate_hour(state.run.date, query.hour, None, &mut rng)
        .map(Json)
        .map_err(bad_request)
}

/// Scores a posted input and evaluates the catalogs against it.
///
/// `POST /metrics` with a `ScoringInput` body → 200 + `MetricsResponse`
/// Negative quantities → 400 + `ErrorResponse`
pub async fn post_metrics(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ScoringInput>,
) -> ApiResult<MetricsResponse> {
    let metrics = compute_sustainability_metrics(&input).map_err(bad_request)?;
    let report = gamification::evaluate(
        &metrics,
        &state.catalogs.certifications,
        &state.catalogs.badges,
    );
    Ok(Json(MetricsResponse {
        metrics,
        gamification: report,
    }))
}
