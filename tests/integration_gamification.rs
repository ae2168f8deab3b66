mod common;

use chrono::NaiveDate;
use prosumer_engine::Error;
use prosumer_engine::config::ScenarioConfig;
use prosumer_engine::gamification::points::{level_for, total_points};
use prosumer_engine::gamification::{
    BadgeCatalog, CertificationCatalog, evaluate, highest_certification,
};
use prosumer_engine::runner::run_day;
use prosumer_engine::scoring::{SustainabilityMetrics, compute_sustainability_metrics};

use rand::Rng;

use common::{consumption_input, rng};

/// Mutable access to every metric field, in declaration order.
fn metric_fields(m: &mut SustainabilityMetrics) -> [&mut f64; 19] {
    [
        &mut m.energy_saved_kwh,
        &mut m.annual_energy_reduction,
        &mut m.co2_avoided_kg,
        &mut m.trees_saved,
        &mut m.water_saved_liters,
        &mut m.renewable_percentage,
        &mut m.self_consumption_percentage,
        &mut m.peer_percentile,
        &mut m.device_efficiency,
        &mut m.carbon_neutrality_progress,
        &mut m.energy_health_index,
        &mut m.cost_savings,
        &mut m.standby_reduction,
        &mut m.peak_load_reduction,
        &mut m.ev_efficiency,
        &mut m.lighting_efficiency,
        &mut m.hvac_efficiency,
        &mut m.appliance_health,
        &mut m.overall_sustainability_score,
    ]
}

fn points_with_standard_catalogs(metrics: &SustainabilityMetrics) -> u64 {
    let certs = CertificationCatalog::standard().earned(metrics).len();
    let badges = BadgeCatalog::standard().earned(metrics).len();
    total_points(metrics, certs, badges)
}

fn tier_ids(metrics: &SustainabilityMetrics) -> Vec<String> {
    const TIERS: [&str; 5] = ["bronze", "silver", "gold", "platinum", "diamond"];
    CertificationCatalog::standard()
        .earned(metrics)
        .into_iter()
        .filter(|c| TIERS.contains(&c.id.as_str()))
        .map(|c| c.id.clone())
        .collect()
}

#[test]
fn twelve_percent_reduction_earns_exactly_silver() {
    let metrics = SustainabilityMetrics {
        annual_energy_reduction: 12.0,
        ..SustainabilityMetrics::default()
    };
    assert_eq!(tier_ids(&metrics), vec!["silver"]);
    let catalog = CertificationCatalog::standard();
    let highest = highest_certification(&metrics, &catalog);
    assert_eq!(highest.map(|c| c.id.as_str()), Some("silver"));
}

#[test]
fn reduction_tiers_do_not_overlap() {
    for tenth in 0..1000 {
        let metrics = SustainabilityMetrics {
            annual_energy_reduction: f64::from(tenth) / 10.0,
            ..SustainabilityMetrics::default()
        };
        let ids = tier_ids(&metrics);
        let expected = usize::from(metrics.annual_energy_reduction >= 5.0);
        assert_eq!(ids.len(), expected, "{}%: {ids:?}", metrics.annual_energy_reduction);
    }
}

#[test]
fn points_never_drop_when_metrics_improve() {
    let certs = CertificationCatalog::standard();
    let badges = BadgeCatalog::standard();

    // Savings, renewables and actual consumption all move in the user's favour.
    let mut previous = 0;
    for step in 0..=60 {
        let actual = 1000.0 - 10.0 * f64::from(step);
        let renewable = (actual * f64::from(step) / 60.0).min(actual);
        let metrics = compute_sustainability_metrics(&consumption_input(1000.0, actual, renewable))
            .unwrap();
        let report = evaluate(&metrics, &certs, &badges);
        assert!(
            report.points >= previous,
            "step {step}: points fell from {previous} to {}",
            report.points
        );
        previous = report.points;
    }
    assert!(previous > 0);
}

#[test]
fn raising_any_single_metric_never_costs_points_or_level() {
    for seed in 0..64 {
        let mut rng = rng(seed);
        let mut base = SustainabilityMetrics::default();
        for field in metric_fields(&mut base) {
            *field = rng.random_range(0.0..120.0);
        }
        // Absolute savings reach the milestone thresholds.
        base.co2_avoided_kg *= 5.0;
        base.water_saved_liters *= 50.0;

        let base_points = points_with_standard_catalogs(&base);
        for idx in 0..19 {
            let mut raised = base.clone();
            let delta = rng.random_range(0.0..500.0);
            if let Some(field) = metric_fields(&mut raised).into_iter().nth(idx) {
                *field += delta;
            }
            let raised_points = points_with_standard_catalogs(&raised);
            assert!(
                base_points <= raised_points,
                "seed {seed} field {idx}: points fell from {base_points} to {raised_points}"
            );
            assert!(
                level_for(base_points).rank <= level_for(raised_points).rank,
                "seed {seed} field {idx}: level fell"
            );
        }
    }
}

#[test]
fn reference_household_is_gold() {
    let metrics = compute_sustainability_metrics(&consumption_input(900.0, 600.0, 300.0)).unwrap();
    let report = evaluate(
        &metrics,
        &CertificationCatalog::standard(),
        &BadgeCatalog::standard(),
    );
    assert_eq!(
        report.highest_certification.as_ref().map(|c| c.id.as_str()),
        Some("gold")
    );
    let badge_ids: Vec<&str> = report.badges.iter().map(|b| b.id.as_str()).collect();
    assert!(badge_ids.contains(&"solar-starter"));
    assert!(badge_ids.contains(&"green-powered"));
    assert!(badge_ids.contains(&"carbon-cutter"));
    assert!(report.level.rank >= 1);
    let again = evaluate(
        &metrics,
        &CertificationCatalog::standard(),
        &BadgeCatalog::standard(),
    );
    assert_eq!(report, again);
}

#[test]
fn catalog_file_overrides_builtin_badges() {
    let path = std::env::temp_dir().join(format!("prosumer-catalog-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        r#"
[[badges]]
id = "any-sun"
name = "Any Sun"
description = "Produced some solar power"
rarity = "common"
criteria = [{ metric = "self_consumption_percentage", min = 0.0 }]
"#,
    )
    .unwrap();

    let mut scenario = ScenarioConfig::baseline();
    scenario.scoring.catalog = Some(path.clone());
    let run = run_day(&scenario, NaiveDate::from_ymd_opt(2024, 6, 21).unwrap()).unwrap();
    std::fs::remove_file(&path).unwrap();

    let ids: Vec<&str> = run.gamification.badges.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["any-sun"]);
}

#[test]
fn invalid_catalog_file_fails_the_run() {
    let path =
        std::env::temp_dir().join(format!("prosumer-bad-catalog-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        r#"
[[certifications]]
id = "inverted"
name = "Inverted"
description = ""
level = 1
criteria = [{ metric = "trees_saved", min = 10.0, max = 5.0 }]
"#,
    )
    .unwrap();

    let mut scenario = ScenarioConfig::baseline();
    scenario.scoring.catalog = Some(path.clone());
    let result = run_day(&scenario, NaiveDate::from_ymd_opt(2024, 6, 21).unwrap());
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(result, Err(Error::Config(_))));
}
