//! One complete simulated day: snapshots, energy totals, sustainability
//! metrics and achievements.

use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::info;

use crate::config::ScenarioConfig;
use crate::error::{Error, Result};
use crate::gamification::{self, CatalogSet, GamificationReport};
use crate::scoring::{
    ConsumptionSummary, ProductionSummary, ScoringInput, SustainabilityMetrics,
    compute_sustainability_metrics,
};
use crate::sim::{EnergyFlowSnapshot, EnergyTotals, FlowSimulator};

/// Everything produced by one simulated day.
#[derive(Debug, Clone, Serialize)]
pub struct DayRun {
    pub date: NaiveDate,
    pub seed: u64,
    pub snapshots: Vec<EnergyFlowSnapshot>,
    pub totals: EnergyTotals,
    pub scoring_input: ScoringInput,
    pub metrics: SustainabilityMetrics,
    pub gamification: GamificationReport,
}

/// Loads the certification and badge catalogs for `scenario`.
///
/// Uses the built-in catalogs unless `scoring.catalog` names a file.
///
/// # Errors
///
/// Returns `Error::Config` if the file cannot be loaded or fails validation.
pub fn load_catalogs(scenario: &ScenarioConfig) -> Result<CatalogSet> {
    let Some(path) = &scenario.scoring.catalog else {
        return Ok(CatalogSet::default());
    };
    let catalogs = CatalogSet::from_toml_file(path)?;
    match catalogs.validate().into_iter().next() {
        Some(err) => Err(Error::Config(err)),
        None => Ok(catalogs),
    }
}

/// Builds the scorer input for a run from its totals and the scenario's
/// scoring baselines.
///
/// The period is the simulated duration in days; the daily baseline and
/// peer consumption are scaled to it.
pub fn scoring_input(
    scenario: &ScenarioConfig,
    totals: &EnergyTotals,
    period_days: f64,
) -> ScoringInput {
    let sc = &scenario.scoring;
    ScoringInput {
        consumption: ConsumptionSummary {
            baseline_kwh: sc.baseline_daily_kwh * period_days,
            actual_kwh: totals.consumption_kwh,
            standby_baseline_w: sc.standby_baseline_w,
            standby_current_w: sc.standby_current_w,
            peak_baseline_kw: sc.peak_baseline_kw,
            peak_current_kw: totals.peak_import_kw,
        },
        production: ProductionSummary {
            solar_kwh: totals.solar_kwh,
            exported_kwh: totals.grid_export_kwh,
        },
        renewable_kwh: totals.renewable_kwh(),
        devices: sc.devices.clone(),
        peer_sample: sc.peer_sample_kwh.iter().map(|p| p * period_days).collect(),
        period_days,
        price_per_kwh: scenario.tariff.standard_price,
    }
}

/// Simulates `date` under `scenario` and scores the result.
///
/// The run is reproducible: the generator is seeded from
/// `simulation.seed`.
///
/// # Errors
///
/// Returns `Error::Config` for an invalid scenario or catalog file.
pub fn run_day(scenario: &ScenarioConfig, date: NaiveDate) -> Result<DayRun> {
    let simulator = FlowSimulator::from_scenario(scenario)?;
    let catalogs = load_catalogs(scenario)?;
    let seed = scenario.simulation.seed;
    let mut rng = StdRng::seed_from_u64(seed);

    let snapshots = simulator.simulate_day(date, &mut rng)?;
    let tick_hours = simulator.config().tick_hours;
    let totals = EnergyTotals::from_snapshots(&snapshots, tick_hours);
    let period_days = snapshots.len() as f64 * tick_hours / 24.0;

    let input = scoring_input(scenario, &totals, period_days);
    let metrics = compute_sustainability_metrics(&input)?;
    let report = gamification::evaluate(&metrics, &catalogs.certifications, &catalogs.badges);

    info!(
        %date,
        seed,
        ticks = snapshots.len(),
        consumption_kwh = totals.consumption_kwh,
        solar_kwh = totals.solar_kwh,
        score = metrics.overall_sustainability_score,
        points = report.points,
        "simulated day"
    );

    Ok(DayRun {
        date,
        seed,
        snapshots,
        totals,
        scoring_input: input,
        metrics,
        gamification: report,
    })
}
