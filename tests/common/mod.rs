//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use prosumer_engine::config::ScenarioConfig;
use prosumer_engine::scoring::{ConsumptionSummary, ScoringInput};
use prosumer_engine::sim::{FlowSimulator, SocModel};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Seeds used by the statistical property loops.
pub const SEEDS: std::ops::Range<u64> = 0..64;

/// Summer solstice, long daylight window.
pub fn summer_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 21).unwrap()
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Baseline simulator with the given SoC model.
pub fn simulator(soc_model: SocModel) -> FlowSimulator {
    let mut scenario = ScenarioConfig::baseline();
    scenario.simulation.soc_model = soc_model;
    FlowSimulator::from_scenario(&scenario).unwrap()
}

/// Simulator built from a named preset.
pub fn preset_simulator(name: &str) -> FlowSimulator {
    let scenario = ScenarioConfig::from_preset(name).unwrap();
    FlowSimulator::from_scenario(&scenario).unwrap()
}

/// Scoring input with only the consumption summary and renewable share set.
pub fn consumption_input(baseline_kwh: f64, actual_kwh: f64, renewable_kwh: f64) -> ScoringInput {
    ScoringInput {
        consumption: ConsumptionSummary {
            baseline_kwh,
            actual_kwh,
            ..ConsumptionSummary::default()
        },
        renewable_kwh,
        ..ScoringInput::default()
    }
}
