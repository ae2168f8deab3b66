mod common;

use approx::assert_relative_eq;
use prosumer_engine::Error;
use prosumer_engine::scoring::metrics::{
    carbon_neutrality_progress, peer_percentile, renewable_percentage,
};
use prosumer_engine::scoring::{
    ConsumptionSummary, DeviceCategory, DeviceRecord, ProductionSummary, ScoringInput,
    SustainabilityMetrics, compute_sustainability_metrics,
};

use common::consumption_input;

fn percentage_fields(m: &SustainabilityMetrics) -> [(&'static str, f64); 12] {
    [
        ("renewable_percentage", m.renewable_percentage),
        ("self_consumption_percentage", m.self_consumption_percentage),
        ("peer_percentile", m.peer_percentile),
        ("device_efficiency", m.device_efficiency),
        ("carbon_neutrality_progress", m.carbon_neutrality_progress),
        ("energy_health_index", m.energy_health_index),
        ("ev_efficiency", m.ev_efficiency),
        ("lighting_efficiency", m.lighting_efficiency),
        ("hvac_efficiency", m.hvac_efficiency),
        ("appliance_health", m.appliance_health),
        ("overall_sustainability_score", m.overall_sustainability_score),
        ("annual_energy_reduction", m.annual_energy_reduction),
    ]
}

#[test]
fn end_to_end_reference_household() {
    let m = compute_sustainability_metrics(&consumption_input(900.0, 600.0, 300.0)).unwrap();
    assert_relative_eq!(m.energy_saved_kwh, 300.0);
    assert_relative_eq!(m.co2_avoided_kg, 142.5, epsilon = 1e-9);
    assert_relative_eq!(m.renewable_percentage, 50.0);
    assert_relative_eq!(m.cost_savings, 75.0);
    assert_relative_eq!(m.water_saved_liters, 750.0);
}

#[test]
fn percentages_stay_in_range_for_extreme_inputs() {
    let inputs = [
        ScoringInput::default(),
        consumption_input(0.0, 0.0, 0.0),
        consumption_input(0.0, 500.0, 0.0),
        consumption_input(100.0, 0.0, 1e6),
        consumption_input(1e9, 1.0, 1e9),
        ScoringInput {
            consumption: ConsumptionSummary {
                baseline_kwh: 10.0,
                actual_kwh: 1e6,
                standby_baseline_w: 0.0,
                standby_current_w: 500.0,
                peak_baseline_kw: 0.0,
                peak_current_kw: 20.0,
            },
            production: ProductionSummary {
                solar_kwh: 5.0,
                exported_kwh: 50.0,
            },
            renewable_kwh: 0.0,
            devices: vec![
                DeviceRecord::new("ev", DeviceCategory::EvCharger, 7.0).with_efficiency(250.0),
                DeviceRecord::new("lamp", DeviceCategory::Lighting, 0.0),
                DeviceRecord::new("old fridge", DeviceCategory::Appliance, 0.2).with_age(80.0),
            ],
            peer_sample: vec![0.0, 1.0],
            period_days: 0.0,
            price_per_kwh: 0.0,
        },
    ];

    for (i, input) in inputs.iter().enumerate() {
        let m = compute_sustainability_metrics(input).unwrap();
        for (name, value) in percentage_fields(&m) {
            assert!(
                (0.0..=100.0).contains(&value),
                "input {i}: {name} = {value} out of [0, 100]"
            );
        }
        assert!(m.trees_saved >= 0.0 && m.trees_saved.is_finite(), "input {i}");
        assert!(m.standby_reduction >= 0.0, "input {i}");
        assert!(m.peak_load_reduction >= 0.0, "input {i}");
    }
}

#[test]
fn zero_denominators_resolve_to_defaults() {
    for x in [0.0, 1.0, 250.0, 1e6] {
        assert_eq!(renewable_percentage(x, 0.0), 0.0);
        assert_eq!(peer_percentile(x, &[]), 50.0);
        assert_eq!(carbon_neutrality_progress(x, 0.0), 0.0);
    }
}

#[test]
fn peer_percentile_counts_heavier_consumers() {
    let peers = [400.0, 500.0, 600.0, 700.0];
    assert_eq!(peer_percentile(550.0, &peers), 50.0);
    assert_eq!(peer_percentile(100.0, &peers), 100.0);
    assert_eq!(peer_percentile(700.0, &peers), 0.0);

    let mut input = consumption_input(900.0, 550.0, 0.0);
    input.peer_sample = peers.to_vec();
    let m = compute_sustainability_metrics(&input).unwrap();
    assert_eq!(m.peer_percentile, 50.0);
}

#[test]
fn negative_quantities_are_invalid_input() {
    let mut negative_renewable = consumption_input(900.0, 600.0, 0.0);
    negative_renewable.renewable_kwh = -1.0;

    let mut negative_device = consumption_input(900.0, 600.0, 0.0);
    negative_device.devices = vec![DeviceRecord::new("heater", DeviceCategory::Hvac, -2.0)];

    let mut nan_actual = consumption_input(900.0, 600.0, 0.0);
    nan_actual.consumption.actual_kwh = f64::NAN;

    for (expected_field, input) in [
        ("renewable_kwh", negative_renewable),
        ("devices[0].power_kw", negative_device),
        ("consumption.actual_kwh", nan_actual),
    ] {
        match compute_sustainability_metrics(&input) {
            Err(Error::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("{expected_field}: expected InvalidInput, got {other:?}"),
        }
    }
}

#[test]
fn scoring_is_deterministic() {
    let mut input = consumption_input(1200.0, 950.0, 400.0);
    input.production = ProductionSummary {
        solar_kwh: 500.0,
        exported_kwh: 100.0,
    };
    input.peer_sample = vec![800.0, 1000.0, 1100.0];
    let a = compute_sustainability_metrics(&input).unwrap();
    let b = compute_sustainability_metrics(&input).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.self_consumption_percentage, 80.0);
}
