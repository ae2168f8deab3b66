//! Scalar sustainability metrics.
//!
//! Every function here is total: zero denominators and empty samples resolve
//! to fixed defaults instead of failing, and percentage outputs are clamped
//! to their documented range. Inputs are expected to be non-negative;
//! [`ScoringInput::validate`](super::inputs::ScoringInput::validate) enforces
//! that at the entry point.

/// Grid emission factor (kg CO₂ per kWh).
pub const CO2_KG_PER_KWH: f64 = 0.475;
/// CO₂ absorbed by one tree in a year (kg).
pub const TREE_CO2_KG_PER_YEAR: f64 = 22.0;
/// Cooling water avoided per kWh not generated (litres).
pub const WATER_LITERS_PER_KWH: f64 = 2.5;
/// Peer percentile reported when no peers are available.
pub const DEFAULT_PEER_PERCENTILE: f64 = 50.0;
/// CO₂ reduction (%) treated as full marks in the overall score.
pub const CO2_REDUCTION_CEILING_PCT: f64 = 50.0;

/// CO₂ avoided by not consuming `energy_saved_kwh` (kg).
pub fn co2_avoided_kg(energy_saved_kwh: f64) -> f64 {
    energy_saved_kwh * CO2_KG_PER_KWH
}

/// Number of trees absorbing `co2_kg` over `period_days`.
///
/// Zero for an empty period; never negative.
pub fn trees_saved(co2_kg: f64, period_days: f64) -> f64 {
    let absorbed_per_tree = TREE_CO2_KG_PER_YEAR * period_days / 365.0;
    if absorbed_per_tree <= 0.0 {
        return 0.0;
    }
    (co2_kg / absorbed_per_tree).max(0.0)
}

/// Power-plant water use avoided by saving `energy_saved_kwh` (litres).
pub fn water_saved_liters(energy_saved_kwh: f64) -> f64 {
    energy_saved_kwh * WATER_LITERS_PER_KWH
}

/// Share of consumption covered by renewables, rounded to a whole percent.
pub fn renewable_percentage(renewable_kwh: f64, total_kwh: f64) -> f64 {
    percentage_of(renewable_kwh, total_kwh)
}

/// Share of solar production used on site, rounded to a whole percent.
pub fn self_consumption_percentage(solar_kwh: f64, exported_kwh: f64) -> f64 {
    percentage_of((solar_kwh - exported_kwh).max(0.0), solar_kwh)
}

fn percentage_of(part: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    (100.0 * part / total).round().clamp(0.0, 100.0)
}

/// Percentage of peers who consumed strictly more than the user.
///
/// Higher is better: 80 means the user beat 80% of the sample. An empty
/// sample gives [`DEFAULT_PEER_PERCENTILE`].
pub fn peer_percentile(user_kwh: f64, peers: &[f64]) -> f64 {
    if peers.is_empty() {
        return DEFAULT_PEER_PERCENTILE;
    }
    let higher = peers.iter().filter(|p| **p > user_kwh).count();
    100.0 * higher as f64 / peers.len() as f64
}

/// Progress towards carbon neutrality relative to a baseline (0-100).
pub fn carbon_neutrality_progress(current_co2_kg: f64, baseline_co2_kg: f64) -> f64 {
    if baseline_co2_kg <= 0.0 {
        return 0.0;
    }
    (100.0 * (baseline_co2_kg - current_co2_kg) / baseline_co2_kg).clamp(0.0, 100.0)
}

/// Relative reduction of `current` against `baseline` (%), floored at 0.
///
/// Used for standby, peak-load and annual energy reduction. A zero baseline
/// gives 0.
pub fn reduction_percentage(current: f64, baseline: f64) -> f64 {
    if baseline <= 0.0 {
        return 0.0;
    }
    (100.0 * (baseline - current) / baseline).max(0.0)
}

/// Composite energy-health index (0-100).
///
/// `0.30 efficiency + 0.25 renewable + 0.25 percentile + 0.20 device efficiency`
pub fn energy_health_index(
    efficiency: f64,
    renewable_pct: f64,
    peer_percentile: f64,
    device_efficiency: f64,
) -> f64 {
    let score = 0.30 * efficiency.clamp(0.0, 100.0)
        + 0.25 * renewable_pct.clamp(0.0, 100.0)
        + 0.25 * peer_percentile.clamp(0.0, 100.0)
        + 0.20 * device_efficiency.clamp(0.0, 100.0);
    score.clamp(0.0, 100.0)
}

/// Money saved by not consuming `energy_saved_kwh`, rounded to cents.
pub fn cost_savings(energy_saved_kwh: f64, price_per_kwh: f64) -> f64 {
    (energy_saved_kwh * price_per_kwh * 100.0).round() / 100.0
}

/// Overall sustainability score (0-100).
///
/// The CO₂ term reaches full marks at a 50% reduction; the weighted sum is
/// `0.30 co2 + 0.30 health + 0.20 renewable + 0.20 device efficiency`.
pub fn overall_sustainability_score(
    carbon_progress_pct: f64,
    energy_health: f64,
    renewable_pct: f64,
    device_efficiency: f64,
) -> f64 {
    let co2 = (100.0 * carbon_progress_pct.max(0.0) / CO2_REDUCTION_CEILING_PCT).min(100.0);
    let score = 0.30 * co2
        + 0.30 * energy_health.clamp(0.0, 100.0)
        + 0.20 * renewable_pct.clamp(0.0, 100.0)
        + 0.20 * device_efficiency.clamp(0.0, 100.0);
    score.clamp(0.0, 100.0)
}
