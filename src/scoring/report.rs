//! Assembles every metric for one scoring input.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::efficiency;
use super::inputs::ScoringInput;
use super::metrics::{self, CO2_KG_PER_KWH};
use crate::error::Result;

/// Flat record of sustainability metrics for one period.
///
/// Each field is derived from its own inputs; only
/// `energy_health_index` and `overall_sustainability_score` combine other
/// fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SustainabilityMetrics {
    /// Baseline minus actual consumption, floored at 0 (kWh).
    pub energy_saved_kwh: f64,
    /// Consumption reduction against the baseline (%).
    pub annual_energy_reduction: f64,
    pub co2_avoided_kg: f64,
    pub trees_saved: f64,
    pub water_saved_liters: f64,
    pub renewable_percentage: f64,
    pub self_consumption_percentage: f64,
    pub peer_percentile: f64,
    pub device_efficiency: f64,
    pub carbon_neutrality_progress: f64,
    pub energy_health_index: f64,
    pub cost_savings: f64,
    pub standby_reduction: f64,
    pub peak_load_reduction: f64,
    pub ev_efficiency: f64,
    pub lighting_efficiency: f64,
    pub hvac_efficiency: f64,
    pub appliance_health: f64,
    pub overall_sustainability_score: f64,
}

/// Computes every sustainability metric for `input`.
///
/// # Errors
///
/// Returns `Error::InvalidInput` when a quantity that must be non-negative
/// is negative or not finite. Zero baselines, zero totals and empty samples
/// are not errors.
pub fn compute_sustainability_metrics(input: &ScoringInput) -> Result<SustainabilityMetrics> {
    input.validate()?;

    let c = &input.consumption;
    let energy_saved_kwh = (c.baseline_kwh - c.actual_kwh).max(0.0);
    let annual_energy_reduction = metrics::reduction_percentage(c.actual_kwh, c.baseline_kwh);

    let co2_avoided_kg = metrics::co2_avoided_kg(energy_saved_kwh);
    let renewable_percentage = metrics::renewable_percentage(input.renewable_kwh, c.actual_kwh);
    let peer_percentile = metrics::peer_percentile(c.actual_kwh, &input.peer_sample);
    let device_efficiency = efficiency::device_efficiency(&input.devices);

    let current_co2 = (c.actual_kwh - input.renewable_kwh).max(0.0) * CO2_KG_PER_KWH;
    let baseline_co2 = c.baseline_kwh * CO2_KG_PER_KWH;
    let carbon_neutrality_progress = metrics::carbon_neutrality_progress(current_co2, baseline_co2);

    let energy_health_index = metrics::energy_health_index(
        annual_energy_reduction,
        renewable_percentage,
        peer_percentile,
        device_efficiency,
    );
    let overall_sustainability_score = metrics::overall_sustainability_score(
        carbon_neutrality_progress,
        energy_health_index,
        renewable_percentage,
        device_efficiency,
    );

    let report = SustainabilityMetrics {
        energy_saved_kwh,
        annual_energy_reduction,
        co2_avoided_kg,
        trees_saved: metrics::trees_saved(co2_avoided_kg, input.period_days),
        water_saved_liters: metrics::water_saved_liters(energy_saved_kwh),
        renewable_percentage,
        self_consumption_percentage: metrics::self_consumption_percentage(
            input.production.solar_kwh,
            input.production.exported_kwh,
        ),
        peer_percentile,
        device_efficiency,
        carbon_neutrality_progress,
        energy_health_index,
        cost_savings: metrics::cost_savings(energy_saved_kwh, input.price_per_kwh),
        standby_reduction: metrics::reduction_percentage(c.standby_current_w, c.standby_baseline_w),
        peak_load_reduction: metrics::reduction_percentage(c.peak_current_kw, c.peak_baseline_kw),
        ev_efficiency: efficiency::ev_efficiency(&input.devices),
        lighting_efficiency: efficiency::lighting_efficiency(&input.devices),
        hvac_efficiency: efficiency::hvac_efficiency(&input.devices),
        appliance_health: efficiency::appliance_health(&input.devices),
        overall_sustainability_score,
    };

    debug!(
        overall = report.overall_sustainability_score,
        health = report.energy_health_index,
        saved_kwh = report.energy_saved_kwh,
        "computed sustainability metrics"
    );
    Ok(report)
}

impl fmt::Display for SustainabilityMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Sustainability Report ---")?;
        writeln!(
            f,
            "Energy saved:          {:.2} kWh ({:.1}% reduction)",
            self.energy_saved_kwh, self.annual_energy_reduction
        )?;
        writeln!(f, "CO2 avoided:           {:.2} kg", self.co2_avoided_kg)?;
        writeln!(f, "Trees equivalent:      {:.1}", self.trees_saved)?;
        writeln!(f, "Water saved:           {:.0} L", self.water_saved_liters)?;
        writeln!(f, "Cost savings:          {:.2}", self.cost_savings)?;
        writeln!(f, "Renewable share:       {:.0}%", self.renewable_percentage)?;
        writeln!(f, "Solar self-use:        {:.0}%", self.self_consumption_percentage)?;
        writeln!(f, "Peer percentile:       {:.0}", self.peer_percentile)?;
        writeln!(f, "Carbon neutrality:     {:.1}%", self.carbon_neutrality_progress)?;
        writeln!(f, "Standby reduction:     {:.1}%", self.standby_reduction)?;
        writeln!(f, "Peak-load reduction:   {:.1}%", self.peak_load_reduction)?;
        writeln!(
            f,
            "Efficiency (dev/ev/light/hvac/appl): {:.0}/{:.0}/{:.0}/{:.0}/{:.0}",
            self.device_efficiency,
            self.ev_efficiency,
            self.lighting_efficiency,
            self.hvac_efficiency,
            self.appliance_health
        )?;
        writeln!(f, "Energy health index:   {:.1}", self.energy_health_index)?;
        write!(f, "Overall score:         {:.1}", self.overall_sustainability_score)
    }
}
