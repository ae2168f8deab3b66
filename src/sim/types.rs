//! Core simulation types: the energy-flow snapshot and its parts.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Absolute tolerance used when checking snapshot invariants (kW).
pub const FLOW_TOLERANCE_KW: f64 = 1e-9;

/// How the battery state of charge evolves between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocModel {
    /// SoC is drawn afresh on every tick; previous state is ignored.
    #[default]
    Sampled,
    /// SoC integrates dispatched power from the previous tick.
    Integrated,
}

/// Centralized simulator settings.
///
/// # Examples
///
/// ```
/// use prosumer_engine::sim::types::{SimConfig, SocModel};
///
/// let cfg = SimConfig::new(SocModel::Integrated, 0.25);
/// assert_eq!(cfg.initial_soc_pct, 50.0);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct SimConfig {
    /// Battery state-of-charge model.
    pub soc_model: SocModel,
    /// Duration of one tick in hours (> 0).
    pub tick_hours: f64,
    /// SoC used by the integrated model when no previous state is given (%).
    pub initial_soc_pct: f64,
    /// Range the sampled model draws SoC from (%).
    pub sampled_soc_pct: (f64, f64),
}

impl SimConfig {
    /// Creates simulator settings with a 50% starting SoC and a
    /// `[20, 95)` sampling range.
    ///
    /// # Panics
    ///
    /// Panics if `tick_hours` is not strictly positive.
    pub fn new(soc_model: SocModel, tick_hours: f64) -> Self {
        assert!(tick_hours > 0.0, "tick_hours must be > 0");
        Self {
            soc_model,
            tick_hours,
            initial_soc_pct: 50.0,
            sampled_soc_pct: (20.0, 95.0),
        }
    }
}

/// Time-of-day electricity pricing band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tariff {
    OffPeak,
    Standard,
    Peak,
}

impl fmt::Display for Tariff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OffPeak => "off-peak",
            Self::Standard => "standard",
            Self::Peak => "peak",
        };
        f.write_str(name)
    }
}

/// Where the solar production of one tick went.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarFlow {
    /// Total production (kW, >= 0).
    pub production_kw: f64,
    /// Share consumed by the house (kW, >= 0).
    pub to_house_kw: f64,
    /// Share exported (kW, >= 0).
    pub to_grid_kw: f64,
    /// Share stored in the battery (kW, >= 0).
    pub to_battery_kw: f64,
}

/// Battery condition at the end of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatteryState {
    /// State of charge (0 to 100).
    pub soc_pct: f64,
    /// Battery power (kW; positive=charging, negative=discharging).
    pub power_kw: f64,
    /// Nominal capacity (kWh).
    pub capacity_kwh: f64,
    /// How long the stored energy lasts at the current draw; `None` with no load.
    pub estimated_runtime_minutes: Option<f64>,
}

/// Grid exchange for one tick. At most one of import/export is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridFlow {
    /// Power bought from the grid (kW, >= 0).
    pub import_kw: f64,
    /// Power sold to the grid (kW, >= 0).
    pub export_kw: f64,
    /// Price applying at this hour (per kWh).
    pub current_price_per_kwh: f64,
    /// Pricing band applying at this hour.
    pub tariff: Tariff,
}

/// Named share of consumption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadShare {
    pub name: String,
    pub power_kw: f64,
}

/// Household consumption for one tick.
///
/// `total_kw` is base load + heat pump + EV. The room and device lists are
/// sampled independently for display and do not add up to the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumptionBreakdown {
    pub total_kw: f64,
    pub base_kw: f64,
    pub by_room: Vec<LoadShare>,
    pub by_device: Vec<LoadShare>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvState {
    pub charging: bool,
    pub power_kw: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GasState {
    pub active: bool,
    pub flow_m3_per_hour: f64,
    /// Thermal power equivalent of the flow (kW).
    pub power_kw: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatPumpState {
    pub active: bool,
    /// Electrical draw (kW).
    pub power_kw: f64,
    pub cop: f64,
    /// Delivered heat (kW).
    pub heat_output_kw: f64,
}

/// One coherent picture of household energy flows.
///
/// Built fresh for every tick and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyFlowSnapshot {
    pub timestamp: DateTime<Utc>,
    /// Hour of day that drove the model (0-23).
    pub hour: u32,
    pub solar: SolarFlow,
    pub battery: BatteryState,
    pub grid: GridFlow,
    pub consumption: ConsumptionBreakdown,
    pub ev: EvState,
    pub gas: GasState,
    pub heat_pump: HeatPumpState,
}

/// A physical invariant broken by a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Import and export are both non-zero.
    SimultaneousImportExport,
    /// Solar shares do not add up to production.
    SolarNotConserved,
    /// A flow that must be non-negative is negative.
    NegativeFlow,
    /// State of charge outside `[0, 100]`.
    SocOutOfRange,
    /// Consumption total differs from base + heat pump + EV.
    ConsumptionMismatch,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::SimultaneousImportExport => "grid import and export are both non-zero",
            Self::SolarNotConserved => "solar shares do not sum to production",
            Self::NegativeFlow => "negative flow where >= 0 is required",
            Self::SocOutOfRange => "battery SoC outside [0, 100]",
            Self::ConsumptionMismatch => "consumption total != base + heat pump + EV",
        };
        f.write_str(msg)
    }
}

impl EnergyFlowSnapshot {
    /// Returns every invariant this snapshot breaks; empty when consistent.
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();
        let s = &self.solar;
        let g = &self.grid;

        if g.import_kw > 0.0 && g.export_kw > 0.0 {
            violations.push(InvariantViolation::SimultaneousImportExport);
        }

        let shares = s.to_house_kw + s.to_grid_kw + s.to_battery_kw;
        if (shares - s.production_kw).abs() > FLOW_TOLERANCE_KW * s.production_kw.max(1.0) {
            violations.push(InvariantViolation::SolarNotConserved);
        }

        let non_negative = [
            s.production_kw,
            s.to_house_kw,
            s.to_grid_kw,
            s.to_battery_kw,
            g.import_kw,
            g.export_kw,
            self.consumption.total_kw,
            self.ev.power_kw,
            self.gas.flow_m3_per_hour,
            self.heat_pump.power_kw,
        ];
        if non_negative.iter().any(|v| *v < 0.0) {
            violations.push(InvariantViolation::NegativeFlow);
        }

        if !(0.0..=100.0).contains(&self.battery.soc_pct) {
            violations.push(InvariantViolation::SocOutOfRange);
        }

        let expected_total = self.consumption.base_kw + self.heat_pump.power_kw + self.ev.power_kw;
        let drift = (expected_total - self.consumption.total_kw).abs();
        if drift > FLOW_TOLERANCE_KW * expected_total.max(1.0) {
            violations.push(InvariantViolation::ConsumptionMismatch);
        }

        violations
    }
}

impl fmt::Display for EnergyFlowSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:00 | solar={:>5.2} kW (house={:.2} grid={:.2} bat={:.2}) | \
             load={:>5.2} kW | bat={:>+6.2} kW (SoC={:>5.1}%) | \
             import={:.2} export={:.2} @ {:.2}/kWh ({}) | ev={:.2} hp={:.2} gas={:.2} m3/h",
            self.hour,
            self.solar.production_kw,
            self.solar.to_house_kw,
            self.solar.to_grid_kw,
            self.solar.to_battery_kw,
            self.consumption.total_kw,
            self.battery.power_kw,
            self.battery.soc_pct,
            self.grid.import_kw,
            self.grid.export_kw,
            self.grid.current_price_per_kwh,
            self.grid.tariff,
            self.ev.power_kw,
            self.heat_pump.power_kw,
            self.gas.flow_m3_per_hour,
        )
    }
}
