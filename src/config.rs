//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::devices::{
    BaseLoad, Battery, EvCharger, GasBoiler, HeatPump, HourWindow, LoadBand, SolarPv,
};
use crate::scoring::{DeviceCategory, DeviceRecord, LightingType};
use crate::sim::tariff::TariffSchedule;
use crate::sim::types::{SimConfig, SocModel};

/// Slack allowed when checking that ticks fill the day exactly.
const TICK_EPSILON: f64 = 1e-6;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Solar PV parameters.
    #[serde(default)]
    pub solar: SolarConfig,
    /// Household base load and breakdown bands.
    #[serde(default)]
    pub baseload: BaseloadConfig,
    /// Battery storage parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// EV charger parameters.
    #[serde(default)]
    pub ev: EvConfig,
    /// Heat pump and gas boiler parameters.
    #[serde(default)]
    pub heating: HeatingConfig,
    /// Time-of-use pricing.
    #[serde(default)]
    pub tariff: TariffConfig,
    /// Baselines and inventory used when scoring a run.
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// Simulation timing and global parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Master random seed.
    pub seed: u64,
    /// Tick duration in hours (must be > 0).
    pub tick_hours: f64,
    /// Battery state-of-charge model: `"sampled"` or `"integrated"`.
    pub soc_model: SocModel,
    /// Starting SoC for the integrated model (%).
    pub initial_soc_pct: f64,
    /// Lower bound of the sampled SoC (%).
    pub sampled_soc_min_pct: f64,
    /// Upper bound of the sampled SoC (%).
    pub sampled_soc_max_pct: f64,
    /// Day to simulate; today (UTC) when absent.
    pub date: Option<NaiveDate>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_hours: 1.0,
            soc_model: SocModel::Sampled,
            initial_soc_pct: 50.0,
            sampled_soc_min_pct: 20.0,
            sampled_soc_max_pct: 95.0,
            date: None,
        }
    }
}

/// Solar PV parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarConfig {
    /// Peak generation (kW).
    pub kw_peak: f64,
    /// First daylight hour.
    pub sunrise_hour: u32,
    /// Last daylight hour.
    pub sunset_hour: u32,
    /// Lower bound of the irradiance multiplier.
    pub irradiance_min: f64,
    /// Upper bound of the irradiance multiplier.
    pub irradiance_max: f64,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            kw_peak: 5.0,
            sunrise_hour: 6,
            sunset_hour: 20,
            irradiance_min: 0.6,
            irradiance_max: 1.0,
        }
    }
}

/// Household base load and the informative breakdown bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BaseloadConfig {
    /// Hours of elevated activity.
    pub active_windows: Vec<HourWindow>,
    pub active_min_kw: f64,
    pub active_max_kw: f64,
    pub off_peak_min_kw: f64,
    pub off_peak_max_kw: f64,
    /// Per-room breakdown bands.
    pub rooms: Vec<LoadBand>,
    /// Per-appliance breakdown bands.
    pub appliances: Vec<LoadBand>,
}

impl Default for BaseloadConfig {
    fn default() -> Self {
        Self {
            active_windows: vec![HourWindow::new(6, 9), HourWindow::new(18, 22)],
            active_min_kw: 1.5,
            active_max_kw: 3.0,
            off_peak_min_kw: 0.4,
            off_peak_max_kw: 1.2,
            rooms: vec![
                LoadBand::new("Living Room", 0.2, 0.8),
                LoadBand::new("Kitchen", 0.3, 1.5),
                LoadBand::new("Bedrooms", 0.1, 0.4),
                LoadBand::new("Office", 0.1, 0.5),
                LoadBand::new("Bathroom", 0.05, 0.6),
            ],
            appliances: vec![
                LoadBand::new("Refrigerator", 0.1, 0.2),
                LoadBand::new("Washing Machine", 0.0, 0.5),
                LoadBand::new("Dishwasher", 0.0, 0.4),
                LoadBand::new("TV", 0.05, 0.2),
                LoadBand::new("Lighting", 0.05, 0.3),
                LoadBand::new("Computer", 0.05, 0.25),
            ],
        }
    }
}

/// Battery storage parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Total energy capacity (kWh).
    pub capacity_kwh: f64,
    /// Maximum charging power (kW).
    pub max_charge_kw: f64,
    /// Maximum discharging power (kW).
    pub max_discharge_kw: f64,
    /// Charge efficiency (0.0–1.0].
    pub eta_charge: f64,
    /// Discharge efficiency (0.0–1.0].
    pub eta_discharge: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_kwh: 13.5,
            max_charge_kw: 5.0,
            max_discharge_kw: 5.0,
            eta_charge: 0.95,
            eta_discharge: 0.95,
        }
    }
}

/// EV charger parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvConfig {
    /// Hours during which the car is plugged in and charging.
    pub window: HourWindow,
    pub min_charge_kw: f64,
    pub max_charge_kw: f64,
}

impl Default for EvConfig {
    fn default() -> Self {
        Self {
            window: HourWindow::new(23, 6),
            min_charge_kw: 3.0,
            max_charge_kw: 7.4,
        }
    }
}

/// Heat pump and gas boiler parameters. Both follow the same heating windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeatingConfig {
    pub windows: Vec<HourWindow>,
    pub heat_pump_min_kw: f64,
    pub heat_pump_max_kw: f64,
    pub cop_min: f64,
    pub cop_max: f64,
    pub gas_min_m3_per_hour: f64,
    pub gas_max_m3_per_hour: f64,
}

impl Default for HeatingConfig {
    fn default() -> Self {
        Self {
            windows: vec![HourWindow::new(6, 9), HourWindow::new(18, 23)],
            heat_pump_min_kw: 1.5,
            heat_pump_max_kw: 3.0,
            cop_min: 3.0,
            cop_max: 4.5,
            gas_min_m3_per_hour: 0.2,
            gas_max_m3_per_hour: 1.2,
        }
    }
}

/// Time-of-use pricing (currency per kWh).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffConfig {
    pub peak_window: HourWindow,
    pub off_peak_window: HourWindow,
    pub peak_price: f64,
    pub standard_price: f64,
    pub off_peak_price: f64,
}

impl Default for TariffConfig {
    fn default() -> Self {
        let schedule = TariffSchedule::default();
        Self {
            peak_window: schedule.peak_window,
            off_peak_window: schedule.off_peak_window,
            peak_price: schedule.peak_price,
            standard_price: schedule.standard_price,
            off_peak_price: schedule.off_peak_price,
        }
    }
}

/// Baselines and inventory used to score a simulated run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Expected consumption of the household without improvements (kWh/day).
    pub baseline_daily_kwh: f64,
    /// Standby draw before improvements (W).
    pub standby_baseline_w: f64,
    /// Standby draw now (W).
    pub standby_current_w: f64,
    /// Peak grid import before improvements (kW).
    pub peak_baseline_kw: f64,
    /// Daily consumption of comparable households (kWh).
    pub peer_sample_kwh: Vec<f64>,
    /// Device inventory.
    pub devices: Vec<DeviceRecord>,
    /// Optional TOML file overriding the certification and badge catalogs.
    pub catalog: Option<PathBuf>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            baseline_daily_kwh: 60.0,
            standby_baseline_w: 120.0,
            standby_current_w: 80.0,
            peak_baseline_kw: 12.0,
            peer_sample_kwh: vec![38.0, 45.0, 52.0, 58.0, 61.0, 66.0, 72.0, 80.0],
            devices: vec![
                DeviceRecord::new("Heat pump", DeviceCategory::Hvac, 3.0).with_efficiency(92.0),
                DeviceRecord::new("Wallbox", DeviceCategory::EvCharger, 7.4).with_efficiency(90.0),
                DeviceRecord::new("Refrigerator", DeviceCategory::Appliance, 0.2)
                    .with_efficiency(80.0)
                    .with_age(6.0),
                DeviceRecord::new("Washing machine", DeviceCategory::Appliance, 0.5)
                    .with_efficiency(75.0)
                    .with_age(3.0),
                DeviceRecord::new("Living room lights", DeviceCategory::Lighting, 0.1)
                    .with_lighting_type(LightingType::Led),
                DeviceRecord::new("Hall lights", DeviceCategory::Lighting, 0.06)
                    .with_lighting_type(LightingType::Halogen),
            ],
            catalog: None,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.tick_hours"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the high-solar preset: large PV array, bigger battery and an
    /// integrated state of charge.
    pub fn high_solar() -> Self {
        Self {
            simulation: SimulationConfig {
                soc_model: SocModel::Integrated,
                ..SimulationConfig::default()
            },
            solar: SolarConfig {
                kw_peak: 10.0,
                sunrise_hour: 5,
                sunset_hour: 21,
                irradiance_min: 0.8,
                ..SolarConfig::default()
            },
            battery: BatteryConfig {
                capacity_kwh: 20.0,
                max_charge_kw: 7.0,
                max_discharge_kw: 7.0,
                ..BatteryConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the winter-heating preset: short cloudy days and long
    /// heating windows.
    pub fn winter_heating() -> Self {
        Self {
            solar: SolarConfig {
                kw_peak: 5.0,
                sunrise_hour: 8,
                sunset_hour: 16,
                irradiance_min: 0.2,
                irradiance_max: 0.6,
            },
            heating: HeatingConfig {
                windows: vec![HourWindow::new(5, 10), HourWindow::new(16, 23)],
                heat_pump_min_kw: 2.5,
                heat_pump_max_kw: 4.5,
                cop_min: 2.2,
                cop_max: 3.2,
                gas_min_m3_per_hour: 0.6,
                gas_max_m3_per_hour: 1.8,
            },
            scoring: ScoringConfig {
                baseline_daily_kwh: 85.0,
                ..ScoringConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "high_solar", "winter_heating"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "high_solar" => Ok(Self::high_solar()),
            "winter_heating" => Ok(Self::winter_heating()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut positive = |field: &str, value: f64| {
            if !(value.is_finite() && value > 0.0) {
                errors.push(ConfigError::new(field, "must be > 0"));
            }
        };

        let s = &self.simulation;
        positive("simulation.tick_hours", s.tick_hours);
        positive("solar.kw_peak", self.solar.kw_peak);
        positive("battery.capacity_kwh", self.battery.capacity_kwh);
        positive("heating.cop_min", self.heating.cop_min);

        for (field, value) in [
            ("simulation.initial_soc_pct", s.initial_soc_pct),
            ("simulation.sampled_soc_min_pct", s.sampled_soc_min_pct),
            ("simulation.sampled_soc_max_pct", s.sampled_soc_max_pct),
        ] {
            if !(0.0..=100.0).contains(&value) {
                errors.push(ConfigError::new(field, "must be in [0, 100]"));
            }
        }
        if s.tick_hours > 24.0 {
            errors.push(ConfigError::new("simulation.tick_hours", "must be <= 24"));
        } else if s.tick_hours.is_finite() && s.tick_hours > 0.0 {
            let ticks = 24.0 / s.tick_hours;
            if (s.tick_hours * 3600.0).round() < 1.0 {
                errors.push(ConfigError::new(
                    "simulation.tick_hours",
                    "must be at least one second",
                ));
            } else if (ticks - ticks.round()).abs() > TICK_EPSILON {
                errors.push(ConfigError::new(
                    "simulation.tick_hours",
                    format!("must divide the day evenly, got {} ticks", ticks),
                ));
            }
        }

        let sol = &self.solar;
        if sol.sunrise_hour >= sol.sunset_hour {
            errors.push(ConfigError::new("solar.sunrise_hour", "must be < solar.sunset_hour"));
        }
        if sol.sunset_hour > 23 {
            errors.push(ConfigError::new("solar.sunset_hour", "must be <= 23"));
        }
        if !(0.0..=1.0).contains(&sol.irradiance_min)
            || !(0.0..=1.0).contains(&sol.irradiance_max)
        {
            errors.push(ConfigError::new(
                "solar.irradiance_min",
                "irradiance bounds must be in [0, 1]",
            ));
        }

        let bl = &self.baseload;
        let ev = &self.ev;
        let h = &self.heating;
        let ranges = [
            ("simulation.sampled_soc_min_pct", s.sampled_soc_min_pct, s.sampled_soc_max_pct),
            ("solar.irradiance_min", sol.irradiance_min, sol.irradiance_max),
            ("baseload.active_min_kw", bl.active_min_kw, bl.active_max_kw),
            ("baseload.off_peak_min_kw", bl.off_peak_min_kw, bl.off_peak_max_kw),
            ("ev.min_charge_kw", ev.min_charge_kw, ev.max_charge_kw),
            ("heating.heat_pump_min_kw", h.heat_pump_min_kw, h.heat_pump_max_kw),
            ("heating.cop_min", h.cop_min, h.cop_max),
            ("heating.gas_min_m3_per_hour", h.gas_min_m3_per_hour, h.gas_max_m3_per_hour),
        ];
        for (field, min, max) in ranges {
            if min < 0.0 {
                errors.push(ConfigError::new(field, "must be >= 0"));
            }
            if min > max {
                errors.push(ConfigError::new(field, "must be <= the matching max"));
            }
        }
        for (i, band) in bl.rooms.iter().chain(&bl.appliances).enumerate() {
            if band.min_kw < 0.0 || band.min_kw > band.max_kw {
                errors.push(ConfigError::new(
                    "baseload.rooms",
                    format!("band {i} (\"{}\") must satisfy 0 <= min_kw <= max_kw", band.name),
                ));
            }
        }

        let windows = bl
            .active_windows
            .iter()
            .map(|w| ("baseload.active_windows", w))
            .chain(h.windows.iter().map(|w| ("heating.windows", w)))
            .chain([
                ("ev.window", &ev.window),
                ("tariff.peak_window", &self.tariff.peak_window),
                ("tariff.off_peak_window", &self.tariff.off_peak_window),
            ]);
        for (field, w) in windows {
            if w.start > 23 || w.end > 24 {
                errors.push(ConfigError::new(field, "hours must be within a day"));
            }
        }

        let bat = &self.battery;
        if bat.max_charge_kw < 0.0 || bat.max_discharge_kw < 0.0 {
            errors.push(ConfigError::new("battery.max_charge_kw", "rates must be >= 0"));
        }
        for (field, eta) in [
            ("battery.eta_charge", bat.eta_charge),
            ("battery.eta_discharge", bat.eta_discharge),
        ] {
            if !(eta > 0.0 && eta <= 1.0) {
                errors.push(ConfigError::new(field, "must be in (0, 1]"));
            }
        }

        let t = &self.tariff;
        for (field, price) in [
            ("tariff.peak_price", t.peak_price),
            ("tariff.standard_price", t.standard_price),
            ("tariff.off_peak_price", t.off_peak_price),
        ] {
            if !(price.is_finite() && price >= 0.0) {
                errors.push(ConfigError::new(field, "must be >= 0"));
            }
        }

        let sc = &self.scoring;
        for (field, value) in [
            ("scoring.baseline_daily_kwh", sc.baseline_daily_kwh),
            ("scoring.standby_baseline_w", sc.standby_baseline_w),
            ("scoring.standby_current_w", sc.standby_current_w),
            ("scoring.peak_baseline_kw", sc.peak_baseline_kw),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(ConfigError::new(field, "must be >= 0"));
            }
        }
        if sc.peer_sample_kwh.iter().any(|p| *p < 0.0) {
            errors.push(ConfigError::new("scoring.peer_sample_kwh", "values must be >= 0"));
        }
        for (i, d) in sc.devices.iter().enumerate() {
            if d.power_kw < 0.0 {
                errors.push(ConfigError {
                    field: format!("scoring.devices[{i}].power_kw"),
                    message: "must be >= 0".into(),
                });
            }
        }

        errors
    }

    /// Simulator settings for this scenario.
    pub fn sim_config(&self) -> SimConfig {
        let s = &self.simulation;
        SimConfig {
            initial_soc_pct: s.initial_soc_pct,
            sampled_soc_pct: (s.sampled_soc_min_pct, s.sampled_soc_max_pct),
            ..SimConfig::new(s.soc_model, s.tick_hours)
        }
    }

    pub fn solar_pv(&self) -> SolarPv {
        let s = &self.solar;
        SolarPv::new(s.kw_peak, s.sunrise_hour, s.sunset_hour, s.irradiance_min, s.irradiance_max)
    }

    pub fn base_load(&self) -> BaseLoad {
        let b = &self.baseload;
        BaseLoad::new(
            b.active_windows.clone(),
            (b.active_min_kw, b.active_max_kw),
            (b.off_peak_min_kw, b.off_peak_max_kw),
        )
        .with_breakdowns(b.rooms.clone(), b.appliances.clone())
    }

    pub fn battery(&self) -> Battery {
        let b = &self.battery;
        Battery::new(
            b.capacity_kwh,
            b.max_charge_kw,
            b.max_discharge_kw,
            b.eta_charge,
            b.eta_discharge,
        )
    }

    pub fn ev_charger(&self) -> EvCharger {
        EvCharger::new(self.ev.window, self.ev.min_charge_kw, self.ev.max_charge_kw)
    }

    pub fn heat_pump(&self) -> HeatPump {
        let h = &self.heating;
        HeatPump::new(
            h.windows.clone(),
            (h.heat_pump_min_kw, h.heat_pump_max_kw),
            (h.cop_min, h.cop_max),
        )
    }

    pub fn gas_boiler(&self) -> GasBoiler {
        let h = &self.heating;
        GasBoiler::new(h.windows.clone(), (h.gas_min_m3_per_hour, h.gas_max_m3_per_hour))
    }

    pub fn tariff_schedule(&self) -> TariffSchedule {
        let t = &self.tariff;
        TariffSchedule {
            peak_window: t.peak_window,
            off_peak_window: t.off_peak_window,
            peak_price: t.peak_price,
            standard_price: t.standard_price,
            off_peak_price: t.off_peak_price,
        }
    }
}
