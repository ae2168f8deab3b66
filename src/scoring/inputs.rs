//! Plain-data inputs to the sustainability scorer.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ensure_non_negative};

/// Consumption over the scoring period, against a reference baseline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsumptionSummary {
    /// Reference consumption for the period (kWh).
    pub baseline_kwh: f64,
    /// Measured consumption for the period (kWh).
    pub actual_kwh: f64,
    /// Reference standby draw (W).
    pub standby_baseline_w: f64,
    /// Measured standby draw (W).
    pub standby_current_w: f64,
    /// Reference peak load (kW).
    pub peak_baseline_kw: f64,
    /// Measured peak load (kW).
    pub peak_current_kw: f64,
}

/// Solar production over the scoring period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProductionSummary {
    /// Total solar production (kWh).
    pub solar_kwh: f64,
    /// Part of the production fed into the grid (kWh).
    pub exported_kwh: f64,
}

/// Subsystem a device belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCategory {
    EvCharger,
    Lighting,
    Hvac,
    Appliance,
    #[default]
    Other,
}

/// Lamp technology, used when a lighting device reports no efficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightingType {
    Led,
    Cfl,
    Halogen,
    Incandescent,
}

impl LightingType {
    /// Fixed efficiency score for the technology.
    pub fn base_score(self) -> f64 {
        match self {
            Self::Led => 95.0,
            Self::Cfl => 75.0,
            Self::Halogen => 45.0,
            Self::Incandescent => 20.0,
        }
    }
}

/// One entry of the household device inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceRecord {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Rated or measured power (kW), used as the averaging weight.
    pub power_kw: f64,
    /// Reported efficiency score (0-100), if known.
    #[serde(default)]
    pub efficiency: Option<f64>,
    /// Whether the device is switched on.
    #[serde(default = "default_true")]
    pub is_on: bool,
    #[serde(default)]
    pub category: DeviceCategory,
    /// Lamp technology for lighting devices.
    #[serde(default)]
    pub lighting_type: Option<LightingType>,
    /// Age in years, used by the appliance health score.
    #[serde(default)]
    pub age_years: Option<f64>,
}

fn default_true() -> bool {
    true
}

impl DeviceRecord {
    /// Creates a switched-on device of `category` with unknown efficiency.
    pub fn new(name: impl Into<String>, category: DeviceCategory, power_kw: f64) -> Self {
        Self {
            name: name.into(),
            power_kw,
            efficiency: None,
            is_on: true,
            category,
            lighting_type: None,
            age_years: None,
        }
    }

    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.efficiency = Some(efficiency);
        self
    }

    pub fn with_lighting_type(mut self, lighting_type: LightingType) -> Self {
        self.lighting_type = Some(lighting_type);
        self
    }

    pub fn with_age(mut self, age_years: f64) -> Self {
        self.age_years = Some(age_years);
        self
    }

    pub fn switched_off(mut self) -> Self {
        self.is_on = false;
        self
    }
}

/// Default electricity price used for cost savings (per kWh).
pub const DEFAULT_PRICE_PER_KWH: f64 = 0.25;

/// Everything the scorer needs for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringInput {
    pub consumption: ConsumptionSummary,
    pub production: ProductionSummary,
    /// Consumption covered by renewable sources (kWh).
    pub renewable_kwh: f64,
    pub devices: Vec<DeviceRecord>,
    /// Consumption of comparable households over the same period (kWh).
    pub peer_sample: Vec<f64>,
    /// Length of the scoring period in days.
    pub period_days: f64,
    /// Price per kWh used for cost savings.
    pub price_per_kwh: f64,
}

impl Default for ScoringInput {
    fn default() -> Self {
        Self {
            consumption: ConsumptionSummary::default(),
            production: ProductionSummary::default(),
            renewable_kwh: 0.0,
            devices: Vec::new(),
            peer_sample: Vec::new(),
            period_days: 30.0,
            price_per_kwh: DEFAULT_PRICE_PER_KWH,
        }
    }
}

impl ScoringInput {
    /// Checks every quantity that must be non-negative.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let c = &self.consumption;
        ensure_non_negative("consumption.baseline_kwh", c.baseline_kwh)?;
        ensure_non_negative("consumption.actual_kwh", c.actual_kwh)?;
        ensure_non_negative("consumption.standby_baseline_w", c.standby_baseline_w)?;
        ensure_non_negative("consumption.standby_current_w", c.standby_current_w)?;
        ensure_non_negative("consumption.peak_baseline_kw", c.peak_baseline_kw)?;
        ensure_non_negative("consumption.peak_current_kw", c.peak_current_kw)?;
        ensure_non_negative("production.solar_kwh", self.production.solar_kwh)?;
        ensure_non_negative("production.exported_kwh", self.production.exported_kwh)?;
        ensure_non_negative("renewable_kwh", self.renewable_kwh)?;
        ensure_non_negative("period_days", self.period_days)?;
        ensure_non_negative("price_per_kwh", self.price_per_kwh)?;

        for (i, peer) in self.peer_sample.iter().enumerate() {
            ensure_non_negative(&format!("peer_sample[{i}]"), *peer)?;
        }
        for (i, device) in self.devices.iter().enumerate() {
            ensure_non_negative(&format!("devices[{i}].power_kw"), device.power_kw)?;
            if let Some(eff) = device.efficiency {
                ensure_non_negative(&format!("devices[{i}].efficiency"), eff)?;
            }
            if let Some(age) = device.age_years {
                ensure_non_negative(&format!("devices[{i}].age_years"), age)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn default_input_is_valid() {
        assert!(ScoringInput::default().validate().is_ok());
    }

    #[test]
    fn negative_energy_is_rejected_with_field_name() {
        let mut input = ScoringInput::default();
        input.consumption.actual_kwh = -1.0;
        match input.validate() {
            Err(Error::InvalidInput { field, .. }) => assert_eq!(field, "consumption.actual_kwh"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn negative_device_power_is_rejected() {
        let input = ScoringInput {
            devices: vec![DeviceRecord::new("heater", DeviceCategory::Hvac, -2.0)],
            ..ScoringInput::default()
        };
        assert!(matches!(
            input.validate(),
            Err(Error::InvalidInput { ref field, .. }) if field == "devices[0].power_kw"
        ));
    }

    #[test]
    fn device_record_deserializes_with_defaults() {
        let toml = r#"
power_kw = 0.06
category = "lighting"
lighting_type = "led"
"#;
        let device: DeviceRecord = toml::from_str(toml).expect("device should parse");
        assert!(device.is_on);
        assert_eq!(device.category, DeviceCategory::Lighting);
        assert_eq!(device.lighting_type, Some(LightingType::Led));
        assert_eq!(device.efficiency, None);
    }

    #[test]
    fn lighting_base_scores_are_ordered() {
        assert!(LightingType::Led.base_score() > LightingType::Cfl.base_score());
        assert!(LightingType::Cfl.base_score() > LightingType::Halogen.base_score());
        assert!(LightingType::Halogen.base_score() > LightingType::Incandescent.base_score());
    }
}
