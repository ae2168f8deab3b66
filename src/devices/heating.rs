//! Space-heating models: an electric heat pump and a gas boiler.
//!
//! Both run only inside the heating windows (morning and evening by default)
//! and sample their draw within fixed bounds when active.

use rand::Rng;

use crate::devices::types::{HourWindow, sample_range};

/// Energy content of natural gas (kWh per m³).
pub const GAS_KWH_PER_M3: f64 = 10.55;

/// Air-source heat pump.
#[derive(Debug, Clone)]
pub struct HeatPump {
    /// Windows during which the heat pump runs.
    pub windows: Vec<HourWindow>,
    /// Electrical draw range while running (kW).
    pub power_kw: (f64, f64),
    /// Coefficient-of-performance range while running.
    pub cop: (f64, f64),
}

/// One sampled heat-pump operating point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPumpSample {
    pub active: bool,
    pub power_kw: f64,
    pub cop: f64,
}

impl HeatPump {
    pub fn new(windows: Vec<HourWindow>, power_kw: (f64, f64), cop: (f64, f64)) -> Self {
        Self {
            windows,
            power_kw,
            cop,
        }
    }

    /// Returns `true` when the heat pump runs at `hour`.
    pub fn is_active(&self, hour: u32) -> bool {
        HourWindow::any_contains(&self.windows, hour)
    }

    /// Samples electrical draw and COP together. Both are zero when idle.
    pub fn sample<R: Rng + ?Sized>(&self, hour: u32, rng: &mut R) -> HeatPumpSample {
        if !self.is_active(hour) {
            return HeatPumpSample {
                active: false,
                power_kw: 0.0,
                cop: 0.0,
            };
        }
        HeatPumpSample {
            active: true,
            power_kw: sample_range(rng, self.power_kw.0, self.power_kw.1),
            cop: sample_range(rng, self.cop.0, self.cop.1),
        }
    }
}

/// Gas boiler backing up the heat pump.
#[derive(Debug, Clone)]
pub struct GasBoiler {
    /// Windows during which gas is burnt.
    pub windows: Vec<HourWindow>,
    /// Flow range while burning (m³/h).
    pub flow_m3_per_hour: (f64, f64),
}

impl GasBoiler {
    pub fn new(windows: Vec<HourWindow>, flow_m3_per_hour: (f64, f64)) -> Self {
        Self {
            windows,
            flow_m3_per_hour,
        }
    }

    /// Returns `true` when the boiler burns gas at `hour`.
    pub fn is_active(&self, hour: u32) -> bool {
        HourWindow::any_contains(&self.windows, hour)
    }

    /// Samples the gas flow (m³/h); zero outside the heating windows.
    pub fn sample_flow<R: Rng + ?Sized>(&self, hour: u32, rng: &mut R) -> f64 {
        if self.is_active(hour) {
            sample_range(rng, self.flow_m3_per_hour.0, self.flow_m3_per_hour.1)
        } else {
            0.0
        }
    }
}
