use rand::Rng;

use crate::devices::types::{Device, DeviceContext, HourWindow, sample_range};

/// Overnight electric-vehicle charger.
///
/// The car is plugged in during the charging window (late night by default)
/// and draws a power sampled from a wider range than the household base load.
/// Outside the window the charger is idle.
#[derive(Debug, Clone)]
pub struct EvCharger {
    /// Window during which the vehicle charges.
    pub window: HourWindow,

    /// Minimum charging power while active (kW).
    pub min_charge_kw: f64,

    /// Maximum charging power while active (kW).
    pub max_charge_kw: f64,
}

impl EvCharger {
    /// Creates a new EV charger.
    ///
    /// # Arguments
    ///
    /// * `window` - Hours during which the vehicle charges
    /// * `min_charge_kw` - Lower bound of the sampled charging power
    /// * `max_charge_kw` - Upper bound of the sampled charging power
    ///
    /// # Panics
    ///
    /// Panics if either bound is negative or `min_charge_kw > max_charge_kw`.
    pub fn new(window: HourWindow, min_charge_kw: f64, max_charge_kw: f64) -> Self {
        assert!(min_charge_kw >= 0.0 && max_charge_kw >= 0.0);
        assert!(min_charge_kw <= max_charge_kw);
        Self {
            window,
            min_charge_kw,
            max_charge_kw,
        }
    }

    /// Returns `true` when the vehicle is charging at `hour`.
    pub fn is_charging(&self, hour: u32) -> bool {
        self.window.contains(hour)
    }
}

impl Device for EvCharger {
    /// Returns charging power inside the window, otherwise `0.0`.
    fn power_kw<R: Rng + ?Sized>(&self, context: &DeviceContext, rng: &mut R) -> f64 {
        if !self.is_charging(context.hour) {
            return 0.0;
        }
        sample_range(rng, self.min_charge_kw, self.max_charge_kw)
    }
}
