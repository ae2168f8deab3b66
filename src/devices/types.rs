//! Common types and traits for household subsystem models.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of hours in the modelled day.
pub const HOURS_PER_DAY: u32 = 24;

/// Contextual information passed to devices when sampling their power.
#[derive(Debug, Clone, Copy)]
pub struct DeviceContext {
    /// Hour of day (0-23) driving the load shape.
    pub hour: u32,
}

impl DeviceContext {
    pub fn new(hour: u32) -> Self {
        Self { hour }
    }
}

/// Trait defining a household device that produces or consumes electricity.
///
/// Devices are immutable descriptions; all variability comes from the
/// generator handed in by the caller, so the same seed always reproduces the
/// same sample.
pub trait Device {
    /// Returns the sampled power magnitude for the given context.
    ///
    /// # Arguments
    ///
    /// * `context` - Hour of day
    /// * `rng` - Random source owned by the caller
    ///
    /// # Returns
    ///
    /// Power in kilowatts (kW), always `>= 0`
    fn power_kw<R: Rng + ?Sized>(&self, context: &DeviceContext, rng: &mut R) -> f64;
}

/// Half-open window of hours `[start, end)`.
///
/// A window whose `end` is smaller than its `start` wraps past midnight, so
/// `HourWindow::new(23, 6)` covers 23:00 through 05:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HourWindow {
    /// First hour inside the window.
    pub start: u32,
    /// First hour after the window.
    pub end: u32,
}

impl HourWindow {
    /// Creates a window spanning `[start, end)`.
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Returns `true` when `hour` falls inside the window.
    pub fn contains(&self, hour: u32) -> bool {
        if self.start <= self.end {
            hour >= self.start && hour < self.end
        } else {
            hour >= self.start || hour < self.end
        }
    }

    /// Returns `true` if any window in `windows` contains `hour`.
    pub fn any_contains(windows: &[Self], hour: u32) -> bool {
        windows.iter().any(|w| w.contains(hour))
    }
}

/// Named load with a sampling range, used for the room and appliance
/// breakdowns shown next to the consumption total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadBand {
    /// Display name of the room or appliance.
    pub name: String,
    /// Lower bound of the sampled power (kW).
    pub min_kw: f64,
    /// Upper bound of the sampled power (kW).
    pub max_kw: f64,
}

impl LoadBand {
    /// Creates a new named band.
    pub fn new(name: impl Into<String>, min_kw: f64, max_kw: f64) -> Self {
        Self {
            name: name.into(),
            min_kw,
            max_kw,
        }
    }

    /// Draws one power value from the band.
    pub fn sample_kw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        sample_range(rng, self.min_kw, self.max_kw)
    }
}

/// Validates an hour of day, rejecting anything outside `0..=23`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for `hour >= 24`.
pub fn validate_hour(hour: u32) -> Result<u32> {
    if hour < HOURS_PER_DAY {
        Ok(hour)
    } else {
        Err(Error::invalid_input(
            "hour",
            format!("must be in 0..=23, got {hour}"),
        ))
    }
}

/// Fraction of peak solar output for an hour, following a half-sine
/// envelope between sunrise and sunset (both inclusive, both zero).
///
/// # Arguments
///
/// * `hour` - Hour of day
/// * `sunrise_hour` - First hour of the daylight window
/// * `sunset_hour` - Last hour of the daylight window
///
/// # Returns
///
/// A value in `[0.0, 1.0]`, peaking at the midpoint of the window.
pub fn daylight_frac(hour: u32, sunrise_hour: u32, sunset_hour: u32) -> f64 {
    if sunset_hour <= sunrise_hour || hour < sunrise_hour || hour > sunset_hour {
        return 0.0;
    }
    let x = f64::from(hour - sunrise_hour) / f64::from(sunset_hour - sunrise_hour);
    (std::f64::consts::PI * x).sin().clamp(0.0, 1.0)
}

/// Draws a uniform sample from `[min, max)`, returning `min` for an empty range.
pub fn sample_range<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min.max(0.0)
    }
}
