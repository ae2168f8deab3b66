use crate::devices::types::{Device, DeviceContext, daylight_frac, sample_range};
use rand::Rng;

/// A rooftop solar array that models generation over the daylight window.
///
/// `SolarPv` creates a half-sine generation profile between sunrise and sunset
/// hours, scaled by a random irradiance factor to emulate passing clouds.
/// Output is exactly zero outside the window and single-humped inside it.
#[derive(Debug, Clone)]
pub struct SolarPv {
    /// Maximum power output in kilowatts under clear skies.
    pub kw_peak: f64,

    /// First daylight hour (inclusive, output is zero at the edge).
    pub sunrise_hour: u32,

    /// Last daylight hour (inclusive, output is zero at the edge).
    pub sunset_hour: u32,

    /// Lower bound of the irradiance multiplier.
    pub irradiance_min: f64,

    /// Upper bound of the irradiance multiplier.
    pub irradiance_max: f64,
}

impl SolarPv {
    /// Creates a new solar array with the specified parameters.
    ///
    /// # Arguments
    ///
    /// * `kw_peak` - Maximum power output in kilowatts
    /// * `sunrise_hour` - First hour of the daylight window
    /// * `sunset_hour` - Last hour of the daylight window
    /// * `irradiance_min` - Lower bound of the cloud multiplier (e.g. 0.6)
    /// * `irradiance_max` - Upper bound of the cloud multiplier (e.g. 1.0)
    ///
    /// # Panics
    ///
    /// Panics if `sunrise_hour >= sunset_hour` or `sunset_hour > 23`.
    pub fn new(
        kw_peak: f64,
        sunrise_hour: u32,
        sunset_hour: u32,
        irradiance_min: f64,
        irradiance_max: f64,
    ) -> Self {
        assert!(sunrise_hour < sunset_hour && sunset_hour < 24);
        let irradiance_min = irradiance_min.clamp(0.0, 1.0);
        Self {
            kw_peak: kw_peak.max(0.0),
            sunrise_hour,
            sunset_hour,
            irradiance_min,
            irradiance_max: irradiance_max.clamp(irradiance_min, 1.0),
        }
    }

    /// Clear-sky output for an hour (kW), before the irradiance factor.
    pub fn clear_sky_kw(&self, hour: u32) -> f64 {
        self.kw_peak * daylight_frac(hour, self.sunrise_hour, self.sunset_hour)
    }
}

impl Device for SolarPv {
    /// Returns production in kW. Zero outside the daylight window; the
    /// generator is only consumed during daylight.
    fn power_kw<R: Rng + ?Sized>(&self, context: &DeviceContext, rng: &mut R) -> f64 {
        let clear_sky = self.clear_sky_kw(context.hour);
        if clear_sky <= 0.0 {
            return 0.0;
        }

        let irradiance = sample_range(rng, self.irradiance_min, self.irradiance_max);
        (clear_sky * irradiance).max(0.0)
    }
}
