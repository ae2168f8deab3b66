//! Device-inventory efficiency scores.
//!
//! Each score is a power-weighted mean of per-device scores, clamped to
//! `[0, 100]`. Devices without power carry no weight; an empty or
//! weightless inventory scores 0.

use super::inputs::{DeviceCategory, DeviceRecord};

/// Score assumed for a running device that reports no efficiency.
pub const DEFAULT_ON_EFFICIENCY: f64 = 85.0;
/// Score assumed for a lighting device with neither efficiency nor type.
pub const DEFAULT_LIGHTING_EFFICIENCY: f64 = 60.0;
/// Age at which an appliance reaches the maximum wear discount (years).
pub const APPLIANCE_LIFETIME_YEARS: f64 = 20.0;
/// Smallest age factor applied to appliance health.
pub const MIN_AGE_FACTOR: f64 = 0.5;

fn weighted_mean<'a>(
    devices: impl IntoIterator<Item = &'a DeviceRecord>,
    score: impl Fn(&DeviceRecord) -> f64,
) -> f64 {
    let mut weighted = 0.0;
    let mut total_power = 0.0;
    for device in devices {
        let weight = device.power_kw.max(0.0);
        weighted += weight * score(device).clamp(0.0, 100.0);
        total_power += weight;
    }
    if total_power <= 0.0 {
        return 0.0;
    }
    (weighted / total_power).clamp(0.0, 100.0)
}

fn in_category(
    devices: &[DeviceRecord],
    category: DeviceCategory,
) -> impl Iterator<Item = &DeviceRecord> {
    devices.iter().filter(move |d| d.category == category)
}

/// Reported efficiency, or the default for a running device (0 when off).
fn reported_or_default(device: &DeviceRecord) -> f64 {
    match device.efficiency {
        Some(eff) => eff,
        None if device.is_on => DEFAULT_ON_EFFICIENCY,
        None => 0.0,
    }
}

/// Efficiency of the whole inventory.
pub fn device_efficiency(devices: &[DeviceRecord]) -> f64 {
    weighted_mean(devices, reported_or_default)
}

/// Efficiency of the EV chargers.
pub fn ev_efficiency(devices: &[DeviceRecord]) -> f64 {
    weighted_mean(in_category(devices, DeviceCategory::EvCharger), reported_or_default)
}

/// Efficiency of the heating, ventilation and cooling equipment.
pub fn hvac_efficiency(devices: &[DeviceRecord]) -> f64 {
    weighted_mean(in_category(devices, DeviceCategory::Hvac), reported_or_default)
}

/// Efficiency of the lighting, falling back to the lamp technology score.
pub fn lighting_efficiency(devices: &[DeviceRecord]) -> f64 {
    weighted_mean(in_category(devices, DeviceCategory::Lighting), |d| {
        d.efficiency.unwrap_or_else(|| {
            d.lighting_type
                .map_or(DEFAULT_LIGHTING_EFFICIENCY, |t| t.base_score())
        })
    })
}

/// Wear discount for an appliance of `age_years`: `max(0.5, 1 - age/20)`.
pub fn age_factor(age_years: f64) -> f64 {
    (1.0 - age_years.max(0.0) / APPLIANCE_LIFETIME_YEARS).max(MIN_AGE_FACTOR)
}

/// Health of the appliances: efficiency discounted by age.
pub fn appliance_health(devices: &[DeviceRecord]) -> f64 {
    weighted_mean(in_category(devices, DeviceCategory::Appliance), |d| {
        reported_or_default(d) * age_factor(d.age_years.unwrap_or(0.0))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::inputs::LightingType;
    use approx::assert_relative_eq;

    #[test]
    fn empty_inventory_scores_zero() {
        assert_eq!(device_efficiency(&[]), 0.0);
        assert_eq!(ev_efficiency(&[]), 0.0);
        assert_eq!(lighting_efficiency(&[]), 0.0);
        assert_eq!(hvac_efficiency(&[]), 0.0);
        assert_eq!(appliance_health(&[]), 0.0);
    }

    #[test]
    fn weightless_inventory_scores_zero() {
        let devices =
            vec![DeviceRecord::new("clock", DeviceCategory::Other, 0.0).with_efficiency(90.0)];
        assert_eq!(device_efficiency(&devices), 0.0);
    }

    #[test]
    fn power_weighting() {
        let devices = vec![
            DeviceRecord::new("heat pump", DeviceCategory::Hvac, 3.0).with_efficiency(90.0),
            DeviceRecord::new("fridge", DeviceCategory::Appliance, 1.0).with_efficiency(50.0),
        ];
        assert_relative_eq!(device_efficiency(&devices), 80.0);
    }

    #[test]
    fn unknown_efficiency_defaults_by_power_state() {
        let on = vec![DeviceRecord::new("tv", DeviceCategory::Other, 0.2)];
        let off = vec![DeviceRecord::new("tv", DeviceCategory::Other, 0.2).switched_off()];
        assert_relative_eq!(device_efficiency(&on), 85.0);
        assert_eq!(device_efficiency(&off), 0.0);
    }

    #[test]
    fn reported_efficiency_is_clamped() {
        let devices =
            vec![DeviceRecord::new("x", DeviceCategory::Other, 1.0).with_efficiency(140.0)];
        assert_eq!(device_efficiency(&devices), 100.0);
    }

    #[test]
    fn lighting_uses_technology_score() {
        let devices = vec![
            DeviceRecord::new("hall", DeviceCategory::Lighting, 0.1)
                .with_lighting_type(LightingType::Led),
            DeviceRecord::new("desk", DeviceCategory::Lighting, 0.1)
                .with_lighting_type(LightingType::Incandescent),
            DeviceRecord::new("fridge", DeviceCategory::Appliance, 1.0).with_efficiency(10.0),
        ];
        assert_relative_eq!(lighting_efficiency(&devices), 57.5, epsilon = 1e-9);
    }

    #[test]
    fn lighting_prefers_reported_efficiency() {
        let devices = vec![
            DeviceRecord::new("hall", DeviceCategory::Lighting, 0.1)
                .with_lighting_type(LightingType::Halogen)
                .with_efficiency(90.0),
        ];
        assert_relative_eq!(lighting_efficiency(&devices), 90.0);
    }

    #[test]
    fn age_factor_bounds() {
        assert_eq!(age_factor(0.0), 1.0);
        assert_relative_eq!(age_factor(5.0), 0.75);
        assert_eq!(age_factor(10.0), 0.5);
        assert_eq!(age_factor(30.0), 0.5);
    }

    #[test]
    fn appliance_health_discounts_age() {
        let devices = vec![
            DeviceRecord::new("washer", DeviceCategory::Appliance, 2.0)
                .with_efficiency(80.0)
                .with_age(5.0),
        ];
        assert_relative_eq!(appliance_health(&devices), 60.0, epsilon = 1e-9);
    }

    #[test]
    fn subsystem_scores_ignore_other_categories() {
        let devices = vec![
            DeviceRecord::new("wallbox", DeviceCategory::EvCharger, 7.4).with_efficiency(92.0),
            DeviceRecord::new("ac", DeviceCategory::Hvac, 2.0).with_efficiency(70.0),
        ];
        assert_relative_eq!(ev_efficiency(&devices), 92.0);
        assert_relative_eq!(hvac_efficiency(&devices), 70.0);
        assert_eq!(appliance_health(&devices), 0.0);
    }
}
