use rand::Rng;

use crate::devices::types::{Device, DeviceContext, HourWindow, LoadBand, sample_range};

/// A household base-load generator driven by human activity bands.
///
/// `BaseLoad` samples a higher demand range inside the activity windows
/// (morning and evening by default) and a lower off-peak floor otherwise.
/// It also carries the room and appliance bands used for the informative
/// consumption breakdowns.
///
/// # Examples
///
/// ```
/// use prosumer_engine::devices::baseload::BaseLoad;
/// use prosumer_engine::devices::{Device, DeviceContext, HourWindow};
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let load = BaseLoad::new(
///     vec![HourWindow::new(6, 9), HourWindow::new(18, 22)],
///     (1.5, 3.0), // active band (kW)
///     (0.4, 1.2), // off-peak band (kW)
/// );
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let evening = load.power_kw(&DeviceContext::new(19), &mut rng);
/// assert!(evening >= 1.5);
/// ```
#[derive(Debug, Clone)]
pub struct BaseLoad {
    /// Windows of elevated household activity.
    pub active_windows: Vec<HourWindow>,

    /// Demand range inside the activity windows (kW).
    pub active_kw: (f64, f64),

    /// Demand range outside the activity windows (kW).
    pub off_peak_kw: (f64, f64),

    /// Per-room breakdown bands.
    pub rooms: Vec<LoadBand>,

    /// Per-appliance breakdown bands.
    pub appliances: Vec<LoadBand>,
}

impl BaseLoad {
    /// Creates a new base-load generator with empty breakdown catalogs.
    ///
    /// # Arguments
    ///
    /// * `active_windows` - Hours of elevated activity
    /// * `active_kw` - `(min, max)` demand inside the windows
    /// * `off_peak_kw` - `(min, max)` demand outside the windows
    pub fn new(
        active_windows: Vec<HourWindow>,
        active_kw: (f64, f64),
        off_peak_kw: (f64, f64),
    ) -> Self {
        Self {
            active_windows,
            active_kw,
            off_peak_kw,
            rooms: Vec::new(),
            appliances: Vec::new(),
        }
    }

    /// Attaches room and appliance bands for the breakdowns.
    pub fn with_breakdowns(mut self, rooms: Vec<LoadBand>, appliances: Vec<LoadBand>) -> Self {
        self.rooms = rooms;
        self.appliances = appliances;
        self
    }

    /// Returns `true` when `hour` is inside an activity window.
    pub fn is_active(&self, hour: u32) -> bool {
        HourWindow::any_contains(&self.active_windows, hour)
    }

    /// Samples one value per room band.
    pub fn sample_rooms<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<(String, f64)> {
        sample_bands(&self.rooms, rng)
    }

    /// Samples one value per appliance band.
    pub fn sample_appliances<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<(String, f64)> {
        sample_bands(&self.appliances, rng)
    }
}

fn sample_bands<R: Rng + ?Sized>(bands: &[LoadBand], rng: &mut R) -> Vec<(String, f64)> {
    bands
        .iter()
        .map(|band| (band.name.clone(), band.sample_kw(rng)))
        .collect()
}

impl Device for BaseLoad {
    /// Returns the sampled base demand, never negative.
    fn power_kw<R: Rng + ?Sized>(&self, context: &DeviceContext, rng: &mut R) -> f64 {
        let (min, max) = if self.is_active(context.hour) {
            self.active_kw
        } else {
            self.off_peak_kw
        };
        sample_range(rng, min, max).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn load() -> BaseLoad {
        BaseLoad::new(
            vec![HourWindow::new(6, 9), HourWindow::new(18, 22)],
            (1.5, 3.0),
            (0.4, 1.2),
        )
    }

    #[test]
    fn active_hours_sample_higher_band() {
        let load = load();
        let mut rng = StdRng::seed_from_u64(1);
        for hour in [6, 7, 8, 18, 19, 20, 21] {
            let kw = load.power_kw(&DeviceContext::new(hour), &mut rng);
            assert!((1.5..3.0).contains(&kw), "hour {hour}: {kw}");
        }
    }

    #[test]
    fn off_peak_hours_sample_floor_band() {
        let load = load();
        let mut rng = StdRng::seed_from_u64(1);
        for hour in [0, 3, 5, 9, 12, 17, 22, 23] {
            let kw = load.power_kw(&DeviceContext::new(hour), &mut rng);
            assert!((0.4..1.2).contains(&kw), "hour {hour}: {kw}");
        }
    }

    #[test]
    fn breakdowns_follow_bands() {
        let load = load().with_breakdowns(
            vec![LoadBand::new("Kitchen", 0.2, 0.8)],
            vec![LoadBand::new("Fridge", 0.1, 0.2), LoadBand::new("TV", 0.05, 0.3)],
        );
        let mut rng = StdRng::seed_from_u64(9);
        let rooms = load.sample_rooms(&mut rng);
        let appliances = load.sample_appliances(&mut rng);
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].0, "Kitchen");
        assert!((0.2..0.8).contains(&rooms[0].1));
        assert_eq!(appliances.len(), 2);
        assert_eq!(appliances[1].0, "TV");
    }

    #[test]
    fn same_seed_same_demand() {
        let load = load();
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);
        for hour in 0..24 {
            let ctx = DeviceContext::new(hour);
            assert_eq!(load.power_kw(&ctx, &mut rng1), load.power_kw(&ctx, &mut rng2));
        }
    }
}
