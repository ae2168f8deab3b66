//! Time-of-day tariff lookup.

use crate::devices::HourWindow;

use super::types::Tariff;

/// Three-band tariff: peak, off-peak and standard for everything else.
///
/// Peak wins if the two windows overlap.
#[derive(Debug, Clone)]
pub struct TariffSchedule {
    pub peak_window: HourWindow,
    pub off_peak_window: HourWindow,
    pub peak_price: f64,
    pub standard_price: f64,
    pub off_peak_price: f64,
}

impl TariffSchedule {
    /// Returns the band and price per kWh applying at `hour`.
    pub fn at(&self, hour: u32) -> (Tariff, f64) {
        if self.peak_window.contains(hour) {
            (Tariff::Peak, self.peak_price)
        } else if self.off_peak_window.contains(hour) {
            (Tariff::OffPeak, self.off_peak_price)
        } else {
            (Tariff::Standard, self.standard_price)
        }
    }
}

impl Default for TariffSchedule {
    fn default() -> Self {
        Self {
            peak_window: HourWindow::new(17, 21),
            off_peak_window: HourWindow::new(23, 7),
            peak_price: 0.35,
            standard_price: 0.25,
            off_peak_price: 0.18,
        }
    }
}
