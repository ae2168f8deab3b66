//! Household power balance: solar allocation and grid settlement.

use super::types::SolarFlow;

/// Splits solar production between the house, the battery and the grid.
///
/// The house is served first, the battery takes what it is charging with
/// (never more than the remainder), and whatever is left is exported. The
/// three shares always add up to `production_kw`.
///
/// # Arguments
///
/// * `production_kw` - Solar production (kW, >= 0)
/// * `consumption_kw` - Household consumption (kW, >= 0)
/// * `battery_kw` - Battery power (positive=charge, negative=discharge)
pub fn split_solar(production_kw: f64, consumption_kw: f64, battery_kw: f64) -> SolarFlow {
    let production_kw = production_kw.max(0.0);
    let to_house_kw = production_kw.min(consumption_kw.max(0.0));
    let remainder = production_kw - to_house_kw;
    let to_battery_kw = battery_kw.max(0.0).min(remainder);
    let to_grid_kw = (remainder - to_battery_kw).max(0.0);

    SolarFlow {
        production_kw,
        to_house_kw,
        to_grid_kw,
        to_battery_kw,
    }
}

/// Settles the household against the grid.
///
/// `net = production - battery - consumption`; a deficit is imported and a
/// surplus is exported. Exactly one side of the returned pair can be
/// non-zero.
///
/// # Returns
///
/// `(import_kw, export_kw)`, both `>= 0`
pub fn settle_grid(production_kw: f64, battery_kw: f64, consumption_kw: f64) -> (f64, f64) {
    let net = production_kw - battery_kw - consumption_kw;
    if net < 0.0 {
        (-net, 0.0)
    } else if net > 0.0 {
        (0.0, net)
    } else {
        (0.0, 0.0)
    }
}
