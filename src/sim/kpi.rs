//! Energy totals aggregated from a run of snapshots.

use std::fmt;

use serde::Serialize;

use super::types::EnergyFlowSnapshot;

/// Energy totals of a simulated run.
///
/// Computed post-hoc from the snapshots so the totals always agree with
/// the per-tick data. Power is integrated over the tick duration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnergyTotals {
    /// Household consumption (kWh).
    pub consumption_kwh: f64,
    /// Solar production (kWh).
    pub solar_kwh: f64,
    /// Solar used directly by the house (kWh).
    pub solar_self_consumed_kwh: f64,
    /// Energy bought from the grid (kWh).
    pub grid_import_kwh: f64,
    /// Energy sold to the grid (kWh).
    pub grid_export_kwh: f64,
    /// Energy put into the battery (kWh).
    pub battery_charge_kwh: f64,
    /// Energy taken out of the battery (kWh).
    pub battery_discharge_kwh: f64,
    /// Battery equivalent full cycles (throughput / 2*capacity).
    pub battery_equivalent_full_cycles: f64,
    /// Gas burnt by the boiler (m³).
    pub gas_m3: f64,
    /// Cost of the imported energy at the tariff of each tick.
    pub import_cost: f64,
    /// Highest grid import (kW).
    pub peak_import_kw: f64,
    /// Highest household consumption (kW).
    pub peak_consumption_kw: f64,
}

impl EnergyTotals {
    /// Integrates a run of snapshots.
    ///
    /// # Arguments
    ///
    /// * `snapshots` - Snapshots of the run, one per tick
    /// * `tick_hours` - Tick duration in hours
    ///
    /// # Returns
    ///
    /// The totals; all zero for an empty run.
    pub fn from_snapshots(snapshots: &[EnergyFlowSnapshot], tick_hours: f64) -> Self {
        let mut totals = Self::default();
        let mut capacity_kwh = 0.0_f64;

        for s in snapshots {
            totals.consumption_kwh += s.consumption.total_kw * tick_hours;
            totals.solar_kwh += s.solar.production_kw * tick_hours;
            totals.solar_self_consumed_kwh += s.solar.to_house_kw * tick_hours;
            totals.grid_import_kwh += s.grid.import_kw * tick_hours;
            totals.grid_export_kwh += s.grid.export_kw * tick_hours;
            totals.battery_charge_kwh += s.battery.power_kw.max(0.0) * tick_hours;
            totals.battery_discharge_kwh += (-s.battery.power_kw).max(0.0) * tick_hours;
            totals.gas_m3 += s.gas.flow_m3_per_hour * tick_hours;
            totals.import_cost += s.grid.import_kw * tick_hours * s.grid.current_price_per_kwh;
            totals.peak_import_kw = totals.peak_import_kw.max(s.grid.import_kw);
            totals.peak_consumption_kw = totals.peak_consumption_kw.max(s.consumption.total_kw);
            capacity_kwh = capacity_kwh.max(s.battery.capacity_kwh);
        }

        if capacity_kwh > 0.0 {
            totals.battery_equivalent_full_cycles =
                (totals.battery_charge_kwh + totals.battery_discharge_kwh) / (2.0 * capacity_kwh);
        }
        totals
    }

    /// Consumption covered by renewables (kWh).
    ///
    /// Direct solar plus the part of the battery discharge that solar
    /// charged during the run. Never exceeds the solar production.
    pub fn renewable_kwh(&self) -> f64 {
        let from_battery = self.battery_discharge_kwh.min(self.battery_charge_kwh);
        (self.solar_self_consumed_kwh + from_battery).min(self.solar_kwh)
    }
}

impl fmt::Display for EnergyTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Energy Totals ---")?;
        writeln!(
            f,
            "Consumption:           {:.2} kWh (peak {:.2} kW)",
            self.consumption_kwh, self.peak_consumption_kw
        )?;
        writeln!(
            f,
            "Solar production:      {:.2} kWh ({:.2} kWh used on site)",
            self.solar_kwh, self.solar_self_consumed_kwh
        )?;
        writeln!(
            f,
            "Grid import:           {:.2} kWh (peak {:.2} kW)",
            self.grid_import_kwh, self.peak_import_kw
        )?;
        writeln!(f, "Grid export:           {:.2} kWh", self.grid_export_kwh)?;
        writeln!(
            f,
            "Battery in/out:        {:.2} / {:.2} kWh ({:.2} equiv. cycles)",
            self.battery_charge_kwh, self.battery_discharge_kwh, self.battery_equivalent_full_cycles
        )?;
        writeln!(f, "Gas:                   {:.2} m3", self.gas_m3)?;
        write!(f, "Import cost:           {:.2}", self.import_cost)
    }
}
