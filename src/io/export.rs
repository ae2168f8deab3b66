//! CSV export for energy-flow snapshots.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::EnergyFlowSnapshot;

/// Column header for CSV snapshot export.
pub const HEADER: &str = "timestamp,hour,solar_kw,solar_to_house_kw,solar_to_grid_kw,\
                          solar_to_battery_kw,consumption_kw,base_kw,heat_pump_kw,ev_kw,\
                          battery_kw,battery_soc_pct,grid_import_kw,grid_export_kw,\
                          price_per_kwh,tariff,gas_m3_per_hour";

/// Exports snapshots to a CSV file at the given path.
///
/// Writes a header row followed by one data row per snapshot. Produces
/// deterministic output for identical inputs.
///
/// # Arguments
///
/// * `snapshots` - Snapshots of a run
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(snapshots: &[EnergyFlowSnapshot], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(snapshots, buf)
}

/// Writes snapshots as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(snapshots: &[EnergyFlowSnapshot], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for s in snapshots {
        wtr.write_record(&[
            s.timestamp.to_rfc3339(),
            s.hour.to_string(),
            format!("{:.4}", s.solar.production_kw),
            format!("{:.4}", s.solar.to_house_kw),
            format!("{:.4}", s.solar.to_grid_kw),
            format!("{:.4}", s.solar.to_battery_kw),
            format!("{:.4}", s.consumption.total_kw),
            format!("{:.4}", s.consumption.base_kw),
            format!("{:.4}", s.heat_pump.power_kw),
            format!("{:.4}", s.ev.power_kw),
            format!("{:.4}", s.battery.power_kw),
            format!("{:.2}", s.battery.soc_pct),
            format!("{:.4}", s.grid.import_kw),
            format!("{:.4}", s.grid.export_kw),
            format!("{:.2}", s.grid.current_price_per_kwh),
            s.grid.tariff.to_string(),
            format!("{:.4}", s.gas.flow_m3_per_hour),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
