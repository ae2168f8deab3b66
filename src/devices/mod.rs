//! Household subsystem models used by the flow simulator.

/// Activity-driven household base load.
pub mod baseload;
/// Home battery storage model.
pub mod battery;
/// Overnight electric vehicle charger.
pub mod ev_charger;
pub mod heating;
/// Rooftop solar generation model.
pub mod solar;
pub mod types;

// Re-export the main types for convenience
pub use baseload::BaseLoad;
pub use battery::Battery;
pub use ev_charger::EvCharger;
pub use heating::{GasBoiler, HeatPump};
pub use solar::SolarPv;
pub use types::{Device, DeviceContext, HourWindow, LoadBand};
