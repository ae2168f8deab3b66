/// Day clock yielding tick timestamps.
pub mod clock;
pub mod engine;
pub mod kpi;
pub mod power_balance;
/// Time-of-use pricing.
pub mod tariff;
pub mod types;

pub use engine::FlowSimulator;
pub use kpi::EnergyTotals;
pub use types::{EnergyFlowSnapshot, SimConfig, SocModel};
