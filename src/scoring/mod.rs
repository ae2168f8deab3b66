//! Sustainability scoring: bounded metrics derived from consumption,
//! production and the device inventory.

pub mod efficiency;
/// Plain-data inputs.
pub mod inputs;
pub mod metrics;
/// Full metric record and its entry point.
pub mod report;

pub use inputs::{
    ConsumptionSummary, DeviceCategory, DeviceRecord, LightingType, ProductionSummary, ScoringInput,
};
pub use report::{SustainabilityMetrics, compute_sustainability_metrics};
