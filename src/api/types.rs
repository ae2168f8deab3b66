//! API response and query types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::gamification::GamificationReport;
use crate::scoring::SustainabilityMetrics;
use crate::sim::{EnergyFlowSnapshot, EnergyTotals, SimConfig};

/// Page size used when `page_size` is omitted: one day of hourly ticks.
pub const DEFAULT_PAGE_SIZE: usize = 24;

/// Summary of the simulated day.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub date: NaiveDate,
    pub seed: u64,
    /// Simulator settings.
    pub config: SimConfig,
    pub totals: EnergyTotals,
    pub metrics: SustainabilityMetrics,
    pub gamification: GamificationReport,
    /// Last snapshot of the run, if any.
    pub latest_snapshot: Option<EnergyFlowSnapshot>,
}

/// Metrics and achievements for a posted scoring input.
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub metrics: SustainabilityMetrics,
    pub gamification: GamificationReport,
}

/// Pagination parameters for the snapshot listing.
#[derive(Debug, Deserialize)]
pub struct SnapshotsQuery {
    /// 1-based page number; defaults to 1.
    pub page: Option<usize>,
    /// Items per page; defaults to [`DEFAULT_PAGE_SIZE`].
    pub page_size: Option<usize>,
}

/// Parameters for simulating a single hour.
#[derive(Debug, Deserialize)]
pub struct SnapshotQuery {
    /// Hour of day (0-23).
    pub hour: u32,
    /// Generator seed; defaults to the run seed.
    pub seed: Option<u64>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

impl ErrorResponse {
    pub fn new(err: impl std::fmt::Display) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}
