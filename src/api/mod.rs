//! REST API over a simulated day and the scorer.
//!
//! Endpoints:
//! - `GET /state`: simulator settings, totals, metrics, achievements and the latest snapshot
//! - `GET /snapshots?page=&page_size=`: paginated snapshots of the run
//! - `GET /snapshot?hour=&seed=`: one freshly simulated snapshot
//! - `POST /metrics`: scores a posted `ScoringInput`

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::gamification::CatalogSet;
use crate::runner::DayRun;
use crate::sim::FlowSimulator;

pub use types::{ErrorResponse, MetricsResponse, SnapshotQuery, SnapshotsQuery, StateResponse};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the day run completes and wrapped in `Arc`; no
/// locks are needed since all data is read-only.
pub struct AppState {
    /// Simulator used for on-demand snapshots.
    pub simulator: FlowSimulator,
    /// Catalogs used to evaluate posted metrics.
    pub catalogs: CatalogSet,
    /// The completed day run.
    pub run: DayRun,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/snapshots", get(handlers::get_snapshots))
        .route("/snapshot", get(handlers::get_snapshot))
        .route("/metrics", post(handlers::post_metrics))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
