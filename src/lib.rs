//! Household energy-prosumer engine: an energy-flow simulator, a
//! sustainability scorer, and a certification, badge and points engine.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod devices;
pub mod error;
/// Certifications, badges, points and levels.
pub mod gamification;
pub mod io;
pub mod pagination;
pub mod runner;
/// Sustainability metrics from consumption, production and devices.
pub mod scoring;
/// Flow simulator, power balance, tariffs and run totals.
pub mod sim;
pub mod telemetry;

pub use error::{Error, Result};
