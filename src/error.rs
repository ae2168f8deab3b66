//! Crate-wide error type.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the simulator, the scorer and the helpers around them.
///
/// Missing data (zero denominators, empty peer samples, empty device lists)
/// is never an error: those cases resolve to documented defaults.
#[derive(Debug, Error)]
pub enum Error {
    /// A domain value outside its valid range, e.g. an hour of 24 or a
    /// negative energy total.
    #[error("invalid input: {field} {message}")]
    InvalidInput {
        /// Name of the offending argument or field.
        field: String,
        /// Constraint that was violated.
        message: String,
    },

    /// Scenario or catalog configuration could not be loaded or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Shorthand for [`Error::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Rejects negative and non-finite values for quantities that must be `>= 0`.
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(Error::invalid_input(
            field,
            format!("must be a finite value >= 0, got {value}"),
        ))
    }
}
