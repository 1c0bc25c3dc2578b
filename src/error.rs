//! Error types for the planetary hour calculations.
//!
//! The calculation core reports failures through [`CalculationError`]. Application layers
//! (configuration, CLI, the binary) work with `anyhow::Result` and pick these errors up
//! through `?`.

use thiserror::Error;

/// Errors produced by the solar and planetary hour calculations.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CalculationError {
    /// Latitude is non-finite or outside [-90, 90] degrees.
    #[error("Invalid latitude: {0}. Must be between -90 and 90 degrees")]
    InvalidLatitude(f64),

    /// Longitude is non-finite or outside [-180, 180] degrees.
    #[error("Invalid longitude: {0}. Must be between -180 and 180 degrees")]
    InvalidLongitude(f64),

    /// A trigonometric step produced NaN or infinity.
    #[error("Solar calculation produced a non-finite {quantity}")]
    NonFiniteResult { quantity: &'static str },

    /// The computed instant cannot be represented.
    #[error("Computed {what} for {date} is outside the representable time range")]
    TimestampOutOfRange {
        what: &'static str,
        date: chrono::NaiveDate,
    },
}

/// Convenience alias for results of the calculation core.
pub type CalculationResult<T> = std::result::Result<T, CalculationError>;
