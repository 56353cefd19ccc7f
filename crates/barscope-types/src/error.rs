//! Error types for barscope.

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

use crate::BarField;

/// Result type alias for barscope operations.
pub type Result<T> = std::result::Result<T, BarscopeError>;

/// Errors that can occur while building, aggregating or annotating bar series.
///
/// Every variant is raised at the point of the violated precondition, before
/// any output series is produced.
#[derive(Error, Debug)]
pub enum BarscopeError {
    /// The operation needs at least one bar.
    #[error("Cannot operate on an empty bar series")]
    EmptyInput,

    /// The period is zero, negative, or finer than the source series.
    #[error("Invalid period {period}: {reason}")]
    InvalidPeriod {
        /// The rejected period.
        period: TimeDelta,
        /// Why the period was rejected.
        reason: &'static str,
    },

    /// A rolling window size is zero or negative.
    #[error("Invalid window {window} for {metric}: window must be at least 1")]
    InvalidWindow {
        /// The metric the window was configured for.
        metric: String,
        /// The rejected window size.
        window: i64,
    },

    /// An input record lacks a required field.
    #[error("Bar {index} is missing required field '{field}'")]
    MissingField {
        /// Position of the record in the input.
        index: usize,
        /// The absent field.
        field: BarField,
    },

    /// Timestamps are not strictly increasing.
    #[error("Bar {index} at {current} does not follow previous bar at {previous}")]
    UnorderedInput {
        /// Position of the offending bar.
        index: usize,
        /// Timestamp of the preceding bar.
        previous: DateTime<Utc>,
        /// Timestamp of the offending bar.
        current: DateTime<Utc>,
    },

    /// A bar violates the OHLC price relationships or has negative volume.
    #[error("Bar {index} is invalid: {reason}")]
    InvalidBar {
        /// Position of the offending bar.
        index: usize,
        /// Which invariant was violated.
        reason: String,
    },

    /// An external data source failed to deliver records.
    #[error("Source error: {0}")]
    Source(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BarscopeError {
    /// Returns true if the error was caused by the caller's configuration
    /// (period or window) rather than by the data.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidPeriod { .. } | Self::InvalidWindow { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err = BarscopeError::MissingField {
            index: 3,
            field: BarField::Volume,
        };
        assert_eq!(err.to_string(), "Bar 3 is missing required field 'volume'");
    }

    #[test]
    fn test_config_errors() {
        let period = BarscopeError::InvalidPeriod {
            period: TimeDelta::zero(),
            reason: "period must be positive",
        };
        let window = BarscopeError::InvalidWindow {
            metric: "ma".to_string(),
            window: 0,
        };
        assert!(period.is_config_error());
        assert!(window.is_config_error());
        assert!(!BarscopeError::EmptyInput.is_config_error());
    }
}
