//! Bucket boundary arithmetic.

use barscope_types::{BarscopeError, Result};
use chrono::{DateTime, TimeDelta, Utc};

/// Validates a bucket width and returns it in milliseconds.
///
/// # Errors
///
/// Returns [`BarscopeError::InvalidPeriod`] if the period is not positive, is
/// shorter than one millisecond, or is not a whole number of milliseconds.
pub fn period_millis(period: TimeDelta) -> Result<i64> {
    if period <= TimeDelta::zero() {
        return Err(BarscopeError::InvalidPeriod {
            period,
            reason: "period must be positive",
        });
    }
    match period.num_milliseconds() {
        0 => Err(BarscopeError::InvalidPeriod {
            period,
            reason: "period must be at least one millisecond",
        }),
        ms if period != TimeDelta::milliseconds(ms) => Err(BarscopeError::InvalidPeriod {
            period,
            reason: "period must be a whole number of milliseconds",
        }),
        ms => Ok(ms),
    }
}

/// Returns the start of the bucket containing `timestamp`.
///
/// The start is the largest multiple of `period_ms` since the Unix epoch that
/// is not after `timestamp`. Euclidean remainder keeps pre-epoch timestamps
/// flooring downwards. Returns `None` if the boundary is not representable.
#[must_use]
pub fn bucket_start(timestamp: DateTime<Utc>, period_ms: i64) -> Option<DateTime<Utc>> {
    let ms = timestamp.timestamp_millis();
    DateTime::from_timestamp_millis(ms - ms.rem_euclid(period_ms))
}
