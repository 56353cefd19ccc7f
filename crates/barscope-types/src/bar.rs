//! OHLCV bar representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BarscopeError, Result};

/// A single OHLCV observation over the half-open bucket `[timestamp, timestamp + period)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bucket start time (UTC).
    pub timestamp: DateTime<Utc>,
    /// Opening price.
    pub open: f64,
    /// Highest price during the bucket.
    pub high: f64,
    /// Lowest price during the bucket.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume.
    pub volume: f64,
}

impl Bar {
    /// Creates a new bar.
    #[must_use]
    pub const fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Returns the body size (|close - open|).
    #[must_use]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Returns true if this is a bullish (green) bar.
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Returns true if this is a bearish (red) bar.
    #[must_use]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Returns the typical price ((high + low + close) / 3).
    #[must_use]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Checks the OHLC price relationships and volume sign.
    ///
    /// `index` is only used to locate the bar in the returned error.
    ///
    /// # Errors
    ///
    /// Returns [`BarscopeError::InvalidBar`] if a price is not a positive
    /// finite number, if `open` or `close` fall outside `[low, high]`, or if
    /// the volume is negative or not finite.
    pub fn check(&self, index: usize) -> Result<()> {
        let invalid = |reason: String| -> Result<()> {
            Err(BarscopeError::InvalidBar { index, reason })
        };

        for (name, price) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !price.is_finite() || price <= 0.0 {
                return invalid(format!("{name} must be a positive price, got {price}"));
            }
        }
        if self.low > self.high {
            return invalid(format!("low {} exceeds high {}", self.low, self.high));
        }
        if self.open < self.low || self.open > self.high {
            return invalid(format!(
                "open {} outside [{}, {}]",
                self.open, self.low, self.high
            ));
        }
        if self.close < self.low || self.close > self.high {
            return invalid(format!(
                "close {} outside [{}, {}]",
                self.close, self.low, self.high
            ));
        }
        if !self.volume.is_finite() || self.volume < 0.0 {
            return invalid(format!("volume must be non-negative, got {}", self.volume));
        }
        Ok(())
    }
}

/// Names of the fields a [`BarRecord`] must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarField {
    /// Bucket start time.
    Timestamp,
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Lowest price.
    Low,
    /// Closing price.
    Close,
    /// Traded volume.
    Volume,
}

impl BarField {
    /// Returns the field name as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Volume => "volume",
        }
    }
}

impl std::fmt::Display for BarField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw bar as delivered by an external source, before completeness checks.
///
/// Any field may be absent; [`BarRecord::into_bar`] turns a complete record
/// into a [`Bar`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BarRecord {
    /// Bucket start time.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Opening price.
    #[serde(default)]
    pub open: Option<f64>,
    /// Highest price.
    #[serde(default)]
    pub high: Option<f64>,
    /// Lowest price.
    #[serde(default)]
    pub low: Option<f64>,
    /// Closing price.
    #[serde(default)]
    pub close: Option<f64>,
    /// Traded volume.
    #[serde(default)]
    pub volume: Option<f64>,
}

impl BarRecord {
    /// Converts the record into a bar.
    ///
    /// # Errors
    ///
    /// Returns [`BarscopeError::MissingField`] naming the first absent field,
    /// checked in the order timestamp, open, high, low, close, volume.
    pub fn into_bar(self, index: usize) -> Result<Bar> {
        let missing = |field| BarscopeError::MissingField { index, field };

        Ok(Bar {
            timestamp: self.timestamp.ok_or_else(|| missing(BarField::Timestamp))?,
            open: self.open.ok_or_else(|| missing(BarField::Open))?,
            high: self.high.ok_or_else(|| missing(BarField::High))?,
            low: self.low.ok_or_else(|| missing(BarField::Low))?,
            close: self.close.ok_or_else(|| missing(BarField::Close))?,
            volume: self.volume.ok_or_else(|| missing(BarField::Volume))?,
        })
    }
}

impl From<Bar> for BarRecord {
    fn from(bar: Bar) -> Self {
        Self {
            timestamp: Some(bar.timestamp),
            open: Some(bar.open),
            high: Some(bar.high),
            low: Some(bar.low),
            close: Some(bar.close),
            volume: Some(bar.volume),
        }
    }
}
