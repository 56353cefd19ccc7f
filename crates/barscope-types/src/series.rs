//! Immutable, time-ordered bar series.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use crate::{Bar, BarRecord, BarscopeError, Result};

/// An ordered sequence of bars with a fixed nominal period.
///
/// Timestamps are strictly increasing and every bar satisfies the OHLC
/// price relationships. The bars live behind an [`Arc`], so cloning a series
/// shares them rather than copying; there is no way to mutate a series once
/// it has been built.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    bars: Arc<[Bar]>,
    period: TimeDelta,
}

impl BarSeries {
    /// Builds a series from bars, validating ordering and bar invariants.
    ///
    /// An empty series is allowed; operations that need bars reject it.
    ///
    /// # Errors
    ///
    /// - [`BarscopeError::InvalidPeriod`] if `period` is not positive.
    /// - [`BarscopeError::InvalidBar`] if a bar violates the OHLC relationships.
    /// - [`BarscopeError::UnorderedInput`] if timestamps are not strictly increasing.
    pub fn new(bars: Vec<Bar>, period: TimeDelta) -> Result<Self> {
        if period <= TimeDelta::zero() {
            return Err(BarscopeError::InvalidPeriod {
                period,
                reason: "period must be positive",
            });
        }

        for (index, bar) in bars.iter().enumerate() {
            bar.check(index)?;
        }

        if let Some(index) = bars
            .windows(2)
            .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(BarscopeError::UnorderedInput {
                index: index + 1,
                previous: bars[index].timestamp,
                current: bars[index + 1].timestamp,
            });
        }

        Ok(Self {
            bars: bars.into(),
            period,
        })
    }

    /// Builds a series from raw records.
    ///
    /// # Errors
    ///
    /// Returns [`BarscopeError::MissingField`] for the first incomplete
    /// record, otherwise any error of [`BarSeries::new`].
    pub fn from_records<I>(records: I, period: TimeDelta) -> Result<Self>
    where
        I: IntoIterator<Item = BarRecord>,
    {
        let bars = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_bar(index))
            .collect::<Result<Vec<_>>>()?;
        Self::new(bars, period)
    }

    /// Returns the bars as a slice.
    #[must_use]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Returns the nominal period of each bar.
    #[must_use]
    pub const fn period(&self) -> TimeDelta {
        self.period
    }

    /// Returns the number of bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Returns true if the series holds no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Returns the first bar, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    /// Returns the last bar, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Returns the timestamps of the first and last bar.
    #[must_use]
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.first()?.timestamp, self.last()?.timestamp))
    }

    /// Returns an iterator over the bars.
    pub fn iter(&self) -> std::slice::Iter<'_, Bar> {
        self.bars.iter()
    }

    /// Returns an iterator over the closing prices.
    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|bar| bar.close)
    }

    /// Returns the summed volume of all bars.
    #[must_use]
    pub fn total_volume(&self) -> f64 {
        self.bars.iter().map(|bar| bar.volume).sum()
    }

    /// Returns true if both series share the same underlying bar storage.
    #[must_use]
    pub fn shares_bars_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.bars, &other.bars)
    }
}

impl<'a> IntoIterator for &'a BarSeries {
    type Item = &'a Bar;
    type IntoIter = std::slice::Iter<'a, Bar>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
