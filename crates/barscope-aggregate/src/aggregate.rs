//! Bar-to-bar OHLCV resampling.

use barscope_types::{Bar, BarRecord, BarSeries, BarscopeError, Result, Timeframe};
use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use crate::bucket::{bucket_start, period_millis};

/// Streaming bar aggregator.
///
/// Folds time-ordered bars into coarser bars of a fixed period. A bar is
/// emitted once a later bucket begins; [`BarAggregator::finish`] emits the
/// last open bucket.
#[derive(Debug)]
pub struct BarAggregator {
    period: TimeDelta,
    period_ms: i64,
    current_bar: Option<BarBuilder>,
    last_timestamp: Option<DateTime<Utc>>,
    processed: usize,
}

impl BarAggregator {
    /// Creates a new aggregator for the given period.
    ///
    /// # Errors
    ///
    /// Returns [`BarscopeError::InvalidPeriod`] if the period is not positive.
    pub fn new(period: TimeDelta) -> Result<Self> {
        Ok(Self {
            period,
            period_ms: period_millis(period)?,
            current_bar: None,
            last_timestamp: None,
            processed: 0,
        })
    }

    /// Returns the period being aggregated to.
    #[must_use]
    pub const fn period(&self) -> TimeDelta {
        self.period
    }

    /// Processes a bar, potentially emitting a completed bar.
    ///
    /// Returns `Ok(Some(bar))` when this bar opens a new bucket and thereby
    /// completes the previous one, `Ok(None)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`BarscopeError::UnorderedInput`] if the bar does not come
    /// strictly after the previously processed bar.
    pub fn process(&mut self, bar: &Bar) -> Result<Option<Bar>> {
        let index = self.processed;
        if let Some(previous) = self.last_timestamp
            && bar.timestamp <= previous
        {
            return Err(BarscopeError::UnorderedInput {
                index,
                previous,
                current: bar.timestamp,
            });
        }

        let start = bucket_start(bar.timestamp, self.period_ms).ok_or(
            BarscopeError::InvalidPeriod {
                period: self.period,
                reason: "bucket boundary is out of the representable range",
            },
        )?;
        self.last_timestamp = Some(bar.timestamp);
        self.processed += 1;

        match self.current_bar.take() {
            Some(mut builder) if builder.timestamp == start => {
                builder.update(bar);
                self.current_bar = Some(builder);
                Ok(None)
            }
            Some(builder) => {
                let completed = builder.finish();
                self.current_bar = Some(BarBuilder::new(start, bar));
                Ok(Some(completed))
            }
            None => {
                self.current_bar = Some(BarBuilder::new(start, bar));
                Ok(None)
            }
        }
    }

    /// Finishes aggregation, returning any remaining partial bar.
    #[must_use]
    pub fn finish(self) -> Option<Bar> {
        self.current_bar.map(BarBuilder::finish)
    }
}

/// Builder for a single coarse bar.
#[derive(Debug)]
struct BarBuilder {
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl BarBuilder {
    /// Creates a new builder from the first bar in the bucket.
    const fn new(timestamp: DateTime<Utc>, bar: &Bar) -> Self {
        Self {
            timestamp,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }

    /// Folds a later bar of the same bucket into the builder.
    fn update(&mut self, bar: &Bar) {
        self.high = self.high.max(bar.high);
        self.low = self.low.min(bar.low);
        self.close = bar.close;
        self.volume += bar.volume;
    }

    /// Finishes building and returns the bar.
    const fn finish(self) -> Bar {
        Bar::new(
            self.timestamp,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
        )
    }
}

/// Resamples `source` into bars of width `period`.
///
/// Each output bar covers one non-empty, epoch-aligned bucket: open of the
/// first source bar, highest high, lowest low, close of the last source bar,
/// summed volume, timestamped at the bucket start. Empty buckets are skipped.
///
/// # Errors
///
/// - [`BarscopeError::InvalidPeriod`] if `period` is not positive or is finer
///   than the source's own period.
/// - [`BarscopeError::EmptyInput`] if `source` has no bars.
pub fn aggregate(source: &BarSeries, period: TimeDelta) -> Result<BarSeries> {
    let mut aggregator = BarAggregator::new(period)?;
    if source.is_empty() {
        return Err(BarscopeError::EmptyInput);
    }
    if period < source.period() {
        return Err(BarscopeError::InvalidPeriod {
            period,
            reason: "period is finer than the source series",
        });
    }

    let mut bars = Vec::new();
    for bar in source {
        if let Some(completed) = aggregator.process(bar)? {
            bars.push(completed);
        }
    }
    if let Some(bar) = aggregator.finish() {
        bars.push(bar);
    }

    debug!(
        source_bars = source.len(),
        output_bars = bars.len(),
        period_secs = period.num_seconds(),
        "aggregated bar series"
    );

    BarSeries::new(bars, period)
}

/// Resamples `source` into bars of a named timeframe.
///
/// # Errors
///
/// Same as [`aggregate`].
pub fn aggregate_timeframe(source: &BarSeries, timeframe: Timeframe) -> Result<BarSeries> {
    aggregate(source, timeframe.duration())
}

/// Validates raw records as a series of `source_period` bars, then resamples
/// them into bars of width `period`.
///
/// # Errors
///
/// Returns [`BarscopeError::MissingField`] for the first incomplete record,
/// otherwise any error of [`BarSeries::new`] or [`aggregate`].
pub fn aggregate_records<I>(
    records: I,
    source_period: TimeDelta,
    period: TimeDelta,
) -> Result<BarSeries>
where
    I: IntoIterator<Item = BarRecord>,
{
    let source = BarSeries::from_records(records, source_period)?;
    aggregate(&source, period)
}

/// Resamples `source` into each of `timeframes`, in the given order.
///
/// Each result is an independent series.
///
/// # Errors
///
/// Returns the first error encountered.
pub fn aggregate_many(source: &BarSeries, timeframes: &[Timeframe]) -> Result<Vec<BarSeries>> {
    timeframes
        .iter()
        .map(|tf| aggregate_timeframe(source, *tf))
        .collect()
}

/// Resamples `source` into 5-minute bars.
///
/// # Errors
///
/// Same as [`aggregate`].
pub fn to_5min(source: &BarSeries) -> Result<BarSeries> {
    aggregate_timeframe(source, Timeframe::Minute5)
}

/// Resamples `source` into 30-minute bars.
///
/// # Errors
///
/// Same as [`aggregate`].
pub fn to_30min(source: &BarSeries) -> Result<BarSeries> {
    aggregate_timeframe(source, Timeframe::Minute30)
}

/// Resamples `source` into daily bars starting at UTC midnight.
///
/// # Errors
///
/// Same as [`aggregate`].
pub fn to_daily(source: &BarSeries) -> Result<BarSeries> {
    aggregate_timeframe(source, Timeframe::Day1)
}
