//! Series annotation.

use barscope_types::{Bar, BarSeries, BarscopeError, Result};
use chrono::TimeDelta;
use indexmap::IndexMap;
use tracing::debug;

use crate::rolling::{moving_average, rolling_median, round_to, vwap};
use crate::{Metric, MetricsConfig};

/// A bar series plus named metric columns.
///
/// Every column has exactly one entry per bar, in bar order. A `None` entry
/// marks a value that could not be computed (insufficient history or zero
/// cumulative volume). The bars are shared with the series that was
/// annotated, not copied.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedBarSeries {
    series: BarSeries,
    columns: IndexMap<Metric, Vec<Option<f64>>>,
}

impl AnnotatedBarSeries {
    /// Wraps a series with no metric columns.
    #[must_use]
    pub fn new(series: BarSeries) -> Self {
        Self {
            series,
            columns: IndexMap::new(),
        }
    }

    /// Returns the underlying series.
    #[must_use]
    pub const fn series(&self) -> &BarSeries {
        &self.series
    }

    /// Returns the bars.
    #[must_use]
    pub fn bars(&self) -> &[Bar] {
        self.series.bars()
    }

    /// Returns the nominal period of the bars.
    #[must_use]
    pub const fn period(&self) -> TimeDelta {
        self.series.period()
    }

    /// Returns the number of bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Returns true if there are no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Returns the metrics in column order.
    pub fn metrics(&self) -> impl Iterator<Item = &Metric> + '_ {
        self.columns.keys()
    }

    /// Returns the column names in column order.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.columns.keys().map(Metric::name).collect()
    }

    /// Returns the column for `metric`, if it was computed.
    #[must_use]
    pub fn column(&self, metric: &Metric) -> Option<&[Option<f64>]> {
        self.columns.get(metric).map(Vec::as_slice)
    }

    /// Returns the column with the given name (e.g. `"vwap"`), if present.
    #[must_use]
    pub fn column_by_name(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(metric, _)| metric.name() == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Returns the value of `metric` at bar `index`.
    #[must_use]
    pub fn value(&self, metric: &Metric, index: usize) -> Option<f64> {
        self.column(metric)?.get(index).copied().flatten()
    }

    /// Returns an iterator over the columns in order.
    pub fn columns(&self) -> impl Iterator<Item = (&Metric, &[Option<f64>])> + '_ {
        self.columns
            .iter()
            .map(|(metric, values)| (metric, values.as_slice()))
    }

    /// Returns an iterator over rows: each bar with its metric values in
    /// column order.
    pub fn rows(&self) -> impl Iterator<Item = (&Bar, Vec<Option<f64>>)> + '_ {
        self.series.iter().enumerate().map(move |(i, bar)| {
            let values = self.columns.values().map(|column| column[i]).collect();
            (bar, values)
        })
    }

    /// Adds a column; `values` must be aligned with the bars.
    fn insert(&mut self, metric: Metric, values: Vec<Option<f64>>) {
        debug_assert_eq!(values.len(), self.series.len());
        self.columns.insert(metric, values);
    }
}

/// Computes the overlays selected by `config` for `series`.
///
/// The input series is left untouched; the result shares its bars and adds
/// one column per enabled metric, in the order moving average, rolling
/// median, VWAP. Values are rounded to `config.decimals` places.
///
/// # Errors
///
/// - [`BarscopeError::InvalidWindow`] if a configured window is zero.
/// - [`BarscopeError::EmptyInput`] if the series has no bars.
pub fn annotate(series: &BarSeries, config: &MetricsConfig) -> Result<AnnotatedBarSeries> {
    let metrics = config.metrics()?;
    if series.is_empty() {
        return Err(BarscopeError::EmptyInput);
    }

    let closes: Vec<f64> = series.closes().collect();
    let mut annotated = AnnotatedBarSeries::new(series.clone());

    for metric in metrics {
        let raw = match metric {
            Metric::MovingAverage { window } => {
                moving_average(&closes, window, config.window_policy)
            }
            Metric::RollingMedian { window } => {
                rolling_median(&closes, window, config.window_policy)
            }
            Metric::Vwap => vwap(series.bars()),
        };
        let rounded = raw
            .into_iter()
            .map(|value| value.map(|v| round_to(v, config.decimals)))
            .collect();
        annotated.insert(metric, rounded);
    }

    debug!(
        bars = series.len(),
        columns = ?annotated.column_names(),
        "annotated bar series"
    );

    Ok(annotated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WindowPolicy;
    use approx::assert_abs_diff_eq;
    use chrono::{DateTime, TimeZone, Utc};
    use std::num::NonZeroUsize;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap()
    }

    fn five_minute_series(rows: &[(f64, f64, f64, f64, f64)]) -> BarSeries {
        let bars = rows
            .iter()
            .enumerate()
            .map(|(i, &(o, h, l, c, v))| {
                Bar::new(t0() + TimeDelta::minutes(5 * i as i64), o, h, l, c, v)
            })
            .collect();
        BarSeries::new(bars, TimeDelta::minutes(5)).unwrap()
    }

    fn six_bars() -> BarSeries {
        five_minute_series(&[
            (100.0, 102.0, 99.0, 101.0, 1000.0),
            (101.0, 103.0, 100.0, 102.0, 2000.0),
            (102.0, 104.0, 101.0, 103.0, 3000.0),
            (103.0, 105.0, 102.0, 104.0, 4000.0),
            (104.0, 106.0, 103.0, 105.0, 5000.0),
            (105.0, 107.0, 104.0, 106.0, 6000.0),
        ])
    }

    fn ma(n: usize) -> Metric {
        Metric::MovingAverage {
            window: NonZeroUsize::new(n).unwrap(),
        }
    }

    fn median(n: usize) -> Metric {
        Metric::RollingMedian {
            window: NonZeroUsize::new(n).unwrap(),
        }
    }

    #[test]
    fn test_vwap_concrete_scenario() {
        let series = five_minute_series(&[
            (100.0, 102.0, 99.0, 101.0, 1000.0),
            (101.0, 103.0, 100.0, 102.0, 2000.0),
        ]);
        let annotated = annotate(&series, &MetricsConfig::vwap_only()).unwrap();

        assert_eq!(
            annotated.column(&Metric::Vwap).unwrap(),
            &[Some(100.67), Some(101.33)]
        );
    }

    #[test]
    fn test_intermediate_columns() {
        let annotated = annotate(&six_bars(), &MetricsConfig::intermediate()).unwrap();

        assert_eq!(annotated.column_names(), vec!["ma_6", "median_3", "vwap"]);
        for (_, values) in annotated.columns() {
            assert_eq!(values.len(), 6);
            assert!(values.iter().all(Option::is_some));
        }

        // closes 101..=106
        assert_eq!(annotated.value(&ma(6), 0), Some(101.0));
        assert_eq!(annotated.value(&ma(6), 5), Some(103.5));
        assert_eq!(annotated.value(&median(3), 1), Some(101.5));
        assert_eq!(annotated.value(&median(3), 5), Some(105.0));
    }

    #[test]
    fn test_single_bar_degenerates() {
        let series = five_minute_series(&[(100.0, 102.0, 98.0, 101.0, 1000.0)]);
        let annotated = annotate(&series, &MetricsConfig::intermediate()).unwrap();

        assert_eq!(annotated.value(&ma(6), 0), Some(101.0));
        assert_eq!(annotated.value(&median(3), 0), Some(101.0));
        assert_eq!(
            annotated.value(&Metric::Vwap, 0),
            Some(round_to(301.0 / 3.0, 2))
        );
    }

    #[test]
    fn test_strict_policy_leaves_gaps() {
        let config = MetricsConfig::intermediate().with_window_policy(WindowPolicy::Strict);
        let annotated = annotate(&six_bars(), &config).unwrap();

        let ma_column = annotated.column(&ma(6)).unwrap();
        assert!(ma_column[..5].iter().all(Option::is_none));
        assert_eq!(ma_column[5], Some(103.5));

        let median_column = annotated.column_by_name("median_3").unwrap();
        assert_eq!(&median_column[..2], &[None, None]);
        assert_eq!(median_column[2], Some(102.0));
    }

    #[test]
    fn test_vwap_missing_at_zero_volume() {
        let series = five_minute_series(&[
            (100.0, 102.0, 99.0, 101.0, 0.0),
            (101.0, 103.0, 100.0, 102.0, 2000.0),
        ]);
        let annotated = annotate(&series, &MetricsConfig::vwap_only()).unwrap();
        let column = annotated.column_by_name("vwap").unwrap();

        assert_eq!(column[0], None);
        assert_eq!(column[1], Some(101.67));
    }

    #[test]
    fn test_vwap_within_running_bounds() {
        let annotated = annotate(&six_bars(), &MetricsConfig::vwap_only()).unwrap();
        let mut min_low = f64::MAX;
        let mut max_high = f64::MIN;

        for (bar, values) in annotated.rows() {
            min_low = min_low.min(bar.low);
            max_high = max_high.max(bar.high);
            let v = values[0].unwrap();
            assert!(min_low <= v && v <= max_high);
        }
    }

    #[test]
    fn test_input_is_shared_not_mutated() {
        let series = six_bars();
        let before = series.clone();
        let annotated = annotate(&series, &MetricsConfig::intermediate()).unwrap();

        assert_eq!(series, before);
        assert!(annotated.series().shares_bars_with(&series));
        assert_eq!(annotated.len(), series.len());
        assert_eq!(annotated.period(), TimeDelta::minutes(5));
    }

    #[test]
    fn test_decimals() {
        let series = five_minute_series(&[(100.0, 102.0, 99.0, 101.0, 1000.0)]);
        let annotated = annotate(&series, &MetricsConfig::vwap_only().with_decimals(4)).unwrap();
        assert_abs_diff_eq!(
            annotated.value(&Metric::Vwap, 0).unwrap(),
            100.6667,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_no_metrics_configured() {
        let annotated = annotate(&six_bars(), &MetricsConfig::default()).unwrap();
        assert_eq!(annotated.metrics().count(), 0);
        assert!(annotated.rows().all(|(_, values)| values.is_empty()));
    }

    #[test]
    fn test_empty_series() {
        let empty = BarSeries::new(Vec::new(), TimeDelta::minutes(5)).unwrap();
        assert!(matches!(
            annotate(&empty, &MetricsConfig::intermediate()),
            Err(BarscopeError::EmptyInput)
        ));
    }

    #[test]
    fn test_invalid_window() {
        let config = MetricsConfig::default().with_moving_average(0);
        assert!(matches!(
            annotate(&six_bars(), &config),
            Err(BarscopeError::InvalidWindow { window: 0, .. })
        ));
    }

    #[test]
    fn test_missing_column_lookup() {
        let annotated = annotate(&six_bars(), &MetricsConfig::vwap_only()).unwrap();
        assert!(annotated.column(&ma(6)).is_none());
        assert!(annotated.column_by_name("ma_6").is_none());
        assert_eq!(annotated.value(&Metric::Vwap, 99), None);
    }
}
