//! OHLCV bar resampling and overlay metrics.
//!
//! This is a facade crate that re-exports functionality from the barscope
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```
//! use barscope_lib::prelude::*;
//! use chrono::{TimeDelta, TimeZone, Utc};
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
//! let bars = (0..30)
//!     .map(|i| {
//!         let price = 100.0 + i as f64 * 0.1;
//!         Bar::new(start + TimeDelta::minutes(i), price, price + 0.5, price - 0.5, price, 100.0)
//!     })
//!     .collect();
//! let minute = BarSeries::new(bars, Timeframe::Minute1.duration()).unwrap();
//!
//! let five = to_5min(&minute).unwrap();
//! let annotated = annotate(&five, &MetricsConfig::intermediate()).unwrap();
//! assert_eq!(annotated.len(), 6);
//! assert_eq!(annotated.column_names(), vec!["ma_6", "median_3", "vwap"]);
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use barscope_types::*;

// Re-export aggregation
#[cfg(feature = "aggregate")]
pub use barscope_aggregate::{
    BarAggregator, aggregate, aggregate_many, aggregate_records, aggregate_timeframe,
    bucket_start, period_millis, to_5min, to_30min, to_daily,
};

// Re-export metrics
#[cfg(feature = "metrics")]
pub use barscope_metrics::{
    AnnotatedBarSeries, Metric, MetricsConfig, WindowPolicy, annotate, moving_average,
    rolling_median, round_to, vwap,
};

// Re-export readers and formatters
#[cfg(feature = "format")]
pub use barscope_format::{
    CsvBarReader, CsvFormatter, FormatError, Formatter, JsonBarReader, JsonFormatter, JsonStyle,
    OutputFormat, ReaderConfig, read_csv, read_json,
};

/// Prelude module for convenient imports.
///
/// ```
/// use barscope_lib::prelude::*;
/// ```
pub mod prelude {
    pub use barscope_types::{
        Bar, BarRecord, BarSeries, BarSeriesProducer, BarscopeError, Result, Timeframe,
    };

    #[cfg(feature = "aggregate")]
    pub use barscope_aggregate::{
        BarAggregator, aggregate, aggregate_timeframe, to_5min, to_30min, to_daily,
    };

    #[cfg(feature = "metrics")]
    pub use barscope_metrics::{AnnotatedBarSeries, Metric, MetricsConfig, WindowPolicy, annotate};

    #[cfg(feature = "format")]
    pub use barscope_format::{
        CsvBarReader, CsvFormatter, Formatter, JsonBarReader, JsonFormatter, OutputFormat,
        ReaderConfig,
    };
}
