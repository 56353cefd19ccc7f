//! OHLCV resampling for barscope.
//!
//! This crate turns a fine-grained bar series into coarser bars:
//!
//! - [`aggregate`] - Resample a series into fixed-width, epoch-aligned buckets
//! - [`BarAggregator`] - Streaming bar-to-bar aggregator behind [`aggregate`]
//! - [`bucket_start`] - Bucket boundary arithmetic

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregate;
mod bucket;

pub use aggregate::{
    BarAggregator, aggregate, aggregate_many, aggregate_records, aggregate_timeframe, to_5min,
    to_30min, to_daily,
};
pub use bucket::{bucket_start, period_millis};
