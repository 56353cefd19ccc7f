//! Core types for barscope.
//!
//! This crate provides the fundamental data structures shared by the
//! aggregation and metrics crates:
//!
//! - [`Bar`] - A single OHLCV observation over a time bucket
//! - [`BarRecord`] - Raw, possibly incomplete bar as read from an external source
//! - [`BarSeries`] - Immutable, strictly time-ordered sequence of bars
//! - [`Timeframe`] - Named bar granularity
//! - [`BarSeriesProducer`] - Abstraction over anything that yields a series

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod error;
mod producer;
mod series;
mod timeframe;

pub use bar::{Bar, BarField, BarRecord};
pub use error::{BarscopeError, Result};
pub use producer::BarSeriesProducer;
pub use series::BarSeries;
pub use timeframe::{Timeframe, TimeframeParseError};
