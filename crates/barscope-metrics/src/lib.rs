//! Bar-series overlays for barscope.
//!
//! This crate annotates a bar series with derived columns:
//!
//! - [`annotate`] - Compute the overlays selected by a [`MetricsConfig`]
//! - [`AnnotatedBarSeries`] - Bars plus index-aligned metric columns
//! - [`Metric`] - Identifies a column (`ma_<n>`, `median_<n>`, `vwap`)
//! - [`moving_average`], [`rolling_median`], [`vwap`] - The underlying kernels

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod annotate;
mod config;
mod metric;
mod rolling;

pub use annotate::{AnnotatedBarSeries, annotate};
pub use config::{MetricsConfig, WindowPolicy};
pub use metric::Metric;
pub use rolling::{moving_average, rolling_median, round_to, vwap};
