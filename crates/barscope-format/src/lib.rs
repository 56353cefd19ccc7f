//! Readers and output formatters for barscope.
//!
//! This crate moves bar series across the process boundary:
//!
//! - [`CsvBarReader`] / [`JsonBarReader`] - File-backed
//!   [`BarSeriesProducer`](barscope_types::BarSeriesProducer)s
//! - [`CsvFormatter`] - CSV / TSV output
//! - [`JsonFormatter`] - JSON array or NDJSON output

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;
mod reader;

pub use crate::csv::CsvFormatter;
pub use formatter::{FormatError, Formatter, OutputFormat};
pub use json::{JsonFormatter, JsonStyle};
pub use reader::{CsvBarReader, JsonBarReader, ReaderConfig, read_csv, read_json};
