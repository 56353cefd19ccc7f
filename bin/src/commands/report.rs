//! Report command implementation.
//!
//! Builds the multi-timeframe overview: 5-minute bars with all overlays,
//! 30-minute bars with VWAP, and daily bars without overlays.

use crate::display::{load_series, parse_timeframe, render_head};
use anyhow::{Context, Result};
use barscope_lib::prelude::*;

/// One granularity of the report.
pub(crate) struct ReportTable {
    pub(crate) timeframe: Timeframe,
    pub(crate) series: AnnotatedBarSeries,
}

/// The overlays shown for each granularity of the report.
fn report_layout() -> [(Timeframe, Option<MetricsConfig>); 3] {
    [
        (Timeframe::Minute5, Some(MetricsConfig::intermediate())),
        (Timeframe::Minute30, Some(MetricsConfig::vwap_only())),
        (Timeframe::Day1, None),
    ]
}

/// Resample and annotate `source` for every granularity of the report.
pub(crate) fn build_report(source: &BarSeries) -> Result<Vec<ReportTable>> {
    report_layout()
        .into_iter()
        .map(|(timeframe, config)| {
            let resampled = aggregate_timeframe(source, timeframe)
                .with_context(|| format!("Failed to resample to {}", timeframe.label()))?;
            let series = match config {
                Some(config) => annotate(&resampled, &config)
                    .with_context(|| format!("Failed to annotate {} bars", timeframe.label()))?,
                None => AnnotatedBarSeries::new(resampled),
            };
            Ok(ReportTable { timeframe, series })
        })
        .collect()
}

/// Print the head of each report table with its bar count.
pub(crate) fn report(input: &std::path::Path, source_period: &str, rows: usize) -> Result<()> {
    let source_period = parse_timeframe(source_period)?;
    let source = load_series(input, source_period.duration())?;
    let tables = build_report(&source)?;

    if let Some((first, last)) = source.time_span() {
        println!(
            "Source: {} {} bars from {} to {}",
            source.len(),
            source_period.label(),
            first,
            last
        );
    }

    for table in &tables {
        println!(
            "\n{} bars ({})",
            table.timeframe.label(),
            table.series.len()
        );
        println!("{}", "-".repeat(40));
        print!("{}", render_head(&table.series, rows));
    }

    Ok(())
}
