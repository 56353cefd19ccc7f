//! Display utilities, input loading and output writing for the barscope CLI.

use anyhow::{Context, Result};
use barscope_lib::prelude::*;
use chrono::TimeDelta;
use clap::ValueEnum;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Output format for resampled data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Json,
    Ndjson,
}

impl Format {
    /// Returns the file extension for this format.
    pub(crate) const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Parse a timeframe argument.
pub(crate) fn parse_timeframe(s: &str) -> Result<Timeframe> {
    Ok(s.parse::<Timeframe>()?)
}

/// Load a bar series from `input`, choosing the reader by file extension.
pub(crate) fn load_series(input: &Path, source_period: TimeDelta) -> Result<BarSeries> {
    let config = ReaderConfig::default().with_source_period(source_period);
    let is_json = input
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let series = if is_json {
        JsonBarReader::new(input, config).produce()
    } else {
        CsvBarReader::new(input, config).produce()
    };

    series.with_context(|| format!("Failed to load bars from {}", input.display()))
}

/// Write an annotated series in `format` to `writer`.
pub(crate) fn write_annotated<W: Write + Send>(
    series: &AnnotatedBarSeries,
    writer: W,
    format: Format,
) -> Result<()> {
    match format {
        Format::Csv => CsvFormatter::new().write_annotated(series, writer)?,
        Format::Json => JsonFormatter::new().write_annotated(series, writer)?,
        Format::Ndjson => JsonFormatter::ndjson().write_annotated(series, writer)?,
    }
    Ok(())
}

/// Write an annotated series to `output`, or to stdout when no path is given.
pub(crate) fn write_output(
    series: &AnnotatedBarSeries,
    output: Option<&Path>,
    format: Format,
) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_annotated(series, BufWriter::new(file), format)
        }
        None => write_annotated(series, BufWriter::new(std::io::stdout()), format),
    }
}

/// Render the first `rows` rows of an annotated series as a text table.
pub(crate) fn render_head(series: &AnnotatedBarSeries, rows: usize) -> String {
    let names = series.column_names();
    let mut out = format!(
        "{:<20} {:>10} {:>10} {:>10} {:>10} {:>12}",
        "TIMESTAMP", "OPEN", "HIGH", "LOW", "CLOSE", "VOLUME"
    );
    for name in &names {
        out.push_str(&format!(" {:>10}", name.to_uppercase()));
    }
    out.push('\n');

    for (bar, values) in series.rows().take(rows) {
        out.push_str(&format!(
            "{:<20} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12}",
            bar.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        ));
        for value in values {
            match value {
                Some(v) => out.push_str(&format!(" {v:>10.2}")),
                None => out.push_str(&format!(" {:>10}", "-")),
            }
        }
        out.push('\n');
    }

    out
}
