//! CSV and JSON bar readers.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use barscope_types::{BarRecord, BarSeries, BarSeriesProducer, BarscopeError, Result, Timeframe};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::Deserialize;
use tracing::{debug, info};

/// Datetime layouts tried after RFC 3339, in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Raw input row. Every field is optional so that absent columns surface as
/// missing-field errors instead of parse errors.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(
        alias = "Timestamp",
        alias = "Date",
        alias = "date",
        alias = "Datetime",
        alias = "datetime",
        alias = "Time",
        alias = "time",
        default
    )]
    timestamp: Option<String>,
    #[serde(alias = "Open", alias = "o", default)]
    open: Option<f64>,
    #[serde(alias = "High", alias = "h", default)]
    high: Option<f64>,
    #[serde(alias = "Low", alias = "l", default)]
    low: Option<f64>,
    #[serde(alias = "Close", alias = "c", default)]
    close: Option<f64>,
    #[serde(alias = "Volume", alias = "v", default)]
    volume: Option<f64>,
}

impl RawRow {
    fn into_record(self, index: usize, config: &ReaderConfig) -> Result<BarRecord> {
        let timestamp = match self.timestamp.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => {
                let parsed = parse_timestamp(s, config.timestamp_format.as_deref());
                Some(parsed.ok_or_else(|| {
                    BarscopeError::Source(format!("row {index}: could not parse timestamp '{s}'"))
                })?)
            }
            _ => None,
        };

        Ok(BarRecord {
            timestamp,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        })
    }
}

/// Configuration shared by the CSV and JSON readers.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Nominal period of the bars being read.
    pub source_period: TimeDelta,
    /// CSV delimiter character.
    pub delimiter: u8,
    /// Explicit timestamp layout, tried before the built-in ones.
    pub timestamp_format: Option<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            source_period: Timeframe::Minute1.duration(),
            delimiter: b',',
            timestamp_format: None,
        }
    }
}

impl ReaderConfig {
    /// Sets the nominal period of the bars being read.
    #[must_use]
    pub const fn with_source_period(mut self, period: TimeDelta) -> Self {
        self.source_period = period;
        self
    }

    /// Sets the CSV delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets an explicit timestamp layout (chrono `strftime` syntax).
    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = Some(format.into());
        self
    }
}

/// Parses a timestamp as RFC 3339, the explicit layout, a built-in datetime
/// layout, or a bare date. Naive values are taken as UTC.
fn parse_timestamp(s: &str, format: Option<&str>) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    format
        .into_iter()
        .chain(DATETIME_FORMATS.iter().copied())
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

fn build_series(rows: Vec<RawRow>, config: &ReaderConfig) -> Result<BarSeries> {
    let records = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| row.into_record(index, config))
        .collect::<Result<Vec<_>>>()?;
    let series = BarSeries::from_records(records, config.source_period)?;

    if let Some((first, last)) = series.time_span() {
        info!("Loaded {} bars from {} to {}", series.len(), first, last);
    }
    Ok(series)
}

/// Reads a bar series from CSV with a header row.
///
/// # Errors
///
/// Returns [`BarscopeError::Source`] for malformed CSV or timestamps,
/// [`BarscopeError::MissingField`] for incomplete rows, and any validation
/// error of [`BarSeries::new`].
pub fn read_csv<R: Read>(reader: R, config: &ReaderConfig) -> Result<BarSeries> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(config.delimiter)
        .flexible(true)
        .trim(::csv::Trim::All)
        .from_reader(reader);

    let rows = reader
        .deserialize::<RawRow>()
        .enumerate()
        .map(|(index, row)| {
            row.map_err(|e| BarscopeError::Source(format!("row {index}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(rows = rows.len(), "parsed CSV rows");

    build_series(rows, config)
}

/// Reads a bar series from a JSON array of objects.
///
/// # Errors
///
/// Returns [`BarscopeError::Json`] for malformed JSON,
/// [`BarscopeError::MissingField`] for incomplete objects, and any
/// validation error of [`BarSeries::new`].
pub fn read_json<R: Read>(reader: R, config: &ReaderConfig) -> Result<BarSeries> {
    let rows: Vec<RawRow> = serde_json::from_reader(reader)?;
    debug!(rows = rows.len(), "parsed JSON rows");

    build_series(rows, config)
}

/// File-backed CSV producer.
#[derive(Debug, Clone)]
pub struct CsvBarReader {
    path: PathBuf,
    config: ReaderConfig,
}

impl CsvBarReader {
    /// Creates a reader for the CSV file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, config: ReaderConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BarSeriesProducer for CsvBarReader {
    fn produce(&mut self) -> Result<BarSeries> {
        info!("Loading CSV bars from: {}", self.path.display());
        let file = File::open(&self.path)?;
        read_csv(BufReader::new(file), &self.config)
    }
}

/// File-backed JSON producer.
#[derive(Debug, Clone)]
pub struct JsonBarReader {
    path: PathBuf,
    config: ReaderConfig,
}

impl JsonBarReader {
    /// Creates a reader for the JSON file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, config: ReaderConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BarSeriesProducer for JsonBarReader {
    fn produce(&mut self) -> Result<BarSeries> {
        info!("Loading JSON bars from: {}", self.path.display());
        let file = File::open(&self.path)?;
        read_json(BufReader::new(file), &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barscope_types::BarField;
    use chrono::TimeZone;
    use std::io::Write;

    const CSV: &str = "\
Timestamp,Open,High,Low,Close,Volume
2024-01-02 09:30:00,100.00,102.00,99.00,101.00,1000
2024-01-02 09:31:00,101.00,103.00,100.00,102.00,2000
";

    #[test]
    fn test_read_csv_with_aliases() {
        let series = read_csv(CSV.as_bytes(), &ReaderConfig::default()).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.period(), TimeDelta::minutes(1));
        let bar = series.bars()[1];
        assert_eq!(
            bar.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 2, 9, 31, 0).unwrap()
        );
        assert_eq!(bar.high, 103.0);
        assert_eq!(bar.volume, 2000.0);
    }

    #[test]
    fn test_read_csv_missing_volume_column() {
        let input = "timestamp,open,high,low,close\n2024-01-02T09:30:00Z,100,102,99,101\n";
        let err = read_csv(input.as_bytes(), &ReaderConfig::default()).unwrap_err();

        assert!(matches!(
            err,
            BarscopeError::MissingField {
                index: 0,
                field: BarField::Volume
            }
        ));
    }

    #[test]
    fn test_read_csv_empty_cell_is_missing() {
        let input = "timestamp,open,high,low,close,volume\n\
                     2024-01-02T09:30:00Z,100,102,99,101,1000\n\
                     2024-01-02T09:31:00Z,101,,100,102,2000\n";
        let err = read_csv(input.as_bytes(), &ReaderConfig::default()).unwrap_err();

        assert!(matches!(
            err,
            BarscopeError::MissingField {
                index: 1,
                field: BarField::High
            }
        ));
    }

    #[test]
    fn test_read_csv_unordered() {
        let input = "timestamp,open,high,low,close,volume\n\
                     2024-01-02T09:31:00Z,100,102,99,101,1000\n\
                     2024-01-02T09:30:00Z,101,103,100,102,2000\n";
        let err = read_csv(input.as_bytes(), &ReaderConfig::default()).unwrap_err();
        assert!(matches!(err, BarscopeError::UnorderedInput { index: 1, .. }));
    }

    #[test]
    fn test_read_csv_bad_timestamp() {
        let input = "timestamp,open,high,low,close,volume\nyesterday,100,102,99,101,1000\n";
        let err = read_csv(input.as_bytes(), &ReaderConfig::default()).unwrap_err();
        assert!(matches!(err, BarscopeError::Source(_)));
    }

    #[test]
    fn test_read_csv_header_only_is_empty_series() {
        let input = "timestamp,open,high,low,close,volume\n";
        let series = read_csv(input.as_bytes(), &ReaderConfig::default()).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_read_csv_semicolon_and_custom_format() {
        let input = "timestamp;open;high;low;close;volume\n02.01.2024 09:30;100;102;99;101;1000\n";
        let config = ReaderConfig::default()
            .with_delimiter(b';')
            .with_timestamp_format("%d.%m.%Y %H:%M");
        let series = read_csv(input.as_bytes(), &config).unwrap();
        assert_eq!(
            series.bars()[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_read_json() {
        let input = r#"[
            {"timestamp": "2024-01-02T09:30:00Z", "open": 100, "high": 102, "low": 99, "close": 101, "volume": 1000},
            {"timestamp": "2024-01-02T09:31:00Z", "open": 101, "high": 103, "low": 100, "close": 102, "volume": null}
        ]"#;
        let err = read_json(input.as_bytes(), &ReaderConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            BarscopeError::MissingField {
                index: 1,
                field: BarField::Volume
            }
        ));
    }

    #[test]
    fn test_csv_producer_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let mut reader = CsvBarReader::new(file.path(), ReaderConfig::default());
        let series = reader.produce().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(reader.path(), file.path());
    }

    #[test]
    fn test_json_producer_missing_file() {
        let mut reader = JsonBarReader::new("/nonexistent/bars.json", ReaderConfig::default());
        assert!(matches!(reader.produce(), Err(BarscopeError::Io(_))));
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-02T09:30:00Z", None), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02T10:30:00+01:00", None), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02 09:30:00", None), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02 09:30", None), Some(expected));
        assert_eq!(
            parse_timestamp("2024-01-02", None),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("not a date", None), None);
    }
}
