//! Resample command implementation.
//!
//! Loads a bar file, resamples it to the requested timeframe and writes the
//! (optionally annotated) result.

use crate::display::{Format, load_series, parse_timeframe, write_output};
use anyhow::{Context, Result};
use barscope_lib::prelude::*;
use std::path::PathBuf;
use tracing::info;

/// Options collected from the `resample` subcommand.
pub(crate) struct ResampleOptions {
    pub(crate) input: PathBuf,
    pub(crate) timeframe: String,
    pub(crate) output: Option<PathBuf>,
    pub(crate) format: Format,
    pub(crate) ma_window: Option<i64>,
    pub(crate) median_window: Option<i64>,
    pub(crate) no_vwap: bool,
    pub(crate) strict_windows: bool,
    pub(crate) decimals: Option<u32>,
    pub(crate) config: Option<PathBuf>,
    pub(crate) source_period: String,
    pub(crate) raw: bool,
    pub(crate) quiet: bool,
}

/// Builds the metrics configuration: the config file (or the intermediate
/// preset) with command-line flags applied on top.
pub(crate) fn metrics_config(options: &ResampleOptions) -> Result<MetricsConfig> {
    let mut config = match &options.config {
        Some(path) => MetricsConfig::from_path(path)
            .with_context(|| format!("Failed to read metrics config {}", path.display()))?,
        None => MetricsConfig::intermediate(),
    };

    if let Some(window) = options.ma_window {
        config = config.with_moving_average(window);
    }
    if let Some(window) = options.median_window {
        config = config.with_rolling_median(window);
    }
    if options.no_vwap {
        config = config.with_vwap(false);
    }
    if options.strict_windows {
        config = config.with_window_policy(WindowPolicy::Strict);
    }
    if let Some(decimals) = options.decimals {
        config = config.with_decimals(decimals);
    }

    Ok(config)
}

/// Resample the input file and write the result.
pub(crate) fn resample(options: &ResampleOptions) -> Result<()> {
    let timeframe = parse_timeframe(&options.timeframe)?;
    let source_period = parse_timeframe(&options.source_period)?;
    let source = load_series(&options.input, source_period.duration())?;

    let resampled = aggregate_timeframe(&source, timeframe)
        .with_context(|| format!("Failed to resample to {}", timeframe.label()))?;
    info!(
        "Resampled {} {} bars into {} {} bars",
        source.len(),
        source_period.label(),
        resampled.len(),
        timeframe.label()
    );

    let annotated = if options.raw {
        AnnotatedBarSeries::new(resampled)
    } else {
        let config = metrics_config(options)?;
        match annotate(&resampled, &config) {
            Ok(annotated) => annotated,
            Err(e) if e.is_config_error() => {
                return Err(anyhow::Error::new(e).context("Invalid metrics configuration"));
            }
            Err(e) => return Err(anyhow::Error::new(e).context("Failed to compute metrics")),
        }
    };

    write_output(&annotated, options.output.as_deref(), options.format)?;

    if let Some(path) = &options.output
        && !options.quiet
    {
        eprintln!(
            "Wrote {} {} bars to {} ({})",
            annotated.len(),
            timeframe.label(),
            path.display(),
            options.format
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn options(input: PathBuf) -> ResampleOptions {
        ResampleOptions {
            input,
            timeframe: "m5".to_string(),
            output: None,
            format: Format::Csv,
            ma_window: None,
            median_window: None,
            no_vwap: false,
            strict_windows: false,
            decimals: None,
            config: None,
            source_period: "m1".to_string(),
            raw: false,
            quiet: true,
        }
    }

    fn minute_csv(count: i64) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "timestamp,open,high,low,close,volume").unwrap();
        for i in 0..count {
            writeln!(
                file,
                "2024-01-02 09:{:02}:00,100,101,99,100.5,10",
                30 + i
            )
            .unwrap();
        }
        file
    }

    #[test]
    fn test_metrics_config_flags_override_preset() {
        let mut opts = options(PathBuf::from("bars.csv"));
        opts.ma_window = Some(3);
        opts.no_vwap = true;
        opts.strict_windows = true;
        opts.decimals = Some(4);

        let config = metrics_config(&opts).unwrap();
        assert_eq!(config.moving_average_window, Some(3));
        assert_eq!(config.rolling_median_window, Some(3));
        assert!(!config.include_vwap);
        assert_eq!(config.window_policy, WindowPolicy::Strict);
        assert_eq!(config.decimals, 4);
    }

    #[test]
    fn test_metrics_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"include_vwap": true}}"#).unwrap();
        let mut opts = options(PathBuf::from("bars.csv"));
        opts.config = Some(file.path().to_path_buf());

        let config = metrics_config(&opts).unwrap();
        assert_eq!(config.moving_average_window, None);
        assert!(config.include_vwap);
    }

    #[test]
    fn test_resample_writes_file() {
        let input = minute_csv(10);
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("five.csv");

        let mut opts = options(input.path().to_path_buf());
        opts.output = Some(output.clone());
        resample(&opts).unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<_> = written.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "timestamp,open,high,low,close,volume,ma_6,median_3,vwap"
        );
        assert!(lines[1].starts_with("2024-01-02T09:30:00Z,100,101,99,100.5,50,"));
    }

    #[test]
    fn test_resample_raw() {
        let input = minute_csv(10);
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("five.json");

        let mut opts = options(input.path().to_path_buf());
        opts.output = Some(output.clone());
        opts.format = Format::Json;
        opts.raw = true;
        resample(&opts).unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(!written.contains("vwap"));
        assert!(written.contains("\"volume\":50.0"));
    }

    #[test]
    fn test_resample_rejects_finer_timeframe() {
        let input = minute_csv(10);
        let mut opts = options(input.path().to_path_buf());
        opts.source_period = "m5".to_string();
        opts.timeframe = "m1".to_string();

        let err = resample(&opts).unwrap_err();
        assert!(err.to_string().contains("Failed to resample"));
    }

    #[test]
    fn test_resample_rejects_zero_window() {
        let input = minute_csv(10);
        let mut opts = options(input.path().to_path_buf());
        opts.ma_window = Some(0);
        opts.output = Some(tempfile::tempdir().unwrap().path().join("out.csv"));

        let err = resample(&opts).unwrap_err();
        assert!(err.to_string().contains("Invalid metrics configuration"));
    }

    #[test]
    fn test_resample_rejects_negative_window() {
        let input = minute_csv(10);
        let mut opts = options(input.path().to_path_buf());
        opts.median_window = Some(-2);

        let err = resample(&opts).unwrap_err();
        assert!(err.to_string().contains("Invalid metrics configuration"));
        assert!(matches!(
            err.downcast_ref::<BarscopeError>(),
            Some(BarscopeError::InvalidWindow { window: -2, .. })
        ));
    }
}
