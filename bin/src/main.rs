//! barscope CLI - OHLCV bar resampling and overlay metrics.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use commands::resample::ResampleOptions;
use display::Format;

#[derive(Parser)]
#[command(name = "barscope")]
#[command(about = "Resample OHLCV bars and compute overlay metrics", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (only errors are logged)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resample a bar file to a coarser timeframe and annotate it
    Resample {
        /// Input file (.csv or .json)
        input: PathBuf,

        /// Target timeframe (m5, m30, d1, ...)
        #[arg(short, long)]
        timeframe: String,

        /// Output file path. Defaults to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,

        /// Moving average window, in bars
        #[arg(long, allow_negative_numbers = true)]
        ma_window: Option<i64>,

        /// Rolling median window, in bars
        #[arg(long, allow_negative_numbers = true)]
        median_window: Option<i64>,

        /// Skip the VWAP column
        #[arg(long)]
        no_vwap: bool,

        /// Leave metrics empty until their window has filled
        #[arg(long)]
        strict_windows: bool,

        /// Decimal places for metric values
        #[arg(long)]
        decimals: Option<u32>,

        /// Metrics configuration file (JSON). Flags override its values
        #[arg(long)]
        config: Option<PathBuf>,

        /// Period of the input bars
        #[arg(long, default_value = "m1")]
        source_period: String,

        /// Write plain resampled bars without metrics
        #[arg(long)]
        raw: bool,
    },

    /// Show the 5-minute, 30-minute and daily views of a bar file
    Report {
        /// Input file (.csv or .json)
        input: PathBuf,

        /// Period of the input bars
        #[arg(long, default_value = "m1")]
        source_period: String,

        /// Rows to print per table
        #[arg(short, long, default_value = "5")]
        rows: usize,
    },

    /// List supported timeframes
    Timeframes,
}

/// Installs the stderr log subscriber. `RUST_LOG` takes precedence over
/// the verbosity flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Resample {
            input,
            timeframe,
            output,
            format,
            ma_window,
            median_window,
            no_vwap,
            strict_windows,
            decimals,
            config,
            source_period,
            raw,
        } => commands::resample::resample(&ResampleOptions {
            input,
            timeframe,
            output,
            format,
            ma_window,
            median_window,
            no_vwap,
            strict_windows,
            decimals,
            config,
            source_period,
            raw,
            quiet: cli.quiet,
        }),
        Commands::Report {
            input,
            source_period,
            rows,
        } => commands::report::report(&input, &source_period, rows),
        Commands::Timeframes => commands::timeframes::list_timeframes(),
    }
}
