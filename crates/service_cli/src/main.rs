//! fxhedge - Command Line Operations for FX Hedge Analysis
//!
//! This is the operational entry point for the FX hedging engine.
//!
//! # Commands
//!
//! - `fxhedge compute --input <file>` - Value a strategy over a hedge schedule
//! - `fxhedge risk --input <file>` - Probability-weighted risk matrix
//! - `fxhedge calibrate --input <file>` - Implied volatility from observed prices
//! - `fxhedge payoff --input <file>` - Static payoff diagram
//! - `fxhedge check` - Print the resolved configuration
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate reads JSON scenario files,
//! drives `hedge_risk::HedgeEngine` and renders its results.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod input;
mod output;

pub use error::{CliError, Result};

use config::CliConfig;
use output::OutputFormat;

/// FX hedging strategy engine CLI
#[derive(Parser)]
#[command(name = "fxhedge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "fxhedge.toml", env = "FXHEDGE_CONFIG")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Value a strategy over its hedge schedule
    Compute {
        /// Scenario file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write results to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Evaluate strategies across probability-weighted price ranges
    Risk {
        /// Risk scenario file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write results to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Calibrate implied volatility from observed option prices
    Calibrate {
        /// Calibration request file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Write results to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Static payoff diagram of a scenario's legs
    Payoff {
        /// Scenario file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Number of price points
        #[arg(short, long, default_value_t = 41)]
        points: usize,

        /// Half-width of the price axis in percent of spot
        #[arg(short, long, default_value_t = 20.0)]
        width: f64,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Check configuration
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(&cli.config)?;

    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_filter_str()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Compute {
            input,
            format,
            output,
        } => commands::compute::run(&config, &input, format, output.as_deref()),
        Commands::Risk {
            input,
            format,
            output,
        } => commands::risk::run(&config, &input, format, output.as_deref()),
        Commands::Calibrate { input, output } => {
            commands::calibrate::run(&config, &input, output.as_deref())
        }
        Commands::Payoff {
            input,
            points,
            width,
            format,
        } => commands::payoff::run(&config, &input, points, width, format),
        Commands::Check => commands::check::run(&config, &cli.config),
    }
}
