//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `cert_status` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting and exit codes
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use cert_status::initialization::{init_crypto_provider, init_logger_with};
use cert_status::{run_checks, Config, OutputFormat};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments into Config
    let config = Config::parse();

    // Initialize logger based on config
    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    // Initialize crypto provider for TLS operations
    init_crypto_provider();

    let verbose = config.verbose;
    let output = config.output.clone();

    // Run the checks using the library
    match run_checks(config).await {
        Ok(report) => {
            match output {
                OutputFormat::Text => println!("{}", report.render_text(verbose)),
                OutputFormat::Json => {
                    let blocks = serde_json::to_string_pretty(&report.blocks(verbose))
                        .context("Failed to serialize report")?;
                    println!("{}", blocks);
                }
            }
            process::exit(report.exit_code());
        }
        Err(e) => {
            eprintln!("cert_status error: {:#}", e);
            process::exit(1);
        }
    }
}
