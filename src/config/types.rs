//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{DEFAULT_EXPIRY_WARN_DAYS, DEFAULT_MAX_CONCURRENCY};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Report output format.
///
/// Controls how the final report is written to stdout:
/// - `Text`: plain text blocks, one per domain group (default)
/// - `Json`: chat-style context blocks as a JSON array
#[derive(Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Plain text blocks (default)
    Text,
    /// Chat context blocks as JSON
    Json,
}

/// Command-line options and configuration.
///
/// This struct is automatically generated by `clap` from the field attributes.
/// All options have sensible defaults and can be overridden via command-line
/// flags. It can also be constructed programmatically for library use.
///
/// # Examples
///
/// ```bash
/// # Check a few domains
/// cert_status example.com www.example.com/example.com
///
/// # Read specifiers from a file, warn 30 days ahead
/// cert_status --file domains.txt --expiry-warn 30
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cert_status",
    about = "Checks the TLS certificates a list of domains present and reports findings."
)]
pub struct Config {
    /// Domain group specifiers: `host[:port]`, `host|connection_host`,
    /// `!host` (no fetch), joined with `/` into certificate groups
    #[arg(value_parser)]
    pub domains: Vec<String>,

    /// File to read domain specifiers from (one per line, `#` starts a comment)
    #[arg(long, value_parser)]
    pub file: Option<PathBuf>,

    /// Days before expiry at which a warning finding is raised
    #[arg(long, default_value_t = DEFAULT_EXPIRY_WARN_DAYS)]
    pub expiry_warn: i64,

    /// Include informational findings in the rendered output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format: text|json
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Skip trust-store validation of the presented chains
    #[arg(long)]
    pub insecure: bool,

    /// PEM file with additional trust anchors for chain validation
    #[arg(long, value_parser)]
    pub ca_file: Option<PathBuf>,

    /// Maximum concurrent certificate fetches
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domains: Vec::new(),
            file: None,
            expiry_warn: DEFAULT_EXPIRY_WARN_DAYS,
            verbose: false,
            output: OutputFormat::Text,
            insecure: false,
            ca_file: None,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}
