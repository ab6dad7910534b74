//! cert_status library: TLS certificate checking for lists of domains
//!
//! This library provides high-level APIs for capturing the certificate
//! chains a set of domains present and reporting on chain trust, expiry,
//! issuers, and hostname coverage.
//!
//! # Example
//!
//! ```no_run
//! use cert_status::{run_checks, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     domains: vec!["example.com/www.example.com".to_string()],
//!     expiry_warn: 30,
//!     ..Default::default()
//! };
//!
//! let report = run_checks(config).await?;
//! println!("{}", report.render_text(false));
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

mod check;
pub mod config;
mod domain;
mod error_handling;
mod fetch;
pub mod initialization;
mod report;

#[cfg(test)]
mod test_certs;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, OutputFormat};
pub use domain::{DomainGroup, DomainSpec};
pub use error_handling::DomainParseError;
pub use report::{AggregateReport, BlockElement, DomainReport, Finding, MessageBlock, Severity};
pub use run::run_checks;

// Internal run module (contains the main checking logic)
mod run {
    use std::sync::Arc;

    use anyhow::{Context, Result};
    use chrono::{Timelike, Utc};
    use log::{error, info};
    use openssl::x509::X509;
    use tokio::io::{AsyncBufReadExt, BufReader};

    use crate::check::{check_domain_group, load_extra_anchors, CheckContext};
    use crate::config::Config;
    use crate::domain::DomainGroup;
    use crate::error_handling::{CheckStats, FailureKind};
    use crate::fetch::fetch_domain_certs;
    use crate::initialization::{init_crypto_provider, init_semaphore};
    use crate::report::{AggregateReport, DomainReport};

    /// Runs certificate checks with the provided configuration.
    ///
    /// This is the main entry point for the library. It parses the domain
    /// definitions, fetches every unique certificate chain concurrently,
    /// checks each domain group, and folds everything into an aggregate
    /// report.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the run (domains, warning window,
    ///   concurrency, trust options)
    ///
    /// # Returns
    ///
    /// Returns an `AggregateReport` with per-group findings and run totals,
    /// or an error if the run could not be set up.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The domains file cannot be opened or read
    /// - The extra CA bundle cannot be loaded
    ///
    /// Unparseable domain definitions and failed fetches do not abort the
    /// run; they are folded into the report instead.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use cert_status::{run_checks, Config};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = Config {
    ///     domains: vec!["example.com".to_string()],
    ///     ..Default::default()
    /// };
    /// let report = run_checks(config).await?;
    /// std::process::exit(report.exit_code());
    /// # }
    /// ```
    pub async fn run_checks(config: Config) -> Result<AggregateReport> {
        init_crypto_provider();

        let mut specifiers: Vec<String> = config.domains.clone();
        if let Some(path) = &config.file {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open domains file {}", path.display()))?;
            let mut lines = BufReader::new(file).lines();
            while let Some(line) = lines
                .next_line()
                .await
                .context("Failed to read domains file")?
            {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
                specifiers.push(trimmed.to_string());
            }
        }
        info!("Checking {} domain definitions", specifiers.len());

        let stats = Arc::new(CheckStats::new());

        let mut definition_errors = 0usize;
        let mut groups: Vec<DomainGroup> = Vec::new();
        for specifier in &specifiers {
            let (group, parse_error) = DomainGroup::parse(specifier);
            if let Some(e) = parse_error {
                error!("Error in definition '{}': {}", specifier, e);
                stats.increment(FailureKind::DomainDefinitionError);
                definition_errors += 1;
            }
            if !group.is_empty() {
                groups.push(group);
            }
        }

        let extra_anchors: Vec<X509> = match &config.ca_file {
            Some(path) => load_extra_anchors(path)?,
            None => Vec::new(),
        };

        // Whole seconds keep the rendered deltas aligned with the expiry
        // timestamps, which have no sub-second precision either.
        let now = Utc::now().naive_utc();
        let checked_at = now.with_nanosecond(0).unwrap_or(now);

        let semaphore = init_semaphore(config.max_concurrency);
        let outcomes = fetch_domain_certs(&groups, semaphore, Arc::clone(&stats)).await;

        let ctx = CheckContext {
            outcomes: &outcomes,
            checked_at,
            expiry_warn_days: config.expiry_warn,
            insecure: config.insecure,
            extra_anchors: &extra_anchors,
            stats: &stats,
        };
        let reports: Vec<DomainReport> = groups
            .iter()
            .map(|group| check_domain_group(group, &ctx))
            .collect();

        stats.log_summary();

        Ok(AggregateReport::new(reports, definition_errors, checked_at))
    }
}
