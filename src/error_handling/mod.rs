//! Error handling and failure statistics.
//!
//! This module provides:
//! - Typed error definitions (initialization, specifier parsing, fetching)
//! - Failure kind categorization for the end-of-run breakdown
//! - Thread-safe failure statistics tracking
//!
//! Fetch and validation problems are captured as data and surface as report
//! findings; only initialization problems are raised as hard errors.

mod stats;
mod types;

// Re-export public API
pub use stats::CheckStats;
pub use types::{DomainParseError, FailureKind, FetchError, InitializationError};
