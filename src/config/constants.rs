//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the
//! application: network timeouts, concurrency limits, and reporting defaults.

// Network operation timeouts
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// TLS handshake timeout in seconds
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 5;

// Concurrency
/// Maximum concurrent certificate fetches (semaphore limit)
pub const DEFAULT_MAX_CONCURRENCY: usize = 30;

// Domain specifiers
/// TLS port used when a domain specifier carries no explicit port
pub const DEFAULT_TLS_PORT: u16 = 443;

// Reporting
/// Days before expiry at which a certificate starts producing warnings
pub const DEFAULT_EXPIRY_WARN_DAYS: i64 = 14;

// Process exit codes (0 means no findings above info)
/// At least one domain produced a warning finding
pub const EXIT_WARNINGS: i32 = 3;
/// At least one domain produced an error finding
pub const EXIT_ERRORS: i32 = 4;
/// At least one domain specifier could not be parsed
pub const EXIT_DEFINITION_ERRORS: i32 = 5;
