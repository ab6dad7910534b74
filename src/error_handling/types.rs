//! Error type definitions.
//!
//! This module defines the typed errors used throughout the application and
//! the failure kinds tracked by [`super::CheckStats`].

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the logger with custom message.
    #[error("Logger initialization error: {0}")]
    LoggerSetupError(String),
}

/// A domain specifier term that could not be parsed.
///
/// Raised only for a malformed port suffix; every other specifier shape is
/// accepted. The message names the offending term so it can be found in a
/// long definition list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Couldn't parse '{term}', port '{port}' is not an integer")]
pub struct DomainParseError {
    /// The specifier term that failed to parse.
    pub term: String,
    /// The text found where a port number was expected.
    pub port: String,
}

/// A certificate fetch that did not produce a chain.
///
/// Captured per domain and turned into a report finding; a fetch failure
/// never aborts the rest of the batch.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The identity hostname is not usable as a TLS server name.
    #[error("'{host}' is not a valid server name")]
    InvalidServerName {
        /// The rejected hostname.
        host: String,
    },

    /// TCP connect did not complete within the timeout.
    #[error("Connection to {addr} timed out")]
    ConnectTimeout {
        /// The dialed `host:port` address.
        addr: String,
    },

    /// TCP connect failed outright.
    #[error("Couldn't connect to {addr}: {source}")]
    Connect {
        /// The dialed `host:port` address.
        addr: String,
        /// The underlying socket error.
        source: std::io::Error,
    },

    /// TLS handshake did not complete within the timeout.
    #[error("TLS handshake with {host} timed out")]
    HandshakeTimeout {
        /// The SNI hostname.
        host: String,
    },

    /// TLS handshake failed.
    #[error("TLS handshake with {host} failed: {source}")]
    Handshake {
        /// The SNI hostname.
        host: String,
        /// The underlying handshake error.
        source: std::io::Error,
    },

    /// The handshake succeeded but the server presented no certificates.
    #[error("{host} presented no certificates")]
    NoPeerCertificates {
        /// The SNI hostname.
        host: String,
    },

    /// The fetch task itself died (panic or cancellation).
    #[error("Certificate fetch for {host} was aborted: {detail}")]
    Aborted {
        /// The SNI hostname.
        host: String,
        /// Join error text.
        detail: String,
    },
}

impl FetchError {
    /// The statistics bucket this failure belongs to.
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::InvalidServerName { .. } => FailureKind::InvalidServerName,
            FetchError::ConnectTimeout { .. } => FailureKind::TcpConnectTimeout,
            FetchError::Connect { .. } => FailureKind::TcpConnectError,
            FetchError::HandshakeTimeout { .. } => FailureKind::TlsHandshakeTimeout,
            FetchError::Handshake { .. } => FailureKind::TlsHandshakeError,
            FetchError::NoPeerCertificates { .. } => FailureKind::MissingPeerCertificates,
            FetchError::Aborted { .. } => FailureKind::FetchAborted,
        }
    }
}

/// Kinds of failures that can occur during a checking run.
///
/// These categorize everything that goes wrong, from unparseable specifier
/// terms through network failures to trust-store rejections, for the
/// end-of-run breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum FailureKind {
    // Definition problems
    DomainDefinitionError,
    // Network problems
    TcpConnectError,
    TcpConnectTimeout,
    TlsHandshakeError,
    TlsHandshakeTimeout,
    InvalidServerName,
    MissingPeerCertificates,
    FetchAborted,
    // Certificate problems
    CertificateParseError,
    ChainValidationError,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FailureKind {
    /// Returns a human-readable string representation of the failure kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::DomainDefinitionError => "Domain definition error",
            FailureKind::TcpConnectError => "TCP connect error",
            FailureKind::TcpConnectTimeout => "TCP connect timeout",
            FailureKind::TlsHandshakeError => "TLS handshake error",
            FailureKind::TlsHandshakeTimeout => "TLS handshake timeout",
            FailureKind::InvalidServerName => "Invalid server name",
            FailureKind::MissingPeerCertificates => "Missing peer certificates",
            FailureKind::FetchAborted => "Fetch task aborted",
            FailureKind::CertificateParseError => "Certificate parse error",
            FailureKind::ChainValidationError => "Chain validation error",
        }
    }
}
