//! Domain specifier parsing.
//!
//! This module turns compact domain-group specifier strings into
//! [`DomainGroup`]s of [`DomainSpec`] records.
//!
//! Grammar, per `/`-separated term:
//! - `host` checks the certificate of `host:443`
//! - `host:port` overrides the port
//! - `host|connection_host` validates the certificate identity of `host`
//!   while connecting to `connection_host`; the port suffix is recognized
//!   before the alias split, so `host|connection_host:port` dials
//!   `connection_host:port` with SNI `host`
//! - `!host` skips fetching entirely and only declares an expected
//!   alternate name for the group

use std::fmt;

use crate::config::DEFAULT_TLS_PORT;
use crate::error_handling::DomainParseError;

/// One hostname entry to check.
///
/// Parsed from a single specifier term. The spec is the identity used to key
/// fetch outcomes, so it is `Eq + Hash`; the display form is derived from
/// the fields rather than stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainSpec {
    /// Hostname whose certificate identity is checked (also the SNI name).
    pub host: String,
    /// Hostname actually dialed; equals `host` unless an alias was given.
    pub connection_host: String,
    /// TLS port, 443 unless the term carries an explicit port.
    pub port: u16,
    /// When set, no connection is made; the entry only declares an expected
    /// alternate name.
    pub skip_fetch: bool,
}

impl DomainSpec {
    /// Parses a single specifier term.
    ///
    /// # Errors
    ///
    /// Returns [`DomainParseError`] when the text after the last `:` is not
    /// a valid port number.
    pub fn parse(term: &str) -> Result<Self, DomainParseError> {
        let mut rest = term;
        let skip_fetch = rest.starts_with('!');
        if skip_fetch {
            rest = &rest[1..];
        }

        let mut port = DEFAULT_TLS_PORT;
        if let Some((before, port_str)) = rest.rsplit_once(':') {
            port = port_str
                .parse::<u16>()
                .map_err(|_| DomainParseError {
                    term: term.to_string(),
                    port: port_str.to_string(),
                })?;
            rest = before;
        }

        let (host, connection_host) = match rest.split_once('|') {
            Some((host, connection_host)) => (host, connection_host),
            None => (rest, rest),
        };

        Ok(DomainSpec {
            host: host.to_string(),
            connection_host: connection_host.to_string(),
            port,
            skip_fetch,
        })
    }

    /// The name shown in reports: `host (connection_host)` when the entry
    /// dials somewhere other than the identity hostname.
    pub fn display_name(&self) -> String {
        if self.connection_host != self.host {
            format!("{} ({})", self.host, self.connection_host)
        } else {
            self.host.clone()
        }
    }

    /// The `host:port` address dialed for this entry.
    pub fn address(&self) -> String {
        format!("{}:{}", self.connection_host, self.port)
    }
}

impl fmt::Display for DomainSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// An ordered group of [`DomainSpec`]s expected to share one certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainGroup {
    /// Group members in specifier order.
    pub specs: Vec<DomainSpec>,
}

impl DomainGroup {
    /// Parses a `/`-separated specifier string.
    ///
    /// Terms parsed before a failing term are kept; the failing term and
    /// everything after it are dropped and the error is returned alongside
    /// the partial group. An empty specifier yields an empty group. Empty
    /// terms are skipped.
    pub fn parse(specifier: &str) -> (DomainGroup, Option<DomainParseError>) {
        let mut specs = Vec::new();
        for term in specifier.split('/') {
            if term.is_empty() {
                continue;
            }
            match DomainSpec::parse(term) {
                Ok(spec) => specs.push(spec),
                Err(e) => return (DomainGroup { specs }, Some(e)),
            }
        }
        (DomainGroup { specs }, None)
    }

    /// True when the group has no members.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Sort key that orders hostnames by their labels reversed, so names under
/// the same registrable domain sort next to each other.
pub fn domain_sort_key(name: &str) -> Vec<String> {
    name.rsplit('.').map(str::to_string).collect()
}
