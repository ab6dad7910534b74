//! Concurrent certificate chain fetching.
//!
//! One tokio task per [`DomainSpec`], bounded by a semaphore; the caller
//! awaits the whole batch and only then sees the outcome map. A failed or
//! skipped fetch is data in the map, never an error that aborts the run.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{debug, error, warn};
use rustls::pki_types::{CertificateDer, ServerName};
use tokio::net::TcpStream;
use tokio::sync::Semaphore;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

use crate::config::{TCP_CONNECT_TIMEOUT_SECS, TLS_HANDSHAKE_TIMEOUT_SECS};
use crate::domain::{DomainGroup, DomainSpec};
use crate::error_handling::{CheckStats, FetchError};

mod verifier;

use verifier::AcceptAnyServerCert;

/// An ordered certificate chain exactly as presented by one TLS handshake.
#[derive(Debug, Clone)]
pub struct CertificateChain {
    /// DER-encoded certificates, leaf first.
    pub certs: Vec<CertificateDer<'static>>,
}

/// The result of one certificate fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Handshake succeeded and the peer presented this chain.
    Chain(CertificateChain),
    /// The fetch failed; the error is carried for reporting.
    Failure(FetchError),
    /// The spec was marked `!` and no connection was attempted.
    Skipped,
}

/// Builds the TLS client configuration used for chain capture.
///
/// Starts from the webpki roots, then swaps in a verifier that accepts any
/// presented chain; refusing the handshake here would hide exactly the
/// certificates worth reporting on.
fn capture_client_config() -> ClientConfig {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let mut config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    config
        .dangerous()
        .set_certificate_verifier(Arc::new(AcceptAnyServerCert));
    config
}

/// Fetches the certificate chain one spec presents.
///
/// Dials `connection_host:port` with the TCP connect timeout, negotiates
/// TLS with SNI set to `host` under the handshake timeout, and returns the
/// complete peer chain.
async fn fetch_one(
    config: Arc<ClientConfig>,
    spec: &DomainSpec,
) -> Result<CertificateChain, FetchError> {
    debug!("Fetching certificate chain for {}", spec);

    let server_name = match ServerName::try_from(spec.host.clone()) {
        Ok(name) => name,
        Err(e) => {
            error!("Invalid server name '{}': {e}", spec.host);
            return Err(FetchError::InvalidServerName {
                host: spec.host.clone(),
            });
        }
    };

    let addr = spec.address();
    let sock = match tokio::time::timeout(
        std::time::Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
        TcpStream::connect((spec.connection_host.clone(), spec.port)),
    )
    .await
    {
        Ok(Ok(sock)) => sock,
        Ok(Err(e)) => {
            error!("Failed to connect to {addr} - {e}");
            return Err(FetchError::Connect { addr, source: e });
        }
        Err(_) => {
            error!(
                "TCP connection timeout for {addr} ({}s)",
                TCP_CONNECT_TIMEOUT_SECS
            );
            return Err(FetchError::ConnectTimeout { addr });
        }
    };

    let connector = TlsConnector::from(config);
    let tls_stream = match tokio::time::timeout(
        std::time::Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
        connector.connect(server_name, sock),
    )
    .await
    {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            error!("TLS handshake failed for {}: {e}", spec.host);
            return Err(FetchError::Handshake {
                host: spec.host.clone(),
                source: e,
            });
        }
        Err(_) => {
            error!(
                "TLS handshake timeout for {} ({}s)",
                spec.host, TLS_HANDSHAKE_TIMEOUT_SECS
            );
            return Err(FetchError::HandshakeTimeout {
                host: spec.host.clone(),
            });
        }
    };

    let certs = tls_stream
        .get_ref()
        .1
        .peer_certificates()
        .map(|certs| certs.to_vec())
        .unwrap_or_default();
    if certs.is_empty() {
        error!("No peer certificates presented by {}", spec.host);
        return Err(FetchError::NoPeerCertificates {
            host: spec.host.clone(),
        });
    }

    debug!(
        "Captured {} certificate(s) from {}",
        certs.len(),
        spec.host
    );
    Ok(CertificateChain { certs })
}

/// Fetches the chain for every spec across all groups.
///
/// Returns only once every fetch has resolved; no partial results are
/// visible before that. Skip-fetch specs map to [`FetchOutcome::Skipped`]
/// without touching the network, and a panicked task is recorded as an
/// aborted fetch for its spec.
pub async fn fetch_domain_certs(
    groups: &[DomainGroup],
    semaphore: Arc<Semaphore>,
    stats: Arc<CheckStats>,
) -> HashMap<DomainSpec, FetchOutcome> {
    let config = Arc::new(capture_client_config());
    let mut outcomes: HashMap<DomainSpec, FetchOutcome> = HashMap::new();
    let mut tasks = FuturesUnordered::new();

    let specs: HashSet<DomainSpec> = groups
        .iter()
        .flat_map(|g| g.specs.iter().cloned())
        .collect();

    for spec in specs {
        if spec.skip_fetch {
            outcomes.insert(spec, FetchOutcome::Skipped);
            continue;
        }

        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Semaphore closed, skipping domain: {}", spec);
                continue;
            }
        };

        let config = Arc::clone(&config);
        let task_spec = spec.clone();
        let handle = tokio::spawn(async move {
            let _permit = permit;
            fetch_one(config, &task_spec).await
        });
        tasks.push(async move { (spec, handle.await) });
    }

    while let Some((spec, joined)) = tasks.next().await {
        let outcome = match joined {
            Ok(Ok(chain)) => FetchOutcome::Chain(chain),
            Ok(Err(e)) => {
                stats.increment(e.kind());
                FetchOutcome::Failure(e)
            }
            Err(join_error) => {
                warn!("Fetch task panicked: {:?}", join_error);
                let e = FetchError::Aborted {
                    host: spec.host.clone(),
                    detail: join_error.to_string(),
                };
                stats.increment(e.kind());
                FetchOutcome::Failure(e)
            }
        };
        outcomes.insert(spec, outcome);
    }

    outcomes
}
