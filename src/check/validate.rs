//! Trust-store validation of captured certificate chains.
//!
//! Each chain element is verified individually, starting at the root end.
//! Once an element has been processed it joins the trusted set for the
//! elements below it, whether or not its own verification passed. A broken
//! root therefore produces exactly one finding instead of cascading down
//! the whole chain.

use std::path::Path;

use anyhow::Context;
use log::debug;
use openssl::error::ErrorStack;
use openssl::stack::Stack;
use openssl::x509::store::{X509Store, X509StoreBuilder};
use openssl::x509::{X509, X509StoreContext};

use crate::error_handling::{CheckStats, FailureKind};
use crate::fetch::CertificateChain;
use crate::report::Finding;

/// Loads extra trust anchors from a PEM bundle.
pub fn load_extra_anchors(path: &Path) -> anyhow::Result<Vec<X509>> {
    let pem = std::fs::read(path)
        .with_context(|| format!("Couldn't read CA bundle {}", path.display()))?;
    let anchors = X509::stack_from_pem(&pem)
        .with_context(|| format!("Couldn't parse CA bundle {}", path.display()))?;
    debug!("Loaded {} extra trust anchors from {}", anchors.len(), path.display());
    Ok(anchors)
}

/// Builds a store holding the system default CA paths plus every
/// certificate in `anchors` and `trusted`.
fn build_store(anchors: &[X509], trusted: &[X509]) -> Result<X509Store, ErrorStack> {
    let mut builder = X509StoreBuilder::new()?;
    builder.set_default_paths()?;
    for cert in anchors.iter().chain(trusted) {
        builder.add_cert(cert.clone())?;
    }
    Ok(builder.build())
}

/// Verifies a single certificate against the built store. Returns the
/// OpenSSL error text when verification fails.
fn verify_single(
    cert: &X509,
    anchors: &[X509],
    trusted: &[X509],
) -> Result<Option<String>, ErrorStack> {
    let store = build_store(anchors, trusted)?;
    let untrusted: Stack<X509> = Stack::new()?;
    let mut ctx = X509StoreContext::new()?;
    let passed = ctx.init(&store, cert, &untrusted, |c| c.verify_cert())?;
    if passed {
        Ok(None)
    } else {
        Ok(Some(ctx.error().to_string()))
    }
}

/// Validates every element of `chain` against the trust store, walking
/// from the root end toward the leaf and trusting ancestors as it goes.
///
/// Each failed element contributes one error finding. The store starts
/// from the system default CA paths; `extra_anchors` come from an optional
/// user-supplied bundle.
pub fn validate_certificate_chain(
    chain: &CertificateChain,
    extra_anchors: &[X509],
    stats: &CheckStats,
    findings: &mut Vec<Finding>,
) {
    let mut certs: Vec<X509> = Vec::with_capacity(chain.certs.len());
    for der in &chain.certs {
        match X509::from_der(der.as_ref()) {
            Ok(cert) => certs.push(cert),
            Err(e) => {
                stats.increment(FailureKind::ChainValidationError);
                findings.push(Finding::error(format!("Validation error '{}'.", e)));
                return;
            }
        }
    }

    let mut trusted: Vec<X509> = Vec::new();
    for (index, cert) in certs.iter().enumerate().rev() {
        match verify_single(cert, extra_anchors, &trusted) {
            Ok(None) => {}
            Ok(Some(error_text)) => {
                stats.increment(FailureKind::ChainValidationError);
                findings.push(Finding::error(format!("Validation error '{}'.", error_text)));
            }
            Err(e) => {
                stats.increment(FailureKind::ChainValidationError);
                findings.push(Finding::error(format!("Validation error '{}'.", e)));
            }
        }
        // Intermediates vouch for the elements below them even when their
        // own verification failed.
        if index > 0 {
            trusted.push(cert.clone());
        }
    }
}
