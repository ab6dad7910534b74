//! Certificate checks for fetched domain groups.
//!
//! `check_domain_group` walks one group and produces findings in a stable
//! order per member: fetch failure, trust-store validation, issuer, chain
//! linkage, signature algorithm, expiry, and hostname reconciliation.
//! Duplicate messages inside a group collapse into one.

mod hostnames;
mod inspect;
mod validate;

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use openssl::x509::X509;
use x509_parser::certificate::X509Certificate;
use x509_parser::parse_x509_certificate;

pub use hostnames::{presented_names, reconcile_hostnames};
pub use inspect::{check_expiry, check_issuer, check_signature_algorithm};
pub use validate::{load_extra_anchors, validate_certificate_chain};

use crate::domain::{DomainGroup, DomainSpec};
use crate::error_handling::{CheckStats, FailureKind};
use crate::fetch::FetchOutcome;
use crate::report::{DomainReport, Finding};

/// Shared inputs for checking domain groups.
pub struct CheckContext<'a> {
    /// Fetch outcome per unique domain spec.
    pub outcomes: &'a HashMap<DomainSpec, FetchOutcome>,
    /// Timestamp the run started at, used for expiry arithmetic.
    pub checked_at: NaiveDateTime,
    /// Days before expiry at which a warning is raised.
    pub expiry_warn_days: i64,
    /// Skip trust-store validation entirely.
    pub insecure: bool,
    /// Extra trust anchors from a user-supplied bundle.
    pub extra_anchors: &'a [X509],
    /// Failure counters for the whole run.
    pub stats: &'a CheckStats,
}

fn parse_cert(der: &[u8]) -> Option<X509Certificate<'_>> {
    parse_x509_certificate(der).ok().map(|(_, cert)| cert)
}

/// Checks one domain group and folds the member findings into a single
/// report.
pub fn check_domain_group(group: &DomainGroup, ctx: &CheckContext<'_>) -> DomainReport {
    let mut findings: Vec<Finding> = Vec::new();
    let mut earliest: Option<NaiveDateTime> = None;
    let requested: HashSet<String> = group.specs.iter().map(|s| s.host.clone()).collect();

    for spec in &group.specs {
        let Some(outcome) = ctx.outcomes.get(spec) else {
            continue;
        };
        let chain = match outcome {
            FetchOutcome::Skipped => continue,
            FetchOutcome::Failure(e) => {
                findings.push(Finding::error(format!(
                    "Couldn't fetch certificate for {}.\n{}",
                    spec.display_name(),
                    e
                )));
                continue;
            }
            FetchOutcome::Chain(chain) => chain,
        };

        if !ctx.insecure {
            validate_certificate_chain(chain, ctx.extra_anchors, ctx.stats, &mut findings);
        }

        let Some(leaf_der) = chain.certs.first() else {
            continue;
        };
        let leaf = match parse_x509_certificate(leaf_der.as_ref()) {
            Ok((_, leaf)) => leaf,
            Err(e) => {
                ctx.stats.increment(FailureKind::CertificateParseError);
                findings.push(Finding::error(format!(
                    "Couldn't fetch certificate for {}.\n{}",
                    spec.display_name(),
                    e
                )));
                continue;
            }
        };
        let signer = chain.certs.get(1).and_then(|der| parse_cert(der.as_ref()));

        check_issuer(&leaf, signer.as_ref(), &mut findings);
        check_signature_algorithm(&leaf, &mut findings);
        if let Some(expires) =
            check_expiry(&leaf, ctx.checked_at, ctx.expiry_warn_days, &mut findings)
        {
            if earliest.map_or(true, |current| expires < current) {
                earliest = Some(expires);
            }
        }
        reconcile_hostnames(spec, &requested, &leaf, &mut findings);
    }

    let display_names = group.specs.iter().map(|s| s.display_name()).collect();
    DomainReport::new(display_names, findings, earliest)
}
