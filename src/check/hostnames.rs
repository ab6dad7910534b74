//! Hostname and alternate-name reconciliation.
//!
//! Compares the hostnames a group was defined with against the names the
//! leaf certificate actually certifies, which are its SAN DNS entries plus
//! the subject common name.

use std::collections::HashSet;

use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::GeneralName;

use crate::check::inspect::common_name;
use crate::domain::{domain_sort_key, DomainSpec};
use crate::report::Finding;

/// DNS names the leaf certifies: SAN DNS entries plus the subject CN.
pub fn presented_names(leaf: &X509Certificate<'_>) -> HashSet<String> {
    let mut names = HashSet::new();
    if let Ok(Some(san)) = leaf.subject_alternative_name() {
        for general_name in &san.value.general_names {
            if let GeneralName::DNSName(dns) = general_name {
                names.insert((*dns).to_string());
            }
        }
    }
    if let Some(cn) = common_name(leaf.subject()) {
        names.insert(cn);
    }
    names
}

/// One-level wildcard match: `*.example.com` covers `api.example.com` but
/// not `a.b.example.com` or `example.com` itself.
pub(crate) fn wildcard_matches(pattern: &str, host: &str) -> bool {
    let Some(suffix) = pattern.strip_prefix("*.") else {
        return false;
    };
    let pattern_labels: Vec<&str> = suffix.split('.').collect();
    let host_labels: Vec<&str> = host.split('.').collect();
    host_labels.len() == pattern_labels.len() + 1 && host_labels[1..] == pattern_labels[..]
}

fn sorted_by_domain(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut names: Vec<String> = names.into_iter().collect();
    names.sort_by_key(|name| domain_sort_key(name));
    names
}

/// Reconciles `requested` hostnames against what the leaf certifies.
///
/// A partial match lists the certified names; a single requested name then
/// also checks the subject CN, accepting one-level wildcards, while several
/// requested names turn the leftovers into a warning. A full match is
/// informational, and surplus certified names are a warning.
pub fn reconcile_hostnames(
    spec: &DomainSpec,
    requested: &HashSet<String>,
    leaf: &X509Certificate<'_>,
    findings: &mut Vec<Finding>,
) {
    let presented = presented_names(leaf);
    let unmatched: HashSet<String> = requested.difference(&presented).cloned().collect();

    if !unmatched.is_empty() {
        findings.push(Finding::info(format!(
            "Alternate names in certificate: {}",
            sorted_by_domain(presented.iter().cloned()).join(", ")
        )));
        if requested.len() == 1 {
            let subject = common_name(leaf.subject()).unwrap_or_default();
            if subject != spec.host && !wildcard_matches(&subject, &spec.host) {
                findings.push(Finding::error(format!(
                    "The requested domain {} doesn't match the certificate domain {}.",
                    spec.display_name(),
                    subject
                )));
            }
        } else {
            findings.push(Finding::warning(format!(
                "Unmatched alternate names {}.",
                sorted_by_domain(unmatched).join(", ")
            )));
        }
    } else if requested == &presented {
        findings.push(Finding::info("Alternate names match specified domains."));
    } else {
        let extra: Vec<String> = presented.difference(requested).cloned().collect();
        findings.push(Finding::warning(format!(
            "More alternate names than specified {}.",
            sorted_by_domain(extra).join(", ")
        )));
    }
}
