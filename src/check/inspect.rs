//! Leaf certificate inspection.
//!
//! Produces findings about the issuer, the link between the leaf and the
//! certificate that signed it, the signature algorithm, and expiry.

use chrono::{DateTime, Duration, NaiveDateTime};
use x509_parser::certificate::X509Certificate;
use x509_parser::x509::X509Name;

use crate::report::{format_timedelta, Finding};

/// Well-known test CA that must never show up outside a lab.
const FAKE_CA_NAME: &str = "happy hacker fake ca";

/// First common name attribute of `name`, when one is present and decodes
/// as a string.
pub(crate) fn common_name(name: &X509Name<'_>) -> Option<String> {
    name.iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(|cn| cn.to_string())
}

/// OpenSSL-style long name for the leaf's signature algorithm. Unknown
/// algorithms fall back to their dotted OID.
fn signature_algorithm_name(leaf: &X509Certificate<'_>) -> String {
    let oid = leaf.signature_algorithm.algorithm.to_string();
    match oid.as_str() {
        "1.2.840.113549.1.1.4" => "md5WithRSAEncryption".to_string(),
        "1.2.840.113549.1.1.5" => "sha1WithRSAEncryption".to_string(),
        "1.2.840.113549.1.1.10" => "rsassaPss".to_string(),
        "1.2.840.113549.1.1.11" => "sha256WithRSAEncryption".to_string(),
        "1.2.840.113549.1.1.12" => "sha384WithRSAEncryption".to_string(),
        "1.2.840.113549.1.1.13" => "sha512WithRSAEncryption".to_string(),
        "1.2.840.10045.4.1" => "ecdsa-with-SHA1".to_string(),
        "1.2.840.10045.4.3.2" => "ecdsa-with-SHA256".to_string(),
        "1.2.840.10045.4.3.3" => "ecdsa-with-SHA384".to_string(),
        "1.2.840.10045.4.3.4" => "ecdsa-with-SHA512".to_string(),
        "1.3.101.112" => "ED25519".to_string(),
        "1.3.101.113" => "ED448".to_string(),
        _ => oid,
    }
}

/// Reports who issued the leaf and, when the chain carries the signing
/// certificate, whether its subject actually matches the leaf's issuer.
pub fn check_issuer(
    leaf: &X509Certificate<'_>,
    signer: Option<&X509Certificate<'_>>,
    findings: &mut Vec<Finding>,
) {
    let issuer = common_name(leaf.issuer()).unwrap_or_default();
    if issuer.to_lowercase() == FAKE_CA_NAME {
        findings.push(Finding::error(format!("Issued by: {}", issuer)));
    } else {
        findings.push(Finding::info(format!("Issued by: {}", issuer)));
    }

    if let Some(signer) = signer {
        let subject = common_name(signer.subject()).unwrap_or_default();
        if subject != issuer {
            findings.push(Finding::error(format!(
                "The certificate sign chain subject '{}' doesn't match the issuer '{}'.",
                subject, issuer
            )));
        }
    }
}

/// Flags signature algorithms from the SHA-1 family.
pub(crate) fn check_signature_algorithm_name(name: &str, findings: &mut Vec<Finding>) {
    if name.starts_with("sha1") {
        findings.push(Finding::error(format!("Unsecure signature algorithm {}", name)));
    }
}

/// Flags the leaf when it was signed with a SHA-1 family algorithm.
pub fn check_signature_algorithm(leaf: &X509Certificate<'_>, findings: &mut Vec<Finding>) {
    check_signature_algorithm_name(&signature_algorithm_name(leaf), findings);
}

/// Classifies an expiry timestamp relative to `checked_at`.
///
/// Expired certificates are errors, certificates inside the warning window
/// are warnings, and everything else is an informational finding with the
/// remaining lifetime floored to whole minutes.
pub(crate) fn classify_expiry(
    expires: NaiveDateTime,
    checked_at: NaiveDateTime,
    expiry_warn_days: i64,
    findings: &mut Vec<Finding>,
) {
    if expires < checked_at {
        findings.push(Finding::error(format!(
            "The certificate has expired on {}.",
            expires
        )));
    } else if expires < checked_at + Duration::days(expiry_warn_days) {
        findings.push(Finding::warning(format!(
            "The certificate expires on {} ({}).",
            expires,
            format_timedelta(expires - checked_at)
        )));
    } else {
        let seconds = (expires - checked_at).num_seconds();
        let whole_minutes = Duration::seconds(seconds - seconds.rem_euclid(60));
        findings.push(Finding::info(format!(
            "Valid until {} ({}).",
            expires,
            format_timedelta(whole_minutes)
        )));
    }
}

/// Classifies the leaf's notAfter timestamp and returns it so callers can
/// track the earliest expiry across a whole run.
pub fn check_expiry(
    leaf: &X509Certificate<'_>,
    checked_at: NaiveDateTime,
    expiry_warn_days: i64,
    findings: &mut Vec<Finding>,
) -> Option<NaiveDateTime> {
    let timestamp = leaf.validity().not_after.timestamp();
    let expires = DateTime::from_timestamp(timestamp, 0)?.naive_utc();
    classify_expiry(expires, checked_at, expiry_warn_days, findings);
    Some(expires)
}
