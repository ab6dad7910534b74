//! Throwaway certificates for tests.

use chrono::Utc;
use openssl::asn1::{Asn1Integer, Asn1Time};
use openssl::bn::{BigNum, MsbOption};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::x509::extension::{BasicConstraints, SubjectAlternativeName};
use openssl::x509::{X509, X509Builder, X509Name, X509NameBuilder};

pub(crate) fn unix_now() -> i64 {
    Utc::now().timestamp()
}

pub(crate) fn gen_key() -> PKey<Private> {
    let rsa = Rsa::generate(2048).expect("rsa");
    PKey::from_rsa(rsa).expect("pkey")
}

fn build_name(cn: &str) -> X509Name {
    let mut builder = X509NameBuilder::new().unwrap();
    builder.append_entry_by_nid(Nid::COMMONNAME, cn).unwrap();
    builder.build()
}

fn build_cert(
    cn: &str,
    sans: &[&str],
    is_ca: bool,
    key: &PKey<Private>,
    issuer: Option<(&X509, &PKey<Private>)>,
    not_before: i64,
    not_after: i64,
) -> X509 {
    let mut builder = X509Builder::new().unwrap();
    builder.set_version(2).unwrap();

    let mut bn = BigNum::new().unwrap();
    bn.rand(64, MsbOption::MAYBE_ZERO, false).unwrap();
    let serial = Asn1Integer::from_bn(&bn).unwrap();
    builder.set_serial_number(&serial).unwrap();

    let subject = build_name(cn);
    builder.set_subject_name(&subject).unwrap();
    match issuer {
        Some((cert, _)) => builder.set_issuer_name(cert.subject_name()).unwrap(),
        None => builder.set_issuer_name(&subject).unwrap(),
    }

    builder
        .set_not_before(&Asn1Time::from_unix(not_before).unwrap())
        .unwrap();
    builder
        .set_not_after(&Asn1Time::from_unix(not_after).unwrap())
        .unwrap();
    builder.set_pubkey(key).unwrap();

    if is_ca {
        let constraints = BasicConstraints::new().critical().ca().build().unwrap();
        builder.append_extension(constraints).unwrap();
    }
    if !sans.is_empty() {
        let ext = {
            let mut san = SubjectAlternativeName::new();
            for name in sans {
                san.dns(name);
            }
            let ctx = builder.x509v3_context(issuer.map(|(cert, _)| &**cert), None);
            san.build(&ctx).unwrap()
        };
        builder.append_extension(ext).unwrap();
    }

    let signing_key = issuer.map(|(_, issuer_key)| issuer_key).unwrap_or(key);
    builder.sign(signing_key, MessageDigest::sha256()).unwrap();
    builder.build()
}

/// Self-signed CA, valid for a year.
pub(crate) fn build_ca(cn: &str, key: &PKey<Private>) -> X509 {
    build_cert(
        cn,
        &[],
        true,
        key,
        None,
        unix_now() - 3_600,
        unix_now() + 86_400 * 365,
    )
}

/// CA signed by `issuer`, valid for a year.
pub(crate) fn build_intermediate(
    cn: &str,
    key: &PKey<Private>,
    issuer: &X509,
    issuer_key: &PKey<Private>,
) -> X509 {
    build_cert(
        cn,
        &[],
        true,
        key,
        Some((issuer, issuer_key)),
        unix_now() - 3_600,
        unix_now() + 86_400 * 365,
    )
}

/// End-entity certificate signed by `issuer` with the given SAN DNS names.
pub(crate) fn build_leaf(
    cn: &str,
    sans: &[&str],
    key: &PKey<Private>,
    issuer: &X509,
    issuer_key: &PKey<Private>,
    not_before: i64,
    not_after: i64,
) -> X509 {
    build_cert(
        cn,
        sans,
        false,
        key,
        Some((issuer, issuer_key)),
        not_before,
        not_after,
    )
}
