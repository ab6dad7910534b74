// Shared test helpers for certificate minting and in-process TLS endpoints.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::sync::Arc;

use openssl::asn1::{Asn1Integer, Asn1Time};
use openssl::bn::{BigNum, MsbOption};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::x509::extension::{BasicConstraints, SubjectAlternativeName};
use openssl::x509::{X509, X509Builder, X509NameBuilder};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio_rustls::rustls::ServerConfig;
use tokio_rustls::TlsAcceptor;

/// Current time as unix seconds, for certificate validity windows.
#[allow(dead_code)] // Used by other test files
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Generates a fresh 2048-bit RSA key.
#[allow(dead_code)] // Used by other test files
pub fn gen_key() -> PKey<Private> {
    let rsa = Rsa::generate(2048).expect("rsa");
    PKey::from_rsa(rsa).expect("pkey")
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

    let subject = {
        let mut name = X509NameBuilder::new().unwrap();
        name.append_entry_by_nid(Nid::COMMONNAME, cn).unwrap();
        name.build()
    };
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
#[allow(dead_code)] // Used by other test files
pub fn build_ca(cn: &str, key: &PKey<Private>) -> X509 {
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

/// End-entity certificate signed by `issuer` with the given SAN DNS names.
#[allow(dead_code)] // Used by other test files
pub fn build_leaf(
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

/// Serves the given chain on a fresh localhost port. Each accepted
/// connection completes a handshake and waits for the client to hang up.
#[allow(dead_code)] // Used by other test files
pub async fn spawn_tls_server(chain: &[&X509], key: &PKey<Private>) -> u16 {
    let certs: Vec<CertificateDer<'static>> = chain
        .iter()
        .map(|cert| CertificateDer::from(cert.to_der().unwrap()))
        .collect();
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(
        key.private_key_to_pkcs8().unwrap(),
    ));
    let config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                if let Ok(mut tls) = acceptor.accept(stream).await {
                    let mut buf = [0u8; 1];
                    let _ = tls.read(&mut buf).await;
                }
            });
        }
    });
    port
}
