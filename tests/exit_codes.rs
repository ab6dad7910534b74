//! Tests for exit code precedence across mixed check outcomes.

mod helpers;

use cert_status::initialization::init_crypto_provider;
use cert_status::{run_checks, Config, Severity};
use helpers::{build_ca, build_leaf, gen_key, spawn_tls_server, unix_now};

fn insecure_config(domains: Vec<String>) -> Config {
    Config {
        domains,
        insecure: true,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_exit_code_zero_when_all_clear() {
    init_crypto_provider();

    let ca_key = gen_key();
    let ca = build_ca("Unit Test Root CA", &ca_key);
    let key = gen_key();
    let leaf = build_leaf(
        "localhost",
        &["localhost"],
        &key,
        &ca,
        &ca_key,
        unix_now() - 3_600,
        unix_now() + 86_400 * 90,
    );
    let port = spawn_tls_server(&[&leaf], &key).await;

    let report = run_checks(insecure_config(vec![format!(
        "localhost|127.0.0.1:{}",
        port
    )]))
    .await
    .unwrap();

    assert_eq!(report.exit_code(), 0, "healthy endpoint should exit clean");
    assert_eq!(report.total_errors, 0);
    assert_eq!(report.total_warnings, 0);
}

#[tokio::test]
async fn test_exit_code_three_on_warnings() {
    init_crypto_provider();

    let ca_key = gen_key();
    let ca = build_ca("Unit Test Root CA", &ca_key);
    let key = gen_key();
    // Expires within the default 14-day warning window.
    let leaf = build_leaf(
        "localhost",
        &["localhost"],
        &key,
        &ca,
        &ca_key,
        unix_now() - 3_600,
        unix_now() + 86_400 * 5,
    );
    let port = spawn_tls_server(&[&leaf], &key).await;

    let report = run_checks(insecure_config(vec![format!(
        "localhost|127.0.0.1:{}",
        port
    )]))
    .await
    .unwrap();

    assert_eq!(report.exit_code(), 3, "near expiry should exit 3");
    assert_eq!(report.total_errors, 0);
    assert_eq!(report.total_warnings, 1);
    let warning = report.reports[0]
        .findings
        .iter()
        .find(|f| f.severity == Severity::Warning)
        .unwrap();
    assert!(warning.message.starts_with("The certificate expires on"));
}

#[tokio::test]
async fn test_exit_code_four_when_errors_outrank_warnings() {
    init_crypto_provider();

    let ca_key = gen_key();
    let ca = build_ca("Unit Test Root CA", &ca_key);
    let near_key = gen_key();
    let near = build_leaf(
        "localhost",
        &["localhost"],
        &near_key,
        &ca,
        &ca_key,
        unix_now() - 3_600,
        unix_now() + 86_400 * 5,
    );
    let expired_key = gen_key();
    let expired = build_leaf(
        "localhost",
        &["localhost"],
        &expired_key,
        &ca,
        &ca_key,
        unix_now() - 86_400 * 30,
        unix_now() - 86_400,
    );

    let near_port = spawn_tls_server(&[&near], &near_key).await;
    let expired_port = spawn_tls_server(&[&expired], &expired_key).await;

    let report = run_checks(insecure_config(vec![
        format!("localhost|127.0.0.1:{}", near_port),
        format!("localhost|127.0.0.1:{}", expired_port),
    ]))
    .await
    .unwrap();

    assert_eq!(report.total_errors, 1);
    assert_eq!(report.total_warnings, 1);
    assert_eq!(report.exit_code(), 4, "errors take precedence over warnings");
}

#[tokio::test]
async fn test_exit_code_five_when_definitions_are_broken() {
    init_crypto_provider();

    let ca_key = gen_key();
    let ca = build_ca("Unit Test Root CA", &ca_key);
    let expired_key = gen_key();
    let expired = build_leaf(
        "localhost",
        &["localhost"],
        &expired_key,
        &ca,
        &ca_key,
        unix_now() - 86_400 * 30,
        unix_now() - 86_400,
    );
    let port = spawn_tls_server(&[&expired], &expired_key).await;

    let report = run_checks(insecure_config(vec![
        "bad.example.com:port".to_string(),
        format!("localhost|127.0.0.1:{}", port),
    ]))
    .await
    .unwrap();

    assert_eq!(report.definition_errors, 1);
    assert_eq!(report.total_errors, 1);
    assert_eq!(
        report.exit_code(),
        5,
        "definition errors take precedence over check errors"
    );
}
