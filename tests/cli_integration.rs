//! CLI integration tests
//!
//! Runs the `ankarakart` binary, against a mock backend where a query has to
//! reach the network.

mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{CARD, MockData, mount_handshake, mount_query};
use predicates::prelude::*;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use wiremock::MockServer;

/// The binary with host and proxy variables from the outer environment removed
fn ankarakart_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("ankarakart");
    for var in [
        "ANKARAKART_PRIMARY_HOST",
        "ANKARAKART_APP_VERSION",
        "ANKARAKART_IDENTITY_FILE",
        "HTTPS_PROXY",
        "HTTP_PROXY",
        "ALL_PROXY",
        "https_proxy",
        "http_proxy",
        "all_proxy",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn config_for(server: &MockServer) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[backend]
primary_host = "{}"

[network]
request_timeout = 10
        "#,
        server.uri()
    )
    .unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_version_flag() {
    let mut cmd = cargo_bin_cmd!("ankarakart");
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    let mut cmd = cargo_bin_cmd!("ankarakart");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("balance"))
        .stdout(predicate::str::contains("usage"))
        .stdout(predicate::str::contains("--raw"))
        .stdout(predicate::str::contains("--identity-file"));
}

#[test]
fn test_missing_card_argument() {
    let mut cmd = cargo_bin_cmd!("ankarakart");
    cmd.arg("balance");

    cmd.assert().failure().stderr(predicate::str::contains("CARD"));
}

#[test]
fn test_invalid_card_exits_before_network() {
    let dir = TempDir::new().unwrap();
    let identity_file = dir.path().join("identity.json");

    let mut cmd = ankarakart_cmd();
    cmd.env("ANKARAKART_CONFIG", dir.path().join("missing.toml"))
        .args(["balance", "12345"])
        .arg("--identity-file")
        .arg(&identity_file)
        .arg("--no-save-identity");

    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Validation failed for card_id"));

    assert!(!identity_file.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_balance_prints_json_and_saves_identity() {
    let server = MockServer::start().await;
    mount_handshake(&server, "3.1.4", 1).await;
    mount_query(&server, "AnkaraKartBakiye", &MockData::balance("0")).await;

    let config = config_for(&server);
    let dir = TempDir::new().unwrap();
    let identity_file = dir.path().join("state").join("identity.json");

    let mut cmd = ankarakart_cmd();
    cmd.args(["balance", CARD, "--config"])
        .arg(config.path())
        .arg("--identity-file")
        .arg(&identity_file);

    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let balance: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(balance["credit"], "42.50");
    assert_eq!(balance["message"], "Query Successful");

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&identity_file).unwrap()).unwrap();
    assert_eq!(stored["appVersion"], "3.1.4");
    assert!(stored["deviceGuid"].as_str().unwrap().starts_with('{'));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_raw_usage_output() {
    let server = MockServer::start().await;
    mount_handshake(&server, "3.0.6", 1).await;
    mount_query(&server, "AnkaraKartKullanim", &MockData::usage()).await;

    let config = config_for(&server);
    let dir = TempDir::new().unwrap();

    let mut cmd = ankarakart_cmd();
    cmd.args(["usage", CARD, "--raw", "--no-save-identity", "--config"])
        .arg(config.path())
        .arg("--identity-file")
        .arg(dir.path().join("identity.json"));

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows.as_array().map(Vec::len), Some(2));
    assert_eq!(rows[0]["arac"], "Otobüs");
    assert!(!dir.path().join("identity.json").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_backend_rejection_exits_with_error() {
    let server = MockServer::start().await;
    mount_handshake(&server, "3.0.6", 1).await;
    mount_query(&server, "AnkaraKartKullanim", &MockData::rejected("Hata")).await;

    let config = config_for(&server);
    let dir = TempDir::new().unwrap();

    let mut cmd = ankarakart_cmd();
    cmd.args(["usage", CARD, "--no-save-identity", "--config"])
        .arg(config.path())
        .arg("--identity-file")
        .arg(dir.path().join("identity.json"));

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Backend rejected AnkaraKartKullanim"));
}
