//! Integration tests for the `aretas` CLI binary.
//!
//! Argument parsing, help output, config handling and error exit codes run
//! without a network; API-bound commands run against a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `aretas` binary with env isolation.
///
/// Clears all `ARETAS_*` env vars and points config directories at
/// `home` so tests never touch the user's real configuration.
fn aretas_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("aretas");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("ARETAS_PROFILE")
        .env_remove("ARETAS_API_URL")
        .env_remove("ARETAS_TOKEN")
        .env_remove("ARETAS_OUTPUT")
        .env_remove("ARETAS_INSECURE")
        .env_remove("ARETAS_TIMEOUT")
        .env_remove("ARETAS_USERNAME")
        .env_remove("ARETAS_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Write a config file where `aretas` looks for it under `home`.
fn write_config(home: &Path, contents: &str) {
    let dir = home.join(".config").join("aretas");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), contents).unwrap();
}

/// Run a blocking command from inside a tokio test.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = aretas_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_command_groups() {
    let home = tempfile::tempdir().unwrap();
    aretas_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("alerts")
            .and(predicate::str::contains("locations"))
            .and(predicate::str::contains("classifiers"))
            .and(predicate::str::contains("token")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    aretas_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("aretas"));
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    aretas_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_api_command_without_config_explains_setup() {
    let home = tempfile::tempdir().unwrap();
    aretas_cmd(home.path())
        .args(["alerts", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API URL configured"));
}

#[test]
fn test_unknown_profile_exits_not_found() {
    let home = tempfile::tempdir().unwrap();
    write_config(
        home.path(),
        r#"
[profiles.lab]
api_url = "https://lab.example.com/rest/"
token = "tok"
"#,
    );
    let output = aretas_cmd(home.path())
        .args(["--profile", "prod", "alerts", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    let text = combined_output(&output);
    assert!(text.contains("Profile 'prod' not found"), "{text}");
    assert!(text.contains("lab"), "{text}");
}

#[test]
fn test_inverted_time_window_is_a_usage_error() {
    let home = tempfile::tempdir().unwrap();
    let output = aretas_cmd(home.path())
        .args([
            "--api-url",
            "http://127.0.0.1:9/rest/",
            "--token",
            "tok",
            "data",
            "range",
            "1001",
            "--begin",
            "2000",
            "--end",
            "1000",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_show_masks_secrets() {
    let home = tempfile::tempdir().unwrap();
    write_config(
        home.path(),
        r#"
default_profile = "lab"

[profiles.lab]
api_url = "https://lab.example.com/rest/"
username = "ops"
password = "hunter2"
"#,
    );
    aretas_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Default profile: lab")
                .and(predicate::str::contains("https://lab.example.com/rest/"))
                .and(predicate::str::contains("hunter2").not()),
        );
}

#[test]
fn test_config_profiles_marks_active() {
    let home = tempfile::tempdir().unwrap();
    write_config(
        home.path(),
        r#"
default_profile = "b"

[profiles.a]
api_url = "https://a.example.com/rest/"

[profiles.b]
api_url = "https://b.example.com/rest/"
"#,
    );
    aretas_cmd(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout("a\nb *\n");
}

// ── API-bound commands ──────────────────────────────────────────────

#[tokio::test]
async fn test_alerts_list_with_flag_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/alert/list"))
        .and(header("authorization", "Bearer flag-tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "al-1", "sensorType": 248, "name": "Too hot" },
            { "id": "al-2", "sensorType": 96 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = aretas_cmd(home.path());
    cmd.args([
        "--api-url",
        &format!("{}/rest/", server.uri()),
        "--token",
        "flag-tok",
        "-o",
        "plain",
        "alerts",
        "list",
    ]);

    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "al-1\nal-2\n");
}

#[tokio::test]
async fn test_profile_token_env_reaches_the_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/timezone/query"))
        .and(header("authorization", "Bearer env-tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "booleanResponse": true,
            "message": "America/Toronto"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    write_config(
        home.path(),
        &format!(
            r#"
default_profile = "lab"

[profiles.lab]
api_url = "{}/rest/"
token_env = "LAB_TOKEN"
"#,
            server.uri()
        ),
    );

    let mut cmd = aretas_cmd(home.path());
    cmd.env("LAB_TOKEN", "env-tok")
        .args(["-o", "plain", "geo", "timezone", "43.65", "-79.38"]);

    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "America/Toronto");
}

#[tokio::test]
async fn test_rejected_token_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/greetings/isloggedin"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = aretas_cmd(home.path());
    cmd.args([
        "--api-url",
        &format!("{}/rest/", server.uri()),
        "--token",
        "stale",
        "token",
    ]);

    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("rejected"));
}

#[tokio::test]
async fn test_failed_fetch_reports_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/dataclassifier/list"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = aretas_cmd(home.path());
    cmd.args([
        "--api-url",
        &format!("{}/rest/", server.uri()),
        "--token",
        "tok",
        "classifiers",
        "list",
    ]);

    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("no data for data classifiers"));
}

#[tokio::test]
async fn test_classifier_purge_refused_by_server_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/dataclassifierrecord/purge"))
        .and(wiremock::matchers::query_param("dataClassifierId", "dc-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "booleanResponse": false,
            "message": "classifier is locked"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = aretas_cmd(home.path());
    cmd.args([
        "--api-url",
        &format!("{}/rest/", server.uri()),
        "--token",
        "tok",
        "--yes",
        "classifiers",
        "purge",
        "dc-7",
    ]);

    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(1), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("classifier is locked"));
}

#[tokio::test]
async fn test_classifier_purge_with_yes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/dataclassifierrecord/purge"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "booleanResponse": true,
            "message": "3 records removed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = aretas_cmd(home.path());
    cmd.args([
        "--api-url",
        &format!("{}/rest/", server.uri()),
        "--token",
        "tok",
        "-y",
        "classifiers",
        "purge",
        "dc-7",
    ]);

    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("3 records removed"));
}
