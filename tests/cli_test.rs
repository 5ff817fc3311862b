//! Command-line tests for the `parley` binary

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use parley::error::OFFLINE_MESSAGE;

use common::{chat_reply, history_entry, refused_url, stats_body, temp_config_file};

/// Command without PARLEY_* overrides from the test environment
fn parley_with_config(config_path: &str) -> Command {
    let mut cmd = Command::cargo_bin("parley").expect("binary should build");
    cmd.env_remove("PARLEY_API_URL")
        .env_remove("PARLEY_TIMEOUT_SECONDS")
        .env_remove("PARLEY_HISTORY_LIMIT")
        .env_remove("PARLEY_MODEL")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .args(["--config", config_path]);
    cmd
}

fn parley() -> Command {
    parley_with_config("does-not-exist.yaml")
}

#[test]
fn test_help_lists_commands() {
    parley()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("history"))
        .stdout(predicate::str::contains("health"));
}

#[test]
fn test_send_requires_message() {
    parley().arg("send").assert().failure();
}

#[test]
fn test_invalid_api_url_is_rejected() {
    parley()
        .args(["--api-url", "ftp://example.com", "health"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("http or https"));
}

#[test]
fn test_health_against_offline_backend() {
    parley()
        .args(["--api-url", &refused_url(), "health"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(OFFLINE_MESSAGE));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stats_prints_summary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stats_body()))
        .mount(&server)
        .await;

    parley()
        .args(["--api-url", &server.uri(), "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total conversations: 2"))
        .stdout(predicate::str::contains("Cache hit rate:      50.0%"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_send_joins_words_and_uses_model_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({"message": "hello there", "model": "gemini-2.5-pro"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("General Kenobi")))
        .expect(1)
        .mount(&server)
        .await;

    parley()
        .args([
            "--api-url",
            &server.uri(),
            "--model",
            "gemini-2.5-pro",
            "send",
            "hello",
            "there",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("General Kenobi"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_send_failure_exits_nonzero() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    parley()
        .args(["--api-url", &server.uri(), "send", "hello"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("❌ Error: Rate limit exceeded"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_history_json_uses_config_file_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/history"))
        .and(query_param("limit", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([history_entry(1)])))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, config_path) = temp_config_file(&format!(
        "backend:\n  base_url: {}\nchat:\n  history_limit: 7\n",
        server.uri()
    ));

    let mut cmd = parley_with_config(config_path.to_str().unwrap());
    cmd.args(["history", "--json"]);
    let output = cmd.assert().success().get_output().stdout.clone();

    let messages: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let messages = messages.as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "question 1");
    assert_eq!(messages[1]["role"], "assistant");
}

#[test]
fn test_history_table_conflicts_with_json() {
    parley()
        .args(["history", "--table", "--json"])
        .assert()
        .failure();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_clear_with_yes_skips_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "cleared"})))
        .expect(1)
        .mount(&server)
        .await;

    parley()
        .args(["--api-url", &server.uri(), "clear", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backend history deleted."));
}
