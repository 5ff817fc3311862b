use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::MockServer;

use parley::backend::HttpBackend;
use parley::config::BackendConfig;
use parley::ConversationController;

#[allow(dead_code)]
pub fn backend_config(base_url: &str) -> BackendConfig {
    BackendConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
    }
}

#[allow(dead_code)]
pub fn http_backend(server: &MockServer) -> HttpBackend {
    HttpBackend::new(&backend_config(&server.uri())).expect("failed to build backend")
}

#[allow(dead_code)]
pub fn controller_for(server: &MockServer) -> Arc<ConversationController> {
    Arc::new(ConversationController::new(Arc::new(http_backend(server))))
}

/// Base URL of a loopback port with no listener behind it
#[allow(dead_code)]
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let port = listener.local_addr().expect("no local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

#[allow(dead_code)]
pub fn chat_reply(text: &str) -> Value {
    json!({
        "response": text,
        "tokens_used": 42,
        "was_cached": false,
        "model_name": "gemini-2.5-flash"
    })
}

#[allow(dead_code)]
pub fn history_entry(id: i64) -> Value {
    json!({
        "id": id,
        "prompt": format!("question {}", id),
        "response": format!("answer {}", id),
        "tokens_used": 10 * id,
        "timestamp": format!("2024-05-0{}T09:30:00", id),
        "model_name": "gemini-2.5-flash",
        "was_cached": id % 2 == 0
    })
}

#[allow(dead_code)]
pub fn stats_body() -> Value {
    json!({
        "total_entries": 2,
        "total_tokens_used": 30,
        "cached_entries": 1,
        "cache_hit_rate": 0.5,
        "latest_timestamp": "2024-05-02T09:30:00"
    })
}

#[allow(dead_code)]
pub fn health_body() -> Value {
    json!({
        "status": "healthy",
        "database": "connected",
        "total_entries": 2,
        "api_configured": true,
        "timestamp": "2024-05-02T09:31:00"
    })
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
