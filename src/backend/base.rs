//! Base backend trait and wire types for Parley
//!
//! This module defines the `Backend` trait that every chat backend client
//! implements, along with the JSON request and response shapes exchanged
//! with the chatbot server.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Prompt text, already trimmed by the caller
    pub message: String,
    /// Optional model hint; omitted from the body when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ChatRequest {
    /// Creates a new chat request
    ///
    /// # Examples
    ///
    /// ```
    /// use parley::backend::ChatRequest;
    ///
    /// let request = ChatRequest::new("Hello", Some("gemini-2.5-pro".to_string()));
    /// assert_eq!(request.message, "Hello");
    /// assert_eq!(request.model.as_deref(), Some("gemini-2.5-pro"));
    /// ```
    pub fn new(message: impl Into<String>, model: Option<String>) -> Self {
        Self {
            message: message.into(),
            model,
        }
    }
}

/// Response of `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Assistant reply text
    pub response: String,
    /// Tokens consumed by this exchange
    pub tokens_used: u64,
    /// True when the backend answered from its response cache
    pub was_cached: bool,
    /// Model that produced the reply
    pub model_name: String,
}

/// One stored prompt/response pair, as returned by `GET /history`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Backend row id
    pub id: i64,
    /// User prompt
    pub prompt: String,
    /// Assistant reply
    pub response: String,
    /// Tokens consumed by the exchange
    pub tokens_used: u64,
    /// When the exchange was stored
    #[serde(with = "iso_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Model that produced the reply, when recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    /// True when the reply was served from cache
    pub was_cached: bool,
}

/// Response of `GET /stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseStats {
    /// Number of stored history entries
    pub total_entries: u64,
    /// Sum of tokens used across all entries
    pub total_tokens_used: u64,
    /// Entries that were served from cache
    pub cached_entries: u64,
    /// Fraction of cached entries, between 0.0 and 1.0
    pub cache_hit_rate: f64,
    /// Timestamp of the newest entry, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_timestamp: Option<String>,
}

/// Response of `DELETE /history`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearHistoryResponse {
    /// Confirmation text from the backend
    pub message: String,
}

/// Response of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Overall service status
    pub status: String,
    /// Database connectivity status
    pub database: String,
    /// Number of stored history entries
    pub total_entries: u64,
    /// Whether the backend has its model API key configured
    pub api_configured: bool,
    /// Server time of the check
    pub timestamp: String,
}

/// Chat backend client trait
///
/// Every operation is a single request/response exchange. Implementations
/// report request failures as [`crate::error::ApiError`] inside the returned
/// `anyhow::Error` so callers can map them to user-facing text. No retries
/// are performed at this layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    /// Sends one prompt and waits for the assistant reply
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend answers non-2xx
    async fn send_message(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Fetches up to `limit` stored exchanges, newest first
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend answers non-2xx
    async fn get_history(&self, limit: u32) -> Result<Vec<HistoryEntry>>;

    /// Fetches aggregate statistics about the stored history
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend answers non-2xx
    async fn get_stats(&self) -> Result<DatabaseStats>;

    /// Deletes all stored history on the backend
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend answers non-2xx
    async fn clear_history(&self) -> Result<ClearHistoryResponse>;

    /// Checks that the backend and its database are reachable
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend answers non-2xx
    async fn health_check(&self) -> Result<HealthCheck>;
}

/// Serde adapter for backend timestamps
///
/// Accepts RFC 3339 strings as well as naive ISO 8601 strings without an
/// offset, which are interpreted as UTC. Serializes as RFC 3339.
mod iso_timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid timestamp: {}", raw))
        })
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }
}
