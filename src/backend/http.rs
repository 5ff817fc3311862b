//! HTTP backend implementation for Parley
//!
//! This module implements the `Backend` trait against the chatbot server's
//! JSON-over-HTTP API. Status codes and transport failures are classified
//! into [`ApiError`] so the conversation layer can show a stable message.

use crate::backend::{
    Backend, ChatRequest, ChatResponse, ClearHistoryResponse, DatabaseStats, HealthCheck,
    HistoryEntry,
};
use crate::config::BackendConfig;
use crate::error::{ApiError, ParleyError, Result};

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Chat backend reached over HTTP
///
/// One `reqwest::Client` is shared by all requests; the configured timeout
/// applies to each request individually.
///
/// # Examples
///
/// ```no_run
/// use parley::backend::{Backend, ChatRequest, HttpBackend};
/// use parley::config::BackendConfig;
///
/// # async fn example() -> parley::error::Result<()> {
/// let backend = HttpBackend::new(&BackendConfig::default())?;
/// let reply = backend.send_message(ChatRequest::new("Hello!", None)).await?;
/// println!("{}", reply.response);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a new HTTP backend client
    ///
    /// # Arguments
    ///
    /// * `config` - Backend configuration containing base URL and timeout
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use parley::backend::HttpBackend;
    /// use parley::config::BackendConfig;
    ///
    /// let config = BackendConfig {
    ///     base_url: "http://127.0.0.1:8000/".to_string(),
    ///     timeout_seconds: 30,
    /// };
    /// let backend = HttpBackend::new(&config).unwrap();
    /// assert_eq!(backend.base_url(), "http://127.0.0.1:8000");
    /// ```
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("parley/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| ParleyError::Backend(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();

        tracing::info!(
            "Initialized HTTP backend: base_url={}, timeout={}s",
            base_url,
            config.timeout_seconds
        );

        Ok(Self { client, base_url })
    }

    /// Base URL that request paths are appended to, without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a prepared request and decode a successful JSON body
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Backend {} request failed: {}", operation, e);
            classify_transport_error(&e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Backend {} returned error {}: {}", operation, status, body);
            return Err(classify_status(status, &body).into());
        }

        let parsed = response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse backend {} response: {}", operation, e);
            ApiError::Other {
                status: Some(status.as_u16()),
                detail: None,
                message: format!("Failed to parse {} response: {}", operation, e),
            }
        })?;

        Ok(parsed)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn send_message(&self, request: ChatRequest) -> Result<ChatResponse> {
        tracing::debug!(
            "Sending chat message: {} chars, model={:?}",
            request.message.len(),
            request.model
        );
        let builder = self.client.post(self.url("/chat")).json(&request);
        let response: ChatResponse = self.execute(builder, "chat").await?;
        tracing::debug!(
            "Chat response: tokens={}, cached={}, model={}",
            response.tokens_used,
            response.was_cached,
            response.model_name
        );
        Ok(response)
    }

    async fn get_history(&self, limit: u32) -> Result<Vec<HistoryEntry>> {
        tracing::debug!("Fetching history: limit={}", limit);
        let builder = self
            .client
            .get(self.url("/history"))
            .query(&[("limit", limit)]);
        self.execute(builder, "history").await
    }

    async fn get_stats(&self) -> Result<DatabaseStats> {
        tracing::debug!("Fetching stats");
        self.execute(self.client.get(self.url("/stats")), "stats")
            .await
    }

    async fn clear_history(&self) -> Result<ClearHistoryResponse> {
        tracing::info!("Clearing backend history");
        self.execute(self.client.delete(self.url("/history")), "clear history")
            .await
    }

    async fn health_check(&self) -> Result<HealthCheck> {
        tracing::debug!("Checking backend health");
        self.execute(self.client.get(self.url("/health")), "health")
            .await
    }
}

/// Map a non-2xx status and its body to an [`ApiError`]
pub(crate) fn classify_status(status: StatusCode, body: &str) -> ApiError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited,
        StatusCode::BAD_REQUEST => ApiError::BadRequest {
            detail: extract_detail(body),
        },
        StatusCode::INTERNAL_SERVER_ERROR => ApiError::ServerError,
        other => ApiError::Other {
            status: Some(other.as_u16()),
            detail: extract_detail(body),
            message: format!("Request failed with status code {}", other.as_u16()),
        },
    }
}

/// Map a failure to get any response at all to an [`ApiError`]
fn classify_transport_error(error: &reqwest::Error) -> ApiError {
    if error.is_connect() {
        ApiError::ConnectionRefused(error.to_string())
    } else {
        ApiError::Other {
            status: None,
            detail: None,
            message: error.to_string(),
        }
    }
}

/// Pull the `detail` field out of a FastAPI-style error body
///
/// String details are returned as-is; structured details (validation error
/// lists) are returned as compact JSON.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
