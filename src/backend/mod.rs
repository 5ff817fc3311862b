//! Backend module for Parley
//!
//! This module contains the chat backend abstraction and its HTTP
//! implementation.

pub mod base;
pub mod http;

pub use base::{
    Backend, ChatRequest, ChatResponse, ClearHistoryResponse, DatabaseStats, HealthCheck,
    HistoryEntry,
};
pub use http::HttpBackend;

#[cfg(test)]
pub use base::MockBackend;

use crate::config::BackendConfig;
use crate::error::Result;
use std::sync::Arc;

/// Create a shared backend client from configuration
///
/// # Errors
///
/// Returns error if the HTTP client cannot be built
///
/// # Examples
///
/// ```
/// use parley::backend::create_backend;
/// use parley::config::BackendConfig;
///
/// let backend = create_backend(&BackendConfig::default());
/// assert!(backend.is_ok());
/// ```
pub fn create_backend(config: &BackendConfig) -> Result<Arc<dyn Backend>> {
    Ok(Arc::new(HttpBackend::new(config)?))
}
