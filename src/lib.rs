//! Parley - terminal chat client library
//!
//! This library provides the pieces of the Parley chat client: a typed
//! client for the chatbot backend's HTTP API, a conversation controller
//! that keeps the message log in sync with it, and the terminal commands
//! built on top.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `backend`: Backend trait, wire types and the HTTP implementation
//! - `conversation`: Message log types and the conversation controller
//! - `commands`: Terminal command handlers and rendering
//! - `config`: Configuration management and validation
//! - `error`: Error types, result alias and user-facing error messages
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use parley::backend::create_backend;
//! use parley::{Config, ConversationController};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let controller = ConversationController::new(create_backend(&config.backend)?);
//!     controller.load_history(config.chat.history_limit).await;
//!     controller.send_message("Hello!", config.chat.default_model.as_deref()).await;
//!     for message in controller.messages() {
//!         println!("{}: {}", message.role, message.content);
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod error;

// Re-export commonly used types
pub use backend::{Backend, HttpBackend};
pub use config::Config;
pub use conversation::{ConversationController, Message, Role, SendOutcome};
pub use error::{describe_error, ApiError, ParleyError, Result};
