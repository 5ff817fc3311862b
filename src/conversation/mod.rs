//! Conversation module for Parley
//!
//! This module contains the message log types and the controller that
//! keeps the log in sync with the chat backend.

pub mod controller;
pub mod message;

pub use controller::{ConversationController, SendOutcome, DEFAULT_HISTORY_LIMIT};
pub use message::{Message, MessageIdGenerator, Role, ERROR_PREFIX};
