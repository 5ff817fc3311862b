//! Conversation log entries
//!
//! A [`Message`] is one rendered chat turn. Live exchanges produce them one at
//! a time; stored history entries expand into a user/assistant pair.

use crate::backend::{ChatResponse, HistoryEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker placed in front of the error text of a synthetic assistant message
pub const ERROR_PREFIX: &str = "❌ Error: ";

/// Author of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed by the user
    User,
    /// Produced by the backend, or a synthetic error report
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry of the conversation log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique within the log
    pub id: String,
    /// Author of the turn
    pub role: Role,
    /// Text of the turn
    pub content: String,
    /// When the turn was created (or stored, for history)
    pub timestamp: DateTime<Utc>,
    /// Tokens consumed, assistant replies only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u64>,
    /// Whether the reply came from the backend cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub was_cached: Option<bool>,
    /// Model that produced the reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

impl Message {
    /// Creates a user message stamped with the current time
    ///
    /// # Examples
    ///
    /// ```
    /// use parley::conversation::{Message, Role};
    ///
    /// let msg = Message::user("1", "Hello");
    /// assert_eq!(msg.role, Role::User);
    /// assert!(msg.tokens.is_none());
    /// ```
    pub fn user(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            tokens: None,
            was_cached: None,
            model_name: None,
        }
    }

    /// Creates an assistant message from a backend reply
    pub fn assistant_reply(id: impl Into<String>, response: &ChatResponse) -> Self {
        Self {
            id: id.into(),
            role: Role::Assistant,
            content: response.response.clone(),
            timestamp: Utc::now(),
            tokens: Some(response.tokens_used),
            was_cached: Some(response.was_cached),
            model_name: Some(response.model_name.clone()),
        }
    }

    /// Creates the synthetic assistant message reporting a failed send
    ///
    /// # Examples
    ///
    /// ```
    /// use parley::conversation::Message;
    ///
    /// let msg = Message::error_reply("2", "Server error. Please try again later.");
    /// assert_eq!(msg.content, "❌ Error: Server error. Please try again later.");
    /// assert!(msg.is_error());
    /// ```
    pub fn error_reply(id: impl Into<String>, error: &str) -> Self {
        Self {
            id: id.into(),
            role: Role::Assistant,
            content: format!("{}{}", ERROR_PREFIX, error),
            timestamp: Utc::now(),
            tokens: None,
            was_cached: None,
            model_name: None,
        }
    }

    /// Expands a stored exchange into its user and assistant messages
    ///
    /// Both messages carry the entry's timestamp and ids derived from the
    /// entry id (`"<id>-user"`, `"<id>-assistant"`).
    pub fn from_history_entry(entry: &HistoryEntry) -> [Message; 2] {
        [
            Message {
                id: format!("{}-user", entry.id),
                role: Role::User,
                content: entry.prompt.clone(),
                timestamp: entry.timestamp,
                tokens: None,
                was_cached: None,
                model_name: None,
            },
            Message {
                id: format!("{}-assistant", entry.id),
                role: Role::Assistant,
                content: entry.response.clone(),
                timestamp: entry.timestamp,
                tokens: Some(entry.tokens_used),
                was_cached: Some(entry.was_cached),
                model_name: entry.model_name.clone(),
            },
        ]
    }

    /// True for synthetic error replies
    pub fn is_error(&self) -> bool {
        self.role == Role::Assistant && self.content.starts_with(ERROR_PREFIX)
    }
}

/// Produces ids for live messages
///
/// Ids are millisecond timestamps, bumped by one whenever the clock has not
/// advanced past the previous id, so they are unique per generator and
/// increase with insertion order.
#[derive(Debug, Default)]
pub struct MessageIdGenerator {
    last: i64,
}

impl MessageIdGenerator {
    /// Creates a generator that has issued no ids yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next id
    ///
    /// # Examples
    ///
    /// ```
    /// use parley::conversation::MessageIdGenerator;
    ///
    /// let mut ids = MessageIdGenerator::new();
    /// let first: i64 = ids.next_id().parse().unwrap();
    /// let second: i64 = ids.next_id().parse().unwrap();
    /// assert!(second > first);
    /// ```
    pub fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        self.last = if now > self.last { now } else { self.last + 1 };
        self.last.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn entry(id: i64) -> HistoryEntry {
        HistoryEntry {
            id,
            prompt: format!("prompt {}", id),
            response: format!("response {}", id),
            tokens_used: 40,
            timestamp: Utc::now(),
            model_name: Some("gemini-2.5-flash".to_string()),
            was_cached: true,
        }
    }

    #[test]
    fn test_assistant_reply_copies_metadata() {
        let response = ChatResponse {
            response: "Hi!".to_string(),
            tokens_used: 17,
            was_cached: false,
            model_name: "gemini-2.5-pro".to_string(),
        };
        let msg = Message::assistant_reply("9", &response);
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, "Hi!");
        assert_eq!(msg.tokens, Some(17));
        assert_eq!(msg.was_cached, Some(false));
        assert_eq!(msg.model_name.as_deref(), Some("gemini-2.5-pro"));
        assert!(!msg.is_error());
    }

    #[test]
    fn test_from_history_entry_pair() {
        let source = entry(42);
        let [user, assistant] = Message::from_history_entry(&source);

        assert_eq!(user.id, "42-user");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "prompt 42");
        assert!(user.tokens.is_none());
        assert_eq!(user.timestamp, source.timestamp);

        assert_eq!(assistant.id, "42-assistant");
        assert_eq!(assistant.role, Role::Assistant);
        assert_eq!(assistant.content, "response 42");
        assert_eq!(assistant.tokens, Some(40));
        assert_eq!(assistant.was_cached, Some(true));
        assert_eq!(assistant.timestamp, source.timestamp);
    }

    #[test]
    fn test_user_message_is_not_error() {
        let msg = Message::user("1", "❌ Error: typed by hand");
        assert!(!msg.is_error());
    }

    #[test]
    fn test_id_generator_unique_under_rapid_calls() {
        let mut ids = MessageIdGenerator::new();
        let issued: Vec<String> = (0..1000).map(|_| ids.next_id()).collect();
        let unique: HashSet<&String> = issued.iter().collect();
        assert_eq!(unique.len(), issued.len());

        let numeric: Vec<i64> = issued.iter().map(|id| id.parse().unwrap()).collect();
        assert!(numeric.windows(2).all(|pair| pair[1] > pair[0]));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }
}
