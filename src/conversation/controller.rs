//! Conversation state and the operations that mutate it
//!
//! The controller owns the ordered message log together with a loading flag
//! and a single current error. Every operation takes `&self`, so one
//! controller can be shared with the view layer through an `Arc`. State is
//! guarded by a `RwLock` that is never held across an `.await`.
//!
//! Only [`ConversationController::send_message`] is guarded by the loading
//! flag. History loads and clears may interleave with an outstanding send;
//! mutations then apply in completion order.

use crate::backend::{Backend, ChatRequest};
use crate::conversation::message::{Message, MessageIdGenerator};
use crate::error::describe_error;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// History limit used when a caller passes zero
pub const DEFAULT_HISTORY_LIMIT: u32 = 20;

/// What a call to [`ConversationController::send_message`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, or a send was already in flight; nothing changed
    Ignored,
    /// The backend replied and the reply was appended
    Replied,
    /// The backend call failed; an error reply was appended and the error set
    Failed,
}

#[derive(Debug, Default)]
struct ConversationState {
    messages: Vec<Message>,
    loading: bool,
    error: Option<String>,
    ids: MessageIdGenerator,
}

/// Mediates between user intent and the chat backend
///
/// # Examples
///
/// ```no_run
/// use parley::backend::create_backend;
/// use parley::config::BackendConfig;
/// use parley::conversation::{ConversationController, SendOutcome};
///
/// # async fn example() -> parley::error::Result<()> {
/// let controller = ConversationController::new(create_backend(&BackendConfig::default())?);
/// if controller.send_message("Hello!", None).await == SendOutcome::Failed {
///     eprintln!("{}", controller.error().unwrap_or_default());
/// }
/// # Ok(())
/// # }
/// ```
pub struct ConversationController {
    backend: Arc<dyn Backend>,
    state: RwLock<ConversationState>,
}

impl ConversationController {
    /// Creates a controller with an empty log
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            state: RwLock::new(ConversationState::default()),
        }
    }

    /// The backend this controller talks to
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// Snapshot of the message log, in insertion order
    pub fn messages(&self) -> Vec<Message> {
        self.read_state().messages.clone()
    }

    /// Number of messages in the log
    pub fn len(&self) -> usize {
        self.read_state().messages.len()
    }

    /// True when the log has no messages
    pub fn is_empty(&self) -> bool {
        self.read_state().messages.is_empty()
    }

    /// Messages appended after the first `start` entries
    pub fn messages_since(&self, start: usize) -> Vec<Message> {
        let state = self.read_state();
        state.messages.get(start..).map(<[Message]>::to_vec).unwrap_or_default()
    }

    /// True while a send is awaiting the backend
    pub fn is_loading(&self) -> bool {
        self.read_state().loading
    }

    /// Current error banner text
    pub fn error(&self) -> Option<String> {
        self.read_state().error.clone()
    }

    /// Sets or dismisses the error banner
    pub fn set_error(&self, error: Option<String>) {
        self.write_state().error = error;
    }

    /// Sends one prompt and records the exchange
    ///
    /// The trimmed prompt is appended as a user message before the backend
    /// is called and is never retracted. On success the reply is appended;
    /// on failure the mapped error is stored as the current error and also
    /// appended as an assistant message prefixed with
    /// [`crate::conversation::ERROR_PREFIX`].
    ///
    /// Blank input, or a call made while another send is in flight, is a
    /// no-op that leaves log and error untouched.
    pub async fn send_message(&self, content: &str, model_hint: Option<&str>) -> SendOutcome {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            tracing::debug!("Ignoring blank chat message");
            return SendOutcome::Ignored;
        }

        {
            let mut state = self.write_state();
            if state.loading {
                tracing::debug!("Ignoring chat message while a send is in flight");
                return SendOutcome::Ignored;
            }
            let id = state.ids.next_id();
            state.messages.push(Message::user(id, trimmed));
            state.loading = true;
            state.error = None;
        }

        let request = ChatRequest::new(trimmed, model_hint.map(str::to_string));
        let result = self.backend.send_message(request).await;

        let mut state = self.write_state();
        let id = state.ids.next_id();
        let outcome = match result {
            Ok(response) => {
                state
                    .messages
                    .push(Message::assistant_reply(id, &response));
                SendOutcome::Replied
            }
            Err(e) => {
                let text = describe_error(&e);
                tracing::warn!("Chat message failed: {:#}", e);
                state.messages.push(Message::error_reply(id, &text));
                state.error = Some(text);
                SendOutcome::Failed
            }
        };
        state.loading = false;
        outcome
    }

    /// Replaces the log with the newest `limit` stored exchanges
    ///
    /// The backend returns entries newest first; they are reversed into
    /// chronological order and each expands into a user/assistant pair. On
    /// failure the log is left exactly as it was and the error is set.
    ///
    /// Returns true on success. A `limit` of zero falls back to
    /// [`DEFAULT_HISTORY_LIMIT`].
    pub async fn load_history(&self, limit: u32) -> bool {
        let limit = if limit == 0 {
            tracing::warn!(
                "History limit must be positive, using {}",
                DEFAULT_HISTORY_LIMIT
            );
            DEFAULT_HISTORY_LIMIT
        } else {
            limit
        };

        self.write_state().error = None;

        match self.backend.get_history(limit).await {
            Ok(mut entries) => {
                entries.reverse();
                let messages: Vec<Message> = entries
                    .iter()
                    .flat_map(Message::from_history_entry)
                    .collect();
                tracing::info!(
                    "Loaded {} history entries ({} messages)",
                    entries.len(),
                    messages.len()
                );
                self.write_state().messages = messages;
                true
            }
            Err(e) => {
                tracing::warn!("Loading history failed: {:#}", e);
                self.write_state().error = Some(describe_error(&e));
                false
            }
        }
    }

    /// Empties the local log and clears the error; the backend is not called
    pub fn clear_chat(&self) {
        let mut state = self.write_state();
        state.messages.clear();
        state.error = None;
        tracing::debug!("Cleared local conversation");
    }

    /// Deletes the backend history, then empties the local log
    ///
    /// The local log is only emptied once the backend confirms the delete;
    /// on failure it is left untouched and the error is set. Returns true on
    /// success.
    pub async fn clear_history(&self) -> bool {
        self.write_state().error = None;

        match self.backend.clear_history().await {
            Ok(response) => {
                tracing::info!("Backend history cleared: {}", response.message);
                self.write_state().messages.clear();
                true
            }
            Err(e) => {
                tracing::warn!("Clearing history failed: {:#}", e);
                self.write_state().error = Some(describe_error(&e));
                false
            }
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, ConversationState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, ConversationState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
