/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `chat`    — Interactive chat session
- `send`    — Send one message and print the exchange
- `history` — Show or delete stored history
- `status`  — Backend statistics and health

Each handler builds a backend from configuration and goes through the
`ConversationController` for anything that touches the message log.
*/

use crate::backend::create_backend;
use crate::config::Config;
use crate::conversation::ConversationController;
use crate::error::Result;
use std::sync::Arc;

// Special commands parser for the interactive session
pub mod special_commands;

// Terminal output formatting
pub mod render;

// History listing and deletion
pub mod history;

// Backend statistics and health
pub mod status;

/// Build a controller talking to the configured backend
pub(crate) fn build_controller(config: &Config) -> Result<Arc<ConversationController>> {
    let backend = create_backend(&config.backend)?;
    Ok(Arc::new(ConversationController::new(backend)))
}

/// Ask a yes/no question on the terminal; anything but y/yes is a no
pub(crate) fn confirm(editor: &mut rustyline::DefaultEditor, question: &str) -> Result<bool> {
    match editor.readline(&format!("{} [y/N] ", question)) {
        Ok(answer) => Ok(matches!(
            answer.trim().to_lowercase().as_str(),
            "y" | "yes"
        )),
        Err(rustyline::error::ReadlineError::Interrupted)
        | Err(rustyline::error::ReadlineError::Eof) => Ok(false),
        Err(e) => Err(crate::error::ParleyError::Readline(e).into()),
    }
}

// Chat command handler
pub mod chat {
    //! Interactive chat session handler.
    //!
    //! Checks the backend, loads recent history, then runs a readline loop
    //! that sends plain input as chat messages and dispatches `/` commands.

    use super::*;
    use crate::backend::DatabaseStats;
    use crate::commands::render;
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use crate::conversation::SendOutcome;
    use crate::error::describe_error;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// State the interactive view keeps next to the controller
    ///
    /// Tracks backend connectivity, the latest statistics and the model
    /// hint, and refreshes statistics after each action the way the chat
    /// page did.
    pub struct ChatSession {
        controller: Arc<ConversationController>,
        history_limit: u32,
        startup_history_limit: u32,
        model: Option<String>,
        connected: Option<bool>,
        stats: Option<DatabaseStats>,
    }

    impl ChatSession {
        /// Creates a session over an existing controller
        pub fn new(controller: Arc<ConversationController>, config: &Config) -> Self {
            Self {
                controller,
                history_limit: config.chat.history_limit,
                startup_history_limit: config.chat.startup_history_limit,
                model: config.chat.default_model.clone(),
                connected: None,
                stats: None,
            }
        }

        /// The controller holding the message log
        pub fn controller(&self) -> &Arc<ConversationController> {
            &self.controller
        }

        /// `None` before [`ChatSession::initialize`], then the last known state
        pub fn connected(&self) -> Option<bool> {
            self.connected
        }

        /// Latest statistics, if any were fetched since the last reset
        pub fn stats(&self) -> Option<&DatabaseStats> {
            self.stats.as_ref()
        }

        /// Model hint sent with messages
        pub fn model(&self) -> Option<&str> {
            self.model.as_deref()
        }

        /// Changes the model hint sent with messages
        pub fn set_model(&mut self, model: impl Into<String>) {
            self.model = Some(model.into());
        }

        /// Checks health, loads recent history and fetches statistics
        ///
        /// A failed health check or statistics fetch marks the session as
        /// disconnected and sets the error banner. A failed history load
        /// only sets the banner. Returns the resulting connected state.
        pub async fn initialize(&mut self) -> bool {
            if let Err(e) = self.controller.backend().health_check().await {
                tracing::warn!("Backend health check failed: {:#}", e);
                self.connected = Some(false);
                self.controller.set_error(Some(describe_error(&e)));
                return false;
            }
            self.connected = Some(true);

            self.controller
                .load_history(self.startup_history_limit)
                .await;

            match self.controller.backend().get_stats().await {
                Ok(stats) => self.stats = Some(stats),
                Err(e) => {
                    tracing::warn!("Fetching stats failed: {:#}", e);
                    self.connected = Some(false);
                    self.controller.set_error(Some(describe_error(&e)));
                }
            }

            self.connected == Some(true)
        }

        /// Sends a message with the current model hint, then refreshes stats
        pub async fn submit(&mut self, input: &str) -> SendOutcome {
            let outcome = self
                .controller
                .send_message(input, self.model.as_deref())
                .await;
            if outcome != SendOutcome::Ignored {
                self.refresh_stats().await;
            }
            outcome
        }

        /// Loads history (configured limit when `None`), then refreshes stats
        pub async fn load_history(&mut self, limit: Option<u32>) -> bool {
            let loaded = self
                .controller
                .load_history(limit.unwrap_or(self.history_limit))
                .await;
            self.refresh_stats().await;
            loaded
        }

        /// Deletes backend history and drops the cached statistics
        pub async fn reset_history(&mut self) -> bool {
            let cleared = self.controller.clear_history().await;
            self.stats = None;
            cleared
        }

        /// Empties the local conversation
        pub fn clear_chat(&self) {
            self.controller.clear_chat();
        }

        /// Re-fetches statistics; a failure is logged and the old value kept
        pub async fn refresh_stats(&mut self) {
            match self.controller.backend().get_stats().await {
                Ok(stats) => self.stats = Some(stats),
                Err(e) => tracing::warn!("Failed to refresh stats: {:#}", e),
            }
        }
    }

    /// Start the interactive chat session
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    ///
    /// # Errors
    ///
    /// Returns error if the backend client or the line editor cannot be
    /// created. Backend failures during the session are shown in the error
    /// banner and do not end the loop.
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat session");

        let controller = build_controller(&config)?;
        let mut session = ChatSession::new(controller, &config);
        let mut rl = DefaultEditor::new()?;

        session.initialize().await;
        print_welcome_banner(&session, &config.backend.base_url);
        render::print_messages(&session.controller().messages());
        show_banner(&session);

        loop {
            match rl.readline(&format!("{} ", "you>".cyan().bold())) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(trimmed);

                    let command = match parse_special_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{}", e.to_string().yellow());
                            continue;
                        }
                    };

                    match command {
                        SpecialCommand::None => {
                            // The user message was printed by the line editor.
                            let start = session.controller().len();
                            session.submit(trimmed).await;
                            let appended = session.controller().messages_since(start);
                            render::print_messages(appended.get(1..).unwrap_or_default());
                        }
                        SpecialCommand::LoadHistory(limit) => {
                            if session.load_history(limit).await {
                                let messages = session.controller().messages();
                                if messages.is_empty() {
                                    println!("{}", "No chat history found.".yellow());
                                }
                                render::print_messages(&messages);
                            }
                        }
                        SpecialCommand::ClearChat => {
                            session.clear_chat();
                            println!("{}", "Conversation cleared.".green());
                        }
                        SpecialCommand::ResetHistory => {
                            if confirm(&mut rl, "Delete all chat history on the backend?")? {
                                if session.reset_history().await {
                                    println!("{}", "Backend history deleted.".green());
                                }
                            } else {
                                println!("Cancelled.");
                            }
                        }
                        SpecialCommand::Stats => {
                            session.refresh_stats().await;
                            match session.stats() {
                                Some(stats) => render::print_stats(stats),
                                None => println!("{}", "No statistics available.".yellow()),
                            }
                        }
                        SpecialCommand::Health => {
                            match session.controller().backend().health_check().await {
                                Ok(health) => render::print_health(&health),
                                Err(e) => render::print_error_banner(&describe_error(&e)),
                            }
                        }
                        SpecialCommand::ShowModel => {
                            println!("Model: {}", session.model().unwrap_or("backend default"));
                        }
                        SpecialCommand::SwitchModel(model) => {
                            println!("Switched model to {}", model.cyan());
                            session.set_model(model);
                        }
                        SpecialCommand::Help => print_help(),
                        SpecialCommand::Exit => break,
                    }

                    show_banner(&session);
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => {
                    tracing::error!("Readline error: {}", e);
                    return Err(e.into());
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn show_banner(session: &ChatSession) {
        if let Some(error) = session.controller().error() {
            render::print_error_banner(&error);
        }
    }

    fn print_welcome_banner(session: &ChatSession, base_url: &str) {
        println!("{}", "Parley chat".bold());
        let status = match session.connected() {
            Some(true) => "connected".green(),
            _ => "offline".red(),
        };
        println!("Backend {} ({})", base_url, status);
        println!(
            "Model: {}",
            session.model().unwrap_or("backend default").cyan()
        );
        if let Some(stats) = session.stats() {
            println!(
                "{} conversations stored, cache hit rate {}",
                stats.total_entries,
                render::format_hit_rate(stats.cache_hit_rate)
            );
        }
        println!("Type '/help' for commands, 'exit' to quit.\n");
    }
}

// Single message handler
pub mod send {
    //! Sends one message through the controller and prints the exchange.

    use super::*;
    use crate::commands::render;
    use crate::conversation::SendOutcome;
    use crate::error::ParleyError;

    /// Send `message` and print the user message and the reply
    ///
    /// # Errors
    ///
    /// Returns error if the backend client cannot be created, the message
    /// is blank, or the send failed (the error reply is printed first).
    pub async fn run_send(config: Config, message: &str) -> Result<()> {
        let controller = build_controller(&config)?;
        let outcome = controller
            .send_message(message, config.chat.default_model.as_deref())
            .await;

        render::print_messages(&controller.messages());

        match outcome {
            SendOutcome::Replied => Ok(()),
            SendOutcome::Ignored => {
                Err(ParleyError::Config("Message must not be empty".to_string()).into())
            }
            SendOutcome::Failed => Err(ParleyError::Backend(
                controller.error().unwrap_or_default(),
            )
            .into()),
        }
    }
}
