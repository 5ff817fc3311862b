//! Special commands parser for interactive chat mode
//!
//! This module parses the special commands that can be entered during an
//! interactive chat session. Special commands allow users to:
//! - Load stored history from the backend
//! - Clear the local conversation or the backend history
//! - View backend statistics and health
//! - Change the model hint sent with messages
//! - Exit the session
//!
//! Commands are prefixed with `/` and are case-insensitive; arguments keep
//! their case.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },
}

/// Special commands that can be executed during interactive chat
///
/// These commands act on the conversation or query the backend, rather
/// than being sent as a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Replace the conversation with stored history
    ///
    /// Without an argument the configured history limit is used.
    LoadHistory(Option<u32>),

    /// Empty the local conversation without touching the backend
    ClearChat,

    /// Delete all history on the backend, then empty the conversation
    ///
    /// Asks for confirmation before anything is deleted.
    ResetHistory,

    /// Show backend statistics
    Stats,

    /// Check backend health
    Health,

    /// Show the model hint currently sent with messages
    ShowModel,

    /// Change the model hint sent with messages
    SwitchModel(String),

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent as a regular chat message.
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns CommandError::UnknownCommand if input starts with "/" but is not a valid command.
/// Returns CommandError::UnsupportedArgument if a command receives an invalid argument.
///
/// # Examples
///
/// ```
/// use parley::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/history 5").unwrap();
/// assert_eq!(cmd, SpecialCommand::LoadHistory(Some(5)));
///
/// let cmd = parse_special_command("/model gemini-2.5-pro").unwrap();
/// assert_eq!(cmd, SpecialCommand::SwitchModel("gemini-2.5-pro".to_string()));
///
/// let cmd = parse_special_command("hello there").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    // Anything not starting with "/" is a chat message (except exit/quit)
    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let (command, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command.to_lowercase(), rest.trim()),
        None => (lower.clone(), ""),
    };
    let command = command.as_str();

    match command {
        "/history" => {
            if arg.is_empty() {
                return Ok(SpecialCommand::LoadHistory(None));
            }
            match arg.parse::<u32>() {
                Ok(limit) if limit > 0 => Ok(SpecialCommand::LoadHistory(Some(limit))),
                _ => Err(CommandError::UnsupportedArgument {
                    command: "/history".to_string(),
                    arg: arg.to_string(),
                }),
            }
        }

        "/clear" => no_argument(SpecialCommand::ClearChat, command, arg),
        "/reset" => no_argument(SpecialCommand::ResetHistory, command, arg),
        "/stats" => no_argument(SpecialCommand::Stats, command, arg),
        "/health" => no_argument(SpecialCommand::Health, command, arg),

        "/model" if arg.is_empty() => Ok(SpecialCommand::ShowModel),
        "/model" => Ok(SpecialCommand::SwitchModel(arg.to_string())),

        "/help" | "/?" => Ok(SpecialCommand::Help),

        "exit" | "quit" | "/exit" | "/quit" => Ok(SpecialCommand::Exit),

        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

fn no_argument(
    parsed: SpecialCommand,
    command: &str,
    arg: &str,
) -> Result<SpecialCommand, CommandError> {
    if arg.is_empty() {
        Ok(parsed)
    } else {
        Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: arg.to_string(),
        })
    }
}

/// Display help text for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat Mode
===========================================

CONVERSATION:
  /history [n]    - Replace the conversation with the last n stored exchanges
  /clear          - Clear the conversation on screen (backend history is kept)
  /reset          - Delete all backend history (asks for confirmation)

BACKEND:
  /stats          - Show history statistics
  /health         - Check backend and database status

MODEL:
  /model          - Show the model sent with messages
  /model <name>   - Send messages with a different model

SESSION CONTROL:
  /help           - Show this help message
  /?              - Same as /help
  exit            - Exit interactive mode
  quit            - Same as exit

NOTES:
  - Commands are case-insensitive
  - Regular text (not starting with /) is sent to the chatbot
"#
    );
}
