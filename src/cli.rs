//! Command-line interface definition for Parley
//!
//! This module defines the CLI structure using clap's derive API,
//! providing an interactive chat mode and one-shot backend commands.

use clap::{Parser, Subcommand};

/// Parley - terminal client for a caching chatbot backend
///
/// Chat interactively, or run single commands against the backend's
/// history and statistics endpoints.
#[derive(Parser, Debug, Clone)]
#[command(name = "parley")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Backend base URL (overrides config and PARLEY_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Model hint sent with chat messages
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Parley
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat,

    /// Send a single message and print the reply
    Send {
        /// Message text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Show stored chat history
    History {
        /// Number of exchanges to fetch
        #[arg(short, long)]
        limit: Option<u32>,

        /// Show a compact table instead of the conversation
        #[arg(long, conflicts_with = "json")]
        table: bool,

        /// Print the conversation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show history statistics
    Stats {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Check backend health
    Health {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete all stored history on the backend
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_chat_command() {
        let cli = Cli::try_parse_from(["parley", "chat"]).unwrap();
        assert!(matches!(cli.command, Commands::Chat));
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parse_send_joins_words() {
        let cli = Cli::try_parse_from(["parley", "send", "hello", "there"]).unwrap();
        if let Commands::Send { message } = cli.command {
            assert_eq!(message.join(" "), "hello there");
        } else {
            panic!("Expected Send command");
        }
    }

    #[test]
    fn test_cli_send_requires_message() {
        assert!(Cli::try_parse_from(["parley", "send"]).is_err());
    }

    #[test]
    fn test_cli_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "parley",
            "send",
            "hi",
            "--model",
            "gemini-2.5-pro",
            "--api-url",
            "http://localhost:9000",
        ])
        .unwrap();
        assert_eq!(cli.model.as_deref(), Some("gemini-2.5-pro"));
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:9000"));
    }

    #[test]
    fn test_cli_parse_history_options() {
        let cli = Cli::try_parse_from(["parley", "history", "--limit", "5", "--json"]).unwrap();
        if let Commands::History { limit, table, json } = cli.command {
            assert_eq!(limit, Some(5));
            assert!(!table);
            assert!(json);
        } else {
            panic!("Expected History command");
        }
    }

    #[test]
    fn test_cli_history_table_conflicts_with_json() {
        assert!(Cli::try_parse_from(["parley", "history", "--table", "--json"]).is_err());
    }

    #[test]
    fn test_cli_parse_clear_yes() {
        let cli = Cli::try_parse_from(["parley", "clear", "-y"]).unwrap();
        assert!(matches!(cli.command, Commands::Clear { yes: true }));
    }

    #[test]
    fn test_cli_parse_stats_and_health() {
        let cli = Cli::try_parse_from(["parley", "stats", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Stats { json: true }));
        let cli = Cli::try_parse_from(["parley", "health"]).unwrap();
        assert!(matches!(cli.command, Commands::Health { json: false }));
    }
}
