//! Plain-text rendering for the terminal client
//!
//! Formatting is split from printing so the text can be checked in tests.
//! Color is applied with `colored`, which honors `NO_COLOR` and a non-tty
//! stdout on its own.

use crate::backend::{DatabaseStats, HealthCheck, HistoryEntry};
use crate::conversation::{Message, Role};
use chrono::Local;
use colored::Colorize;
use prettytable::{format, row, Table};

/// Widest prompt/response preview in the history table
const PREVIEW_CHARS: usize = 48;

/// Metadata line shown under a message: tokens, cache flag, model
///
/// # Examples
///
/// ```
/// use parley::commands::render::message_metadata;
/// use parley::conversation::Message;
///
/// let msg = Message::user("1", "hi");
/// assert_eq!(message_metadata(&msg), "");
/// ```
pub fn message_metadata(message: &Message) -> String {
    let mut parts = Vec::new();
    if let Some(tokens) = message.tokens.filter(|t| *t > 0) {
        parts.push(format!("{} tokens", tokens));
    }
    if message.was_cached == Some(true) {
        parts.push("cached".to_string());
    }
    if let Some(model) = message.model_name.as_deref().filter(|m| !m.is_empty()) {
        parts.push(model.to_string());
    }
    parts.join(" • ")
}

/// Header line of a message: role label and local time
pub fn message_header(message: &Message) -> String {
    let time = message
        .timestamp
        .with_timezone(&Local)
        .format("%H:%M:%S")
        .to_string();
    let label = match message.role {
        Role::User => "You".cyan().bold(),
        Role::Assistant if message.is_error() => "Assistant".red().bold(),
        Role::Assistant => "Assistant".green().bold(),
    };
    format!("{} {}", label, time.dimmed())
}

/// Print one message with its header and metadata
pub fn print_message(message: &Message) {
    println!("{}", message_header(message));
    if message.is_error() {
        println!("{}", message.content.red());
    } else {
        println!("{}", message.content);
    }
    let metadata = message_metadata(message);
    if !metadata.is_empty() {
        println!("{}", metadata.dimmed());
    }
    println!();
}

/// Print a sequence of messages in order
pub fn print_messages(messages: &[Message]) {
    for message in messages {
        print_message(message);
    }
}

/// Print the error banner
pub fn print_error_banner(error: &str) {
    eprintln!("{} {}", "error:".red().bold(), error);
}

/// Cache hit rate formatted as a percentage with one decimal
///
/// # Examples
///
/// ```
/// use parley::commands::render::format_hit_rate;
///
/// assert_eq!(format_hit_rate(0.256), "25.6%");
/// ```
pub fn format_hit_rate(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Lines of the statistics panel
pub fn stats_lines(stats: &DatabaseStats) -> Vec<String> {
    let mut lines = vec![
        format!("Total conversations: {}", stats.total_entries),
        format!("Tokens used:         {}", stats.total_tokens_used),
        format!("Cache hit rate:      {}", format_hit_rate(stats.cache_hit_rate)),
        format!("Cached responses:    {}", stats.cached_entries),
    ];
    if let Some(latest) = &stats.latest_timestamp {
        lines.push(format!("Latest activity:     {}", latest));
    }
    lines
}

/// Print the statistics panel
pub fn print_stats(stats: &DatabaseStats) {
    println!("{}", "Statistics".bold());
    for line in stats_lines(stats) {
        println!("  {}", line);
    }
    println!();
}

/// Print a health check summary
pub fn print_health(health: &HealthCheck) {
    let status = if health.status.eq_ignore_ascii_case("healthy") {
        health.status.green()
    } else {
        health.status.yellow()
    };
    println!("{} {}", "Backend:".bold(), status);
    println!("  Database:       {}", health.database);
    println!("  Entries:        {}", health.total_entries);
    println!(
        "  API configured: {}",
        if health.api_configured { "yes" } else { "no" }
    );
    println!("  Checked at:     {}", health.timestamp);
    println!();
}

/// Shorten text to at most `max` characters on one line
pub fn preview(text: &str, max: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > max {
        let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}

/// Build the history table, newest entry first as the backend returns them
pub fn history_table(entries: &[HistoryEntry]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.set_titles(row!["ID", "When", "Prompt", "Response", "Tokens", "Cached", "Model"]);

    for entry in entries {
        table.add_row(row![
            entry.id,
            entry
                .timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M"),
            preview(&entry.prompt, PREVIEW_CHARS),
            preview(&entry.response, PREVIEW_CHARS),
            entry.tokens_used,
            if entry.was_cached { "yes" } else { "" },
            entry.model_name.as_deref().unwrap_or("-"),
        ]);
    }

    table
}

/// Print the history table
pub fn print_history_table(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("{}", "No chat history found.".yellow());
        return;
    }
    println!("\nChat History:");
    history_table(entries).printstd();
    println!();
}
