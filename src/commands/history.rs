use crate::commands::{build_controller, confirm, render};
use crate::config::Config;
use crate::error::{describe_error, ParleyError, Result};
use colored::Colorize;

/// Print stored history
///
/// By default the history is loaded through the controller and printed as
/// a conversation, oldest first. `table` prints the raw entries newest
/// first; `json` prints the conversation messages as JSON.
pub async fn show_history(
    config: &Config,
    limit: Option<u32>,
    table: bool,
    json: bool,
) -> Result<()> {
    let limit = limit.unwrap_or(config.chat.history_limit);
    let controller = build_controller(config)?;

    if table {
        let entries = controller
            .backend()
            .get_history(limit)
            .await
            .map_err(|e| ParleyError::Backend(describe_error(&e)))?;
        render::print_history_table(&entries);
        return Ok(());
    }

    if !controller.load_history(limit).await {
        return Err(ParleyError::Backend(controller.error().unwrap_or_default()).into());
    }

    let messages = controller.messages();
    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
    } else if messages.is_empty() {
        println!("{}", "No chat history found.".yellow());
    } else {
        render::print_messages(&messages);
    }

    Ok(())
}

/// Delete all stored history on the backend
///
/// Asks for confirmation unless `yes` is set.
pub async fn clear_history(config: &Config, yes: bool) -> Result<()> {
    if !yes {
        let mut editor = rustyline::DefaultEditor::new()?;
        if !confirm(&mut editor, "Delete all chat history on the backend?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let controller = build_controller(config)?;
    if controller.clear_history().await {
        println!("{}", "Backend history deleted.".green());
        Ok(())
    } else {
        Err(ParleyError::Backend(controller.error().unwrap_or_default()).into())
    }
}
