//! Backend statistics and health commands

use crate::backend::create_backend;
use crate::commands::render;
use crate::config::Config;
use crate::error::{describe_error, ParleyError, Result};

/// Print history statistics
///
/// # Errors
///
/// Returns error with the user-facing message if the backend call fails
pub async fn show_stats(config: &Config, json: bool) -> Result<()> {
    let backend = create_backend(&config.backend)?;
    let stats = backend
        .get_stats()
        .await
        .map_err(|e| ParleyError::Backend(describe_error(&e)))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        render::print_stats(&stats);
    }
    Ok(())
}

/// Print backend health
///
/// # Errors
///
/// Returns error with the user-facing message if the backend is unreachable
/// or reports a failure status code
pub async fn show_health(config: &Config, json: bool) -> Result<()> {
    let backend = create_backend(&config.backend)?;
    let health = backend
        .health_check()
        .await
        .map_err(|e| ParleyError::Backend(describe_error(&e)))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&health)?);
    } else {
        render::print_health(&health);
    }
    Ok(())
}
