//! Parley - terminal chat client
//!
#![doc = "Main entry point for the Parley chat client."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use parley::cli::{Cli, Commands};
use parley::commands;
use parley::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat => {
            tracing::info!("Starting interactive chat mode");
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Send { message } => {
            tracing::info!("Sending single message");
            commands::send::run_send(config, &message.join(" ")).await?;
            Ok(())
        }
        Commands::History { limit, table, json } => {
            tracing::info!("Starting history command");
            commands::history::show_history(&config, limit, table, json).await?;
            Ok(())
        }
        Commands::Stats { json } => {
            commands::status::show_stats(&config, json).await?;
            Ok(())
        }
        Commands::Health { json } => {
            commands::status::show_health(&config, json).await?;
            Ok(())
        }
        Commands::Clear { yes } => {
            tracing::info!("Starting clear history command");
            commands::history::clear_history(&config, yes).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they never mix with chat output on stdout.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "parley=debug" } else { "parley=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
