mod cli;
mod commands;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use folio_config::Config;
use folio_storage::Storage;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = cli.data_dir.clone() {
        config.storage.data_dir = Some(dir);
    }
    tracing::debug!("Using config {}", config_path.display());

    // Commands that never touch the database
    match cli.command {
        cli::Commands::Config => return commands::config::show(&config, &config_path),
        cli::Commands::Completions { shell } => {
            commands::config::completions(shell);
            return Ok(());
        }
        _ => {}
    }

    // Initialize storage once (creates connection pool and runs migrations)
    let storage = Arc::new(Storage::new(Some(config.database_path())).await?);

    match cli.command {
        cli::Commands::Serve {
            host,
            port,
            read_only,
        } => commands::serve::handle(storage, &config, host, port, read_only).await,
        cli::Commands::Content(cmd) => commands::content::handle(cmd, storage).await,
        cli::Commands::Projects { category } => {
            commands::content::projects(storage, category).await
        }
        cli::Commands::Upload { content_type, file } => {
            commands::upload::handle(&config, &content_type, &file).await
        }
        cli::Commands::Admin(cmd) => commands::admin::handle(cmd, &storage).await,
        cli::Commands::Config | cli::Commands::Completions { .. } => Ok(()),
    }
}
