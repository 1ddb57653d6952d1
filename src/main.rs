//! Crossover trading assistant CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use trading_config::load_config;
use trading_monitor::setup_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    // Command-line flags win over file and environment
    if let Some(level) = cli.log_level {
        config.logging.level = level.as_str().to_string();
    }
    if cli.json_logs {
        config.logging.format = "json".to_string();
    }
    match &cli.command {
        Commands::Run(args) => args.apply(&mut config)?,
        Commands::Account(args) => args.apply(&mut config),
        Commands::ValidateConfig => {}
    }

    // Setup logging
    let _log_guard = setup_logging(
        &config.logging.level,
        config.logging.is_json(),
        config.logging.file.as_deref(),
    );

    // Execute command
    match cli.command {
        Commands::Run(args) => {
            config.validate()?;
            cli::commands::run::run(args, &config).await
        }
        Commands::Account(_) => cli::commands::account::run(&config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&config).await,
    }
}
