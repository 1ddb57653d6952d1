//! Validate configuration command.

use anyhow::Result;
use trading_config::AppConfig;

pub async fn run(config: &AppConfig) -> Result<()> {
    match config.validate() {
        Ok(()) => {
            println!("Configuration is valid!");
            println!();
            println!("Symbols: {}", config.trading.symbol_list().join(", "));
            println!(
                "Credentials read from: {}, {}",
                config.alpaca.api_key_env, config.alpaca.api_secret_env
            );
            println!();
            println!("{}", config.to_toml()?);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
