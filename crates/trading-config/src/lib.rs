//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `CROSSOVER__<SECTION>__<KEY>` environment variables. Command-line flags are
//! applied on top by the binary.

mod settings;

pub use settings::{
    parse_symbols, AlpacaSettings, AppConfig, AppSettings, Credentials, DataSettings,
    DataSourceKind, LoggingConfig, TradingSettings,
};

use config::{Config, Environment, File};
use std::path::Path;
use thiserror::Error;

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

const ENV_PREFIX: &str = "CROSSOVER";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("credential environment variable {0} is not set")]
    MissingCredential(String),
}

/// Load configuration from file and environment.
///
/// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_PATH`] is
/// used if present and the built-in defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, SettingsError> {
    load_layers(path, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

fn load_layers(path: Option<&Path>, env: Environment) -> Result<AppConfig, SettingsError> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false),
    };

    let config = Config::builder().add_source(file).add_source(env).build()?;

    Ok(config.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::fs;
    use trading_broker::TradingMode;

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.toml");
        fs::write(
            &path,
            r#"
[alpaca]
api_key_env = "MY_KEY"
api_secret_env = "MY_SECRET"
mode = "live"

[trading]
symbols = "nvda, amd"
risk_level = 0.7
fast_period = 5
slow_period = 20
stop_loss_pct = 2.5

[data]
source = "csv"
csv_dir = "history"
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.alpaca.mode, TradingMode::Live);
        assert_eq!(config.alpaca.api_key_env, "MY_KEY");
        assert_eq!(config.trading.symbol_list(), vec!["NVDA", "AMD"]);
        assert_eq!(config.trading.risk_level.value(), dec!(0.7));
        assert_eq!(config.trading.fast_period, 5);
        assert_eq!(config.trading.stop_loss_pct, dec!(2.5));
        assert_eq!(config.data.source, DataSourceKind::Csv);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.toml");
        fs::write(&path, "[app]\nname = \"desk\"\nenvironment = \"test\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.app.name, "desk");
        assert_eq!(config.trading.symbols, "AAPL,MSFT");
        assert_eq!(config.alpaca.mode, TradingMode::Paper);
    }

    #[test]
    fn test_out_of_range_risk_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.toml");
        fs::write(
            &path,
            "[trading]\nsymbols = \"AAPL\"\nrisk_level = 1.5\nfast_period = 10\nslow_period = 50\nstop_loss_pct = 3\n",
        )
        .unwrap();

        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, SettingsError::Load(_)));
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.toml");
        fs::write(&path, "[logging]\nlevel = \"info\"\nformat = \"pretty\"\n").unwrap();

        let vars = config::Map::from([
            ("CROSSOVER__LOGGING__FORMAT".to_string(), "json".to_string()),
            ("CROSSOVER__TRADING__FAST_PERIOD".to_string(), "12".to_string()),
            ("UNRELATED__LOGGING__LEVEL".to_string(), "trace".to_string()),
        ]);
        let config = load_layers(Some(&path), environment().source(Some(vars))).unwrap();

        assert!(config.logging.is_json());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.trading.fast_period, 12);
    }
}
