//! Configuration structures.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use trading_broker::TradingMode;
use trading_risk::RiskLevel;

use crate::SettingsError;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub alpaca: AlpacaSettings,
    #[serde(default)]
    pub trading: TradingSettings,
    #[serde(default)]
    pub data: DataSettings,
}

impl AppConfig {
    /// Check cross-field constraints the types alone cannot express.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let trading = &self.trading;

        if trading.fast_period == 0 {
            return Err(SettingsError::Invalid(
                "trading.fast_period must be greater than 0".into(),
            ));
        }
        if trading.fast_period >= trading.slow_period {
            return Err(SettingsError::Invalid(format!(
                "trading.fast_period ({}) must be less than trading.slow_period ({})",
                trading.fast_period, trading.slow_period
            )));
        }
        if trading.stop_loss_pct <= Decimal::ZERO || trading.stop_loss_pct >= dec!(100) {
            return Err(SettingsError::Invalid(format!(
                "trading.stop_loss_pct must be between 0 and 100, got {}",
                trading.stop_loss_pct
            )));
        }
        if trading.symbol_list().is_empty() {
            return Err(SettingsError::Invalid(
                "trading.symbols must name at least one symbol".into(),
            ));
        }
        if self.data.source == DataSourceKind::Csv && self.data.csv_dir.is_none() {
            return Err(SettingsError::Invalid(
                "data.csv_dir is required when data.source is csv".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(SettingsError::Invalid(format!(
                "logging.format must be pretty or json, got {}",
                self.logging.format
            )));
        }

        Ok(())
    }

    /// Render as TOML, the same shape the loader reads.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::Invalid(e.to_string()))
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "crossover-bot".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

/// Alpaca account settings. Holds the names of the environment variables
/// carrying the credentials, never the credentials themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlpacaSettings {
    pub api_key_env: String,
    pub api_secret_env: String,
    pub mode: TradingMode,
}

impl Default for AlpacaSettings {
    fn default() -> Self {
        Self {
            api_key_env: "ALPACA_API_KEY".to_string(),
            api_secret_env: "ALPACA_API_SECRET".to_string(),
            mode: TradingMode::Paper,
        }
    }
}

/// Signal, sizing and symbol settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingSettings {
    /// Comma-separated ticker list
    pub symbols: String,
    pub risk_level: RiskLevel,
    pub fast_period: usize,
    pub slow_period: usize,
    pub stop_loss_pct: Decimal,
}

impl Default for TradingSettings {
    fn default() -> Self {
        Self {
            symbols: "AAPL,MSFT".to_string(),
            risk_level: RiskLevel::default(),
            fast_period: 10,
            slow_period: 50,
            stop_loss_pct: dec!(3),
        }
    }
}

impl TradingSettings {
    pub fn symbol_list(&self) -> Vec<String> {
        parse_symbols(&self.symbols)
    }
}

/// Where daily history comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    #[default]
    Yahoo,
    Alpaca,
    Csv,
}

impl fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceKind::Yahoo => write!(f, "yahoo"),
            DataSourceKind::Alpaca => write!(f, "alpaca"),
            DataSourceKind::Csv => write!(f, "csv"),
        }
    }
}

/// Market-data settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DataSettings {
    pub source: DataSourceKind,
    pub csv_dir: Option<PathBuf>,
}

/// Split a comma-separated ticker list.
///
/// Entries are trimmed and uppercased; blanks are dropped and repeats keep
/// only their first occurrence.
pub fn parse_symbols(raw: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for symbol in raw.split(',').map(|s| s.trim().to_uppercase()) {
        if !symbol.is_empty() && !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    symbols
}

/// API key pair resolved from the environment.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read the variables named in `settings` from the process environment.
    pub fn from_env(settings: &AlpacaSettings) -> Result<Self, SettingsError> {
        Self::resolve(settings, |name| std::env::var(name).ok())
    }

    /// Resolve both secrets with `lookup`. Missing and blank values are
    /// treated the same.
    pub fn resolve<F>(settings: &AlpacaSettings, lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| SettingsError::MissingCredential(name.to_string()))
        };

        Ok(Self {
            api_key: read(&settings.api_key_env)?,
            api_secret: read(&settings.api_secret_env)?,
        })
    }
}
