//! CLI definitions.

pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use trading_broker::TradingMode;
use trading_config::{AppConfig, DataSourceKind};
use trading_risk::RiskLevel;

#[derive(Parser)]
#[command(name = "crossover-bot")]
#[command(author, version, about = "Moving-average crossover trading assistant for Alpaca")]
pub struct Cli {
    /// Configuration file path (defaults to config/default.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level, overriding the configuration
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate every symbol once and place bracket buys on fresh crossovers
    Run(RunArgs),
    /// Show account balances and open positions
    Account(AccountArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Paper,
    Live,
}

impl From<ModeArg> for TradingMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Paper => TradingMode::Paper,
            ModeArg::Live => TradingMode::Live,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DataSourceArg {
    Yahoo,
    Alpaca,
    Csv,
}

impl From<DataSourceArg> for DataSourceKind {
    fn from(source: DataSourceArg) -> Self {
        match source {
            DataSourceArg::Yahoo => DataSourceKind::Yahoo,
            DataSourceArg::Alpaca => DataSourceKind::Alpaca,
            DataSourceArg::Csv => DataSourceKind::Csv,
        }
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Trading environment
    #[arg(short, long)]
    pub mode: Option<ModeArg>,

    /// Risk level between 0.0 and 1.0
    #[arg(short, long)]
    pub risk: Option<f64>,

    /// Symbols to evaluate (comma-separated)
    #[arg(short = 'S', long)]
    pub symbols: Option<String>,

    /// Where daily history comes from
    #[arg(long)]
    pub data_source: Option<DataSourceArg>,

    /// Directory of {SYMBOL}.csv files, for the csv data source
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Evaluate and size, but never submit orders
    #[arg(long)]
    pub dry_run: bool,

    /// Output format (text, json)
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

impl RunArgs {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) -> Result<()> {
        if let Some(mode) = self.mode {
            config.alpaca.mode = mode.into();
        }
        if let Some(risk) = self.risk {
            config.trading.risk_level = RiskLevel::try_from(risk)?;
        }
        if let Some(symbols) = &self.symbols {
            config.trading.symbols = symbols.clone();
        }
        if let Some(source) = self.data_source {
            config.data.source = source.into();
        }
        if let Some(dir) = &self.data_dir {
            config.data.csv_dir = Some(dir.clone());
        }
        Ok(())
    }
}

#[derive(clap::Args)]
pub struct AccountArgs {
    /// Trading environment
    #[arg(short, long)]
    pub mode: Option<ModeArg>,
}

impl AccountArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(mode) = self.mode {
            config.alpaca.mode = mode.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_overrides() {
        let cli = Cli::parse_from([
            "crossover-bot",
            "run",
            "--mode",
            "live",
            "--risk",
            "0.5",
            "--symbols",
            "tsla,nvda",
            "--data-source",
            "csv",
            "--data-dir",
            "history",
            "--dry-run",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };

        let mut config = AppConfig::default();
        args.apply(&mut config).unwrap();

        assert!(args.dry_run);
        assert_eq!(config.alpaca.mode, TradingMode::Live);
        assert_eq!(config.trading.risk_level.value(), dec!(0.5));
        assert_eq!(config.trading.symbol_list(), vec!["TSLA", "NVDA"]);
        assert_eq!(config.data.source, DataSourceKind::Csv);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_risk_out_of_range() {
        let cli = Cli::parse_from(["crossover-bot", "run", "--risk", "1.2"]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };

        assert!(args.apply(&mut AppConfig::default()).is_err());
    }

    #[test]
    fn test_defaults_leave_config_alone() {
        let cli = Cli::parse_from(["crossover-bot", "run"]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };

        let mut config = AppConfig::default();
        args.apply(&mut config).unwrap();

        assert!(!args.dry_run);
        assert!(args.output == OutputFormat::Text);
        assert_eq!(config.trading.symbols, "AAPL,MSFT");
        assert_eq!(config.alpaca.mode, TradingMode::Paper);
    }
}
