//! CLI command implementations.

pub mod account;
pub mod run;
pub mod validate;

use anyhow::{Context, Result};
use trading_broker::{AlpacaBroker, AlpacaConfig};
use trading_config::{AppConfig, Credentials, DataSourceKind};
use trading_core::traits::MarketData;
use trading_data::{AlpacaDataSource, CsvDataSource, YahooDataSource};

/// Build the Alpaca client for the configured mode.
pub(crate) fn build_broker(config: &AppConfig, credentials: &Credentials) -> Result<AlpacaBroker> {
    let alpaca = AlpacaConfig::new(
        credentials.api_key.clone(),
        credentials.api_secret.clone(),
        config.alpaca.mode,
    );
    AlpacaBroker::new(alpaca).context("Failed to create Alpaca client")
}

/// Build the configured daily-history source.
pub(crate) fn build_data_source(
    config: &AppConfig,
    credentials: &Credentials,
) -> Result<Box<dyn MarketData>> {
    let source: Box<dyn MarketData> = match config.data.source {
        DataSourceKind::Yahoo => Box::new(YahooDataSource::new()?),
        DataSourceKind::Alpaca => Box::new(AlpacaDataSource::new(
            &credentials.api_key,
            &credentials.api_secret,
        )?),
        DataSourceKind::Csv => {
            let dir = config
                .data
                .csv_dir
                .as_ref()
                .context("data.csv_dir is required for the csv data source")?;
            Box::new(CsvDataSource::new(dir).with_context(|| {
                format!("Data directory '{}' is not usable", dir.display())
            })?)
        }
    };
    Ok(source)
}
