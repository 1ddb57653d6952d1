//! Market-data source trait definition.

use crate::error::DataError;
use crate::types::{BarSeries, Lookback};
use async_trait::async_trait;

/// Trait for daily price-history providers.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch daily bars covering `lookback`, ordered from oldest to newest.
    ///
    /// An unknown symbol or a window without trading yields an empty series,
    /// not an error.
    async fn daily_history(&self, symbol: &str, lookback: Lookback)
        -> Result<BarSeries, DataError>;

    /// Latest daily close, or None when the provider has nothing for today.
    async fn latest_close(&self, symbol: &str) -> Result<Option<f64>, DataError> {
        let series = self.daily_history(symbol, Lookback::LATEST).await?;
        Ok(series.last_close())
    }

    /// Get the data source name.
    fn name(&self) -> &str;
}
