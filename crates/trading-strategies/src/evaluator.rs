//! Signal evaluation against a live market-data source.

use tracing::debug;
use trading_core::error::DataError;
use trading_core::traits::MarketData;
use trading_core::types::Lookback;

use crate::ma_crossover::MACrossover;

/// Fetches six months of daily closes and checks for a bullish crossover
/// on the newest bar.
#[derive(Debug, Clone, Default)]
pub struct SignalEvaluator {
    crossover: MACrossover,
}

impl SignalEvaluator {
    pub fn new(crossover: MACrossover) -> Self {
        Self { crossover }
    }

    pub fn crossover(&self) -> &MACrossover {
        &self.crossover
    }

    /// Whether `symbol` shows a fresh bullish crossover.
    ///
    /// An empty or too-short history is not an error: it simply does not
    /// fire. Fetch failures are returned to the caller.
    pub async fn should_buy<D>(&self, data: &D, symbol: &str) -> Result<bool, DataError>
    where
        D: MarketData + ?Sized,
    {
        let series = data.daily_history(symbol, Lookback::SIGNAL).await?;
        if series.is_empty() {
            debug!(symbol, source = data.name(), "no history returned");
            return Ok(false);
        }

        let closes = series.closes();
        match self.crossover.reading(&closes) {
            Some(reading) => {
                debug!(
                    symbol,
                    bars = closes.len(),
                    fast = reading.fast,
                    slow = reading.slow,
                    prev_fast = reading.prev_fast,
                    prev_slow = reading.prev_slow,
                    "crossover reading"
                );
                Ok(reading.is_bullish())
            }
            None => {
                debug!(
                    symbol,
                    bars = closes.len(),
                    required = self.crossover.warmup_period(),
                    "not enough closes for both averages"
                );
                Ok(false)
            }
        }
    }
}
