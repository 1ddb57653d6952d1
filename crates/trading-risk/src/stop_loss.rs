//! Stop-loss placement for bracket entries.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use trading_core::error::TradingError;
use tracing::trace;

/// Places the protective stop a fixed percentage below the entry price.
#[derive(Debug, Clone)]
pub struct StopLossManager {
    percent: Decimal,
}

impl Default for StopLossManager {
    fn default() -> Self {
        Self { percent: dec!(3) }
    }
}

impl StopLossManager {
    /// Create a manager with a stop `percent` below entry, in `(0, 100)`.
    pub fn new(percent: Decimal) -> Result<Self, TradingError> {
        if percent <= Decimal::ZERO || percent >= dec!(100) {
            return Err(TradingError::Validation(format!(
                "stop-loss percent must be between 0 and 100, got {}",
                percent
            )));
        }
        Ok(Self { percent })
    }

    pub fn percent(&self) -> Decimal {
        self.percent
    }

    /// Stop price for a long entry at `entry_price`, rounded to cents.
    pub fn stop_price(&self, entry_price: Decimal) -> Decimal {
        let factor = (dec!(100) - self.percent) / dec!(100);
        let stop = (entry_price * factor).round_dp(2);
        trace!(%entry_price, %stop, "stop-loss placed");
        stop
    }
}
