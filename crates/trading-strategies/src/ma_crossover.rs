//! Moving Average Crossover detection.
//!
//! A bullish crossover fires when the fast SMA is above the slow SMA on the
//! newest bar after being at or below it on the bar before. Nothing is
//! remembered between calls; every evaluation starts from the closes given.

use serde::{Deserialize, Serialize};
use trading_core::error::StrategyError;
use trading_indicators::Sma;

/// Configuration for the crossover signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossoverConfig {
    /// Fast moving average period
    pub fast_period: usize,
    /// Slow moving average period
    pub slow_period: usize,
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self {
            fast_period: 10,
            slow_period: 50,
        }
    }
}

impl CrossoverConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), StrategyError> {
        if self.fast_period == 0 {
            return Err(StrategyError::InvalidConfig(
                "Fast period must be greater than 0".into(),
            ));
        }
        if self.fast_period >= self.slow_period {
            return Err(StrategyError::InvalidConfig(
                "Fast period must be less than slow period".into(),
            ));
        }
        Ok(())
    }
}

/// Fast and slow averages on the two newest bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossoverReading {
    pub fast: f64,
    pub slow: f64,
    pub prev_fast: f64,
    pub prev_slow: f64,
}

impl CrossoverReading {
    /// Fast crossed above slow on the newest bar.
    pub fn is_bullish(&self) -> bool {
        self.fast > self.slow && self.prev_fast <= self.prev_slow
    }
}

/// Moving Average Crossover detector.
#[derive(Debug, Clone)]
pub struct MACrossover {
    config: CrossoverConfig,
    fast: Sma,
    slow: Sma,
}

impl MACrossover {
    /// Create a detector, rejecting invalid periods.
    pub fn new(config: CrossoverConfig) -> Result<Self, StrategyError> {
        config.validate()?;
        Ok(Self {
            fast: Sma::new(config.fast_period),
            slow: Sma::new(config.slow_period),
            config,
        })
    }

    pub fn config(&self) -> &CrossoverConfig {
        &self.config
    }

    /// Closes needed before the slow average is defined on two bars.
    pub fn warmup_period(&self) -> usize {
        self.config.slow_period + 1
    }

    /// Read both averages on the two newest bars.
    ///
    /// Returns `None` when any of the four values is undefined, which is the
    /// case for every input shorter than [`warmup_period`](Self::warmup_period).
    pub fn reading(&self, closes: &[f64]) -> Option<CrossoverReading> {
        let fast = self.fast.rolling(closes);
        let slow = self.slow.rolling(closes);

        Some(CrossoverReading {
            fast: fast.from_end(0)?,
            slow: slow.from_end(0)?,
            prev_fast: fast.from_end(1)?,
            prev_slow: slow.from_end(1)?,
        })
    }

    /// Bullish crossover on the newest bar. Undefined averages never fire.
    pub fn is_bullish_crossover(&self, closes: &[f64]) -> bool {
        self.reading(closes).is_some_and(|r| r.is_bullish())
    }
}

impl Default for MACrossover {
    fn default() -> Self {
        let config = CrossoverConfig::default();
        Self {
            fast: Sma::new(config.fast_period),
            slow: Sma::new(config.slow_period),
            config,
        }
    }
}
