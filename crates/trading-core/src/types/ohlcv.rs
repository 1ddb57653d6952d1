//! OHLCV (Open, High, Low, Close, Volume) data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar.
/// Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Create a bar where only the close is known.
    pub fn from_close(timestamp: i64, close: f64) -> Self {
        Self::new(timestamp, close, close, close, close, 0.0)
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or_default()
    }
}

/// Ordered daily price history for one symbol, oldest bar first.
#[derive(Debug, Clone, Default)]
pub struct BarSeries {
    /// Symbol identifier
    pub symbol: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Create a new empty bar series.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    /// Create a series from bars, sorting them oldest first.
    pub fn from_bars(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    /// Push a new bar.
    pub fn push(&mut self, bar: Bar) {
        self.bars.push(bar);
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Extract close prices, skipping values that are not finite.
    pub fn closes(&self) -> Vec<f64> {
        self.bars
            .iter()
            .map(|b| b.close)
            .filter(|c| c.is_finite())
            .collect()
    }

    /// Latest finite close, if any.
    pub fn last_close(&self) -> Option<f64> {
        self.bars
            .iter()
            .rev()
            .map(|b| b.close)
            .find(|c| c.is_finite())
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bars_sorts_oldest_first() {
        let series = BarSeries::from_bars(
            "AAPL",
            vec![
                Bar::from_close(3, 102.5),
                Bar::from_close(1, 100.5),
                Bar::from_close(2, 101.5),
            ],
        );

        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![100.5, 101.5, 102.5]);
        assert_eq!(series.last().unwrap().timestamp, 3);
    }

    #[test]
    fn test_closes_skip_missing_values() {
        let mut series = BarSeries::new("MSFT");
        series.push(Bar::from_close(1, 100.0));
        series.push(Bar::from_close(2, f64::NAN));
        series.push(Bar::from_close(3, 101.0));
        series.push(Bar::from_close(4, f64::NAN));

        assert_eq!(series.closes(), vec![100.0, 101.0]);
        assert_eq!(series.last_close(), Some(101.0));
    }

    #[test]
    fn test_empty_series() {
        let series = BarSeries::new("ZZZZ");
        assert!(series.is_empty());
        assert!(series.last_close().is_none());
    }

    #[test]
    fn test_bar_datetime() {
        let bar = Bar::new(1_705_312_800_000, 100.0, 110.0, 95.0, 105.0, 1_000_000.0);
        assert_eq!(bar.datetime().timestamp(), 1_705_312_800);
    }
}
