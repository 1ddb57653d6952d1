//! CSV directory source for offline runs.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use trading_core::error::DataError;
use trading_core::traits::MarketData;
use trading_core::types::{Bar, BarSeries, Lookback};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open", default)]
    open: Option<f64>,
    #[serde(alias = "High", alias = "high", default)]
    high: Option<f64>,
    #[serde(alias = "Low", alias = "low", default)]
    low: Option<f64>,
    #[serde(alias = "Close", alias = "close", default)]
    close: Option<f64>,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: Option<f64>,
}

/// Reads `{SYMBOL}.csv` (or the lowercase name) from a directory.
///
/// The lookback window is measured back from the newest row in the file,
/// so an old export replays as if it were today.
pub struct CsvDataSource {
    dir: PathBuf,
}

impl CsvDataSource {
    /// Create a source over an existing directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DataError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(DataError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("data directory {} does not exist", dir.display()),
            )));
        }
        Ok(Self { dir })
    }

    fn file_for(&self, symbol: &str) -> Option<PathBuf> {
        [
            self.dir.join(format!("{}.csv", symbol)),
            self.dir.join(format!("{}.csv", symbol.to_lowercase())),
        ]
        .into_iter()
        .find(|p| p.is_file())
    }

    /// Load bars from a specific path.
    fn load_from_path(&self, path: &Path) -> Result<Vec<Bar>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut bars = Vec::new();

        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            let Some(close) = record.close else {
                continue;
            };

            let timestamp = parse_timestamp(&record.date)?;

            bars.push(Bar::new(
                timestamp,
                record.open.unwrap_or(close),
                record.high.unwrap_or(close),
                record.low.unwrap_or(close),
                close,
                record.volume.unwrap_or(0.0),
            ));
        }

        Ok(bars)
    }
}

/// Parse various timestamp formats into Unix milliseconds.
fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    let formats = ["%Y-%m-%d", "%Y-%m-%d %H:%M:%S", "%Y/%m/%d", "%m/%d/%Y"];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d.and_time(NaiveTime::MIN).and_utc().timestamp_millis());
        }
    }

    // Unix timestamp; assume milliseconds if > 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        return Ok(if ts > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[async_trait]
impl MarketData for CsvDataSource {
    async fn daily_history(
        &self,
        symbol: &str,
        lookback: Lookback,
    ) -> Result<BarSeries, DataError> {
        let Some(path) = self.file_for(symbol) else {
            debug!(symbol, dir = %self.dir.display(), "no csv file for symbol");
            return Ok(BarSeries::new(symbol));
        };

        let series = BarSeries::from_bars(symbol, self.load_from_path(&path)?);
        let Some(newest) = series.last().map(|b| b.datetime()) else {
            return Ok(series);
        };

        let start = lookback.start_from(newest).timestamp_millis();
        let window = series
            .iter()
            .filter(|b| b.timestamp > start)
            .copied()
            .collect();

        Ok(BarSeries::from_bars(symbol, window))
    }

    fn name(&self) -> &str {
        "CSV"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(dir: &Path, name: &str, rows: &[(&str, f64)]) {
        let mut body = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
        for (date, close) in rows {
            body.push_str(&format!(
                "{},{},{},{},{},{},1000\n",
                date, close, close, close, close, close
            ));
        }
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_parse_timestamp() {
        assert!(parse_timestamp("2024-01-15").is_ok());
        assert!(parse_timestamp("2024-01-15 10:30:00").is_ok());
        assert_eq!(parse_timestamp("1705312800000").unwrap(), 1_705_312_800_000); // Unix ms
        assert_eq!(parse_timestamp("1705312800").unwrap(), 1_705_312_800_000); // Unix sec
        assert!(parse_timestamp("last tuesday").is_err());
    }

    #[test]
    fn test_missing_directory() {
        assert!(CsvDataSource::new("/definitely/not/here").is_err());
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvDataSource::new(dir.path()).unwrap();

        let series = source.daily_history("NOPE", Lookback::SIGNAL).await.unwrap();
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn test_lookback_measured_from_newest_row() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "AAPL.csv",
            &[
                ("2023-06-30", 90.0),
                ("2024-01-02", 100.0),
                ("2024-06-28", 110.0),
                ("2024-07-01", 111.0),
            ],
        );
        let source = CsvDataSource::new(dir.path()).unwrap();

        let history = source.daily_history("AAPL", Lookback::SIGNAL).await.unwrap();
        assert_eq!(history.closes(), vec![100.0, 110.0, 111.0]);

        let latest = source.latest_close("AAPL").await.unwrap();
        assert_eq!(latest, Some(111.0));
    }

    #[tokio::test]
    async fn test_lowercase_file_and_blank_close() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("msft.csv"),
            "date,close\n2024-07-01,420.5\n2024-07-02,\n",
        )
        .unwrap();
        let source = CsvDataSource::new(dir.path()).unwrap();

        let history = source.daily_history("MSFT", Lookback::SIGNAL).await.unwrap();
        assert_eq!(history.closes(), vec![420.5]);
    }
}
