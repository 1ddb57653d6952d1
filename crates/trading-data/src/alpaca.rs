//! Alpaca market-data API source.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{header, Client, StatusCode, Url};
use serde::Deserialize;
use tracing::debug;
use trading_core::error::DataError;
use trading_core::traits::MarketData;
use trading_core::types::{Bar, BarSeries, Lookback};

const DATA_URL: &str = "https://data.alpaca.markets";
const FEED: &str = "iex";

/// Daily bars are stamped at midnight New York time, so a window of a day or
/// two measured from now can miss the last session entirely. Day windows
/// request at least this many calendar days and are then cut back relative
/// to the newest bar returned.
const MIN_REQUEST_DAYS: u32 = 7;

#[derive(Debug, Deserialize)]
struct AlpacaBar {
    t: String,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: f64,
}

#[derive(Debug, Deserialize)]
struct AlpacaBarsResponse {
    bars: Option<Vec<AlpacaBar>>,
    #[allow(dead_code)]
    next_page_token: Option<String>,
}

/// Daily history from Alpaca's stock bars endpoint.
pub struct AlpacaDataSource {
    client: Client,
    data_url: String,
}

impl AlpacaDataSource {
    /// Create a client authenticated with the account's API key pair.
    pub fn new(api_key: &str, api_secret: &str) -> Result<Self, DataError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(api_key)
                .map_err(|e| DataError::ConnectionError(e.to_string()))?,
        );
        headers.insert(
            "APCA-API-SECRET-KEY",
            header::HeaderValue::from_str(api_secret)
                .map_err(|e| DataError::ConnectionError(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            data_url: DATA_URL.to_string(),
        })
    }
}

fn bars_url(data_url: &str, symbol: &str) -> Result<Url, DataError> {
    let mut url =
        Url::parse(data_url).map_err(|e| DataError::ConnectionError(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| DataError::ConnectionError(format!("invalid data url {}", data_url)))?
        .pop_if_empty()
        .extend(["v2", "stocks", symbol, "bars"]);
    Ok(url)
}

fn request_start(lookback: Lookback, now: DateTime<Utc>) -> DateTime<Utc> {
    match lookback {
        Lookback::Days(days) => Lookback::Days(days.max(MIN_REQUEST_DAYS)).start_from(now),
        Lookback::Months(_) => lookback.start_from(now),
    }
}

/// Cut a day window back to the sessions covered by `lookback`, counted from
/// the newest bar rather than the wall clock.
fn trim_to_sessions(series: BarSeries, lookback: Lookback) -> BarSeries {
    if !matches!(lookback, Lookback::Days(_)) {
        return series;
    }
    let Some(newest) = series.last().map(|b| b.datetime()) else {
        return series;
    };

    let start = lookback.start_from(newest).timestamp_millis();
    let window = series
        .iter()
        .filter(|b| b.timestamp > start)
        .copied()
        .collect();
    BarSeries::from_bars(series.symbol.clone(), window)
}

fn parse_bars(symbol: &str, response: AlpacaBarsResponse) -> Result<BarSeries, DataError> {
    let bars = response
        .bars
        .unwrap_or_default()
        .into_iter()
        .map(|b| {
            let ts = DateTime::parse_from_rfc3339(&b.t)
                .map_err(|e| DataError::ParseError(format!("bad bar timestamp {}: {}", b.t, e)))?
                .timestamp_millis();
            Ok(Bar::new(ts, b.o, b.h, b.l, b.c, b.v))
        })
        .collect::<Result<Vec<_>, DataError>>()?;

    Ok(BarSeries::from_bars(symbol, bars))
}

#[async_trait]
impl MarketData for AlpacaDataSource {
    async fn daily_history(
        &self,
        symbol: &str,
        lookback: Lookback,
    ) -> Result<BarSeries, DataError> {
        let url = bars_url(&self.data_url, symbol)?;
        let start =
            request_start(lookback, Utc::now()).to_rfc3339_opts(SecondsFormat::Secs, true);

        let params = [
            ("timeframe", "1Day".to_string()),
            ("start", start),
            ("limit", "1000".to_string()),
            ("adjustment", "raw".to_string()),
            ("feed", FEED.to_string()),
        ];

        let resp = self
            .client
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            debug!(symbol, "symbol not found");
            return Ok(BarSeries::new(symbol));
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(DataError::ApiError(format!("{}: {}", status, text)));
        }

        let data: AlpacaBarsResponse = resp
            .json()
            .await
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let series = trim_to_sessions(parse_bars(symbol, data)?, lookback);
        debug!(symbol, %lookback, bars = series.len(), "fetched history");
        Ok(series)
    }

    fn name(&self) -> &str {
        "Alpaca"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_bars() {
        let body = r#"{
            "bars": [
                {"t": "2024-01-03T05:00:00Z", "o": 184.22, "h": 185.88, "l": 183.43, "c": 184.25, "v": 58414460, "n": 656956, "vw": 184.319},
                {"t": "2024-01-02T05:00:00Z", "o": 187.15, "h": 188.44, "l": 183.885, "c": 185.64, "v": 82488674, "n": 1009074, "vw": 185.9465}
            ],
            "symbol": "AAPL",
            "next_page_token": null
        }"#;

        let response: AlpacaBarsResponse = serde_json::from_str(body).unwrap();
        let series = parse_bars("AAPL", response).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![185.64, 184.25]);
    }

    #[test]
    fn test_parse_null_bars() {
        let body = r#"{"bars": null, "symbol": "AAPL", "next_page_token": null}"#;
        let response: AlpacaBarsResponse = serde_json::from_str(body).unwrap();

        assert!(parse_bars("AAPL", response).unwrap().is_empty());
    }

    #[test]
    fn test_parse_bad_timestamp() {
        let body = r#"{"bars": [{"t": "yesterday", "o": 1, "h": 1, "l": 1, "c": 1, "v": 1}]}"#;
        let response: AlpacaBarsResponse = serde_json::from_str(body).unwrap();

        assert!(matches!(
            parse_bars("AAPL", response),
            Err(DataError::ParseError(_))
        ));
    }

    #[test]
    fn test_latest_window_reaches_last_session() {
        // Tuesday before the open: Monday's bar is stamped 04:00 UTC.
        let now = Utc.with_ymd_and_hms(2024, 7, 2, 12, 0, 0).unwrap();
        let monday = Utc.with_ymd_and_hms(2024, 7, 1, 4, 0, 0).unwrap();

        assert!(request_start(Lookback::LATEST, now) < monday);
        assert_eq!(
            request_start(Lookback::SIGNAL, now),
            Lookback::SIGNAL.start_from(now)
        );

        let body = r#"{"bars": [
            {"t": "2024-06-27T04:00:00Z", "o": 1, "h": 1, "l": 1, "c": 212.5, "v": 1},
            {"t": "2024-06-28T04:00:00Z", "o": 1, "h": 1, "l": 1, "c": 210.62, "v": 1},
            {"t": "2024-07-01T04:00:00Z", "o": 1, "h": 1, "l": 1, "c": 216.75, "v": 1}
        ]}"#;
        let response: AlpacaBarsResponse = serde_json::from_str(body).unwrap();
        let series = trim_to_sessions(parse_bars("AAPL", response).unwrap(), Lookback::LATEST);

        assert_eq!(series.closes(), vec![216.75]);
    }

    #[test]
    fn test_signal_window_is_not_trimmed() {
        let body = r#"{"bars": [
            {"t": "2024-01-02T05:00:00Z", "o": 1, "h": 1, "l": 1, "c": 185.64, "v": 1},
            {"t": "2024-07-01T04:00:00Z", "o": 1, "h": 1, "l": 1, "c": 216.75, "v": 1}
        ]}"#;
        let response: AlpacaBarsResponse = serde_json::from_str(body).unwrap();
        let series = trim_to_sessions(parse_bars("AAPL", response).unwrap(), Lookback::SIGNAL);

        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_bars_url_escapes_symbol() {
        let url = bars_url(DATA_URL, "BRK/B").unwrap();
        assert_eq!(url.as_str(), "https://data.alpaca.markets/v2/stocks/BRK%2FB/bars");

        let url = bars_url(DATA_URL, "AAPL").unwrap();
        assert_eq!(url.as_str(), "https://data.alpaca.markets/v2/stocks/AAPL/bars");
    }
}
