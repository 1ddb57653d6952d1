//! Yahoo Finance chart API source.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode, Url};
use serde::Deserialize;
use tracing::debug;
use trading_core::error::DataError;
use trading_core::traits::MarketData;
use trading_core::types::{Bar, BarSeries, Lookback};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) crossover-bot";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Daily history from the Yahoo Finance chart endpoint.
pub struct YahooDataSource {
    client: Client,
    base_url: String,
}

impl YahooDataSource {
    /// Create a client against the public endpoint.
    pub fn new() -> Result<Self, DataError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, DataError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

fn chart_url(base_url: &str, symbol: &str) -> Result<Url, DataError> {
    let mut url =
        Url::parse(base_url).map_err(|e| DataError::ConnectionError(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| DataError::ConnectionError(format!("invalid base url {}", base_url)))?
        .pop_if_empty()
        .extend(["v8", "finance", "chart", symbol]);
    Ok(url)
}

/// Convert a chart payload into a series. Rows without a close are dropped;
/// a "Not Found" error means the symbol is unknown and yields an empty series.
fn parse_chart(symbol: &str, response: ChartResponse) -> Result<BarSeries, DataError> {
    if let Some(err) = response.chart.error {
        if err.code == "Not Found" {
            return Ok(BarSeries::new(symbol));
        }
        return Err(DataError::ApiError(format!(
            "{}: {}",
            err.code,
            err.description.unwrap_or_default()
        )));
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(BarSeries::new(symbol));
    };
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let at = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

    let bars = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let close = at(&quote.close, i)?;
            Some(Bar::new(
                ts * 1000,
                at(&quote.open, i).unwrap_or(close),
                at(&quote.high, i).unwrap_or(close),
                at(&quote.low, i).unwrap_or(close),
                close,
                at(&quote.volume, i).unwrap_or(0.0),
            ))
        })
        .collect();

    Ok(BarSeries::from_bars(symbol, bars))
}

#[async_trait]
impl MarketData for YahooDataSource {
    async fn daily_history(
        &self,
        symbol: &str,
        lookback: Lookback,
    ) -> Result<BarSeries, DataError> {
        let url = chart_url(&self.base_url, symbol)?;

        let resp = self
            .client
            .get(url)
            .query(&[("range", lookback.as_range().as_str()), ("interval", "1d")])
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

        let chart: ChartResponse = resp
            .json()
            .await
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let series = parse_chart(symbol, chart)?;
        debug!(symbol, %lookback, bars = series.len(), "fetched history");
        Ok(series)
    }

    fn name(&self) -> &str {
        "Yahoo Finance"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(symbol: &str, body: &str) -> Result<BarSeries, DataError> {
        let response: ChartResponse = serde_json::from_str(body).unwrap();
        parse_chart(symbol, response)
    }

    #[test]
    fn test_parse_chart_drops_missing_closes() {
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"symbol": "AAPL", "currency": "USD"},
                    "timestamp": [1704205800, 1704292200, 1704378600],
                    "indicators": {
                        "quote": [{
                            "open": [187.15, null, 182.15],
                            "high": [188.44, null, 183.09],
                            "low": [183.89, null, 180.88],
                            "close": [185.64, null, 181.91],
                            "volume": [82488700, null, 71983600]
                        }],
                        "adjclose": [{"adjclose": [184.73, null, 181.02]}]
                    }
                }],
                "error": null
            }
        }"#;

        let series = parse("AAPL", body).unwrap();
        assert_eq!(series.symbol, "AAPL");
        assert_eq!(series.closes(), vec![185.64, 181.91]);
        assert_eq!(series.last().unwrap().timestamp, 1_704_378_600_000);
        assert_eq!(series.last().unwrap().high, 183.09);
    }

    #[test]
    fn test_parse_chart_not_found_is_empty() {
        let body = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        }"#;

        let series = parse("ZZZZZ", body).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_parse_chart_other_error() {
        let body = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Bad Request", "description": "Invalid input - interval=1d is not supported"}
            }
        }"#;

        assert!(matches!(parse("AAPL", body), Err(DataError::ApiError(_))));
    }

    #[test]
    fn test_parse_chart_without_timestamps() {
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"symbol": "AAPL"},
                    "indicators": {"quote": [{}]}
                }],
                "error": null
            }
        }"#;

        assert!(parse("AAPL", body).unwrap().is_empty());
    }

    #[test]
    fn test_chart_url_escapes_symbol() {
        let url = chart_url(DEFAULT_BASE_URL, "BRK/B").unwrap();
        assert_eq!(
            url.as_str(),
            "https://query1.finance.yahoo.com/v8/finance/chart/BRK%2FB"
        );

        let url = chart_url("http://127.0.0.1:9000/", "AAPL").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/v8/finance/chart/AAPL");
    }
}
