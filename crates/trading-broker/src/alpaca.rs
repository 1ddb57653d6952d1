//! Alpaca broker integration for paper and live trading.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, Response, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use trading_core::error::BrokerError;
use trading_core::traits::Broker;
use trading_core::types::{
    Account, Order, OrderClass, OrderRequest, OrderStatus, OrderType, Position, Side,
    TimeInForce,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

const PAPER_URL: &str = "https://paper-api.alpaca.markets";
const LIVE_URL: &str = "https://api.alpaca.markets";

/// Which Alpaca environment orders go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    #[default]
    Paper,
    Live,
}

impl fmt::Display for TradingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradingMode::Paper => write!(f, "PAPER"),
            TradingMode::Live => write!(f, "LIVE"),
        }
    }
}

impl FromStr for TradingMode {
    type Err = BrokerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paper" => Ok(TradingMode::Paper),
            "live" => Ok(TradingMode::Live),
            other => Err(BrokerError::Configuration(format!(
                "unknown trading mode '{}', expected paper or live",
                other
            ))),
        }
    }
}

/// Alpaca API configuration.
#[derive(Clone)]
pub struct AlpacaConfig {
    pub api_key: String,
    pub api_secret: String,
    pub mode: TradingMode,
    base_url: Option<String>,
}

impl fmt::Debug for AlpacaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlpacaConfig")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .field("mode", &self.mode)
            .finish()
    }
}

impl AlpacaConfig {
    pub fn new(api_key: String, api_secret: String, mode: TradingMode) -> Self {
        Self {
            api_key,
            api_secret,
            mode,
            base_url: None,
        }
    }

    /// Point the client at a different trading endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn base_url(&self) -> &str {
        match (&self.base_url, self.mode) {
            (Some(url), _) => url,
            (None, TradingMode::Paper) => PAPER_URL,
            (None, TradingMode::Live) => LIVE_URL,
        }
    }
}

/// Alpaca API response types
#[derive(Debug, Deserialize)]
struct AlpacaAccount {
    cash: String,
    buying_power: String,
    equity: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaPosition {
    symbol: String,
    #[serde(default)]
    qty: Option<String>,
    #[serde(default)]
    avg_entry_price: Option<String>,
    #[serde(default)]
    market_value: Option<String>,
    #[serde(default)]
    unrealized_pl: Option<String>,
    #[serde(default)]
    current_price: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlpacaOrder {
    id: String,
    client_order_id: String,
    status: String,
    symbol: String,
    qty: Option<String>,
    filled_qty: String,
    #[serde(rename = "type")]
    order_type: String,
    #[serde(default)]
    order_class: String,
    side: String,
    time_in_force: String,
    stop_price: Option<String>,
    filled_avg_price: Option<String>,
    created_at: String,
    #[serde(default)]
    legs: Option<Vec<AlpacaOrder>>,
}

#[derive(Debug, Serialize)]
struct StopLossLeg {
    stop_price: String,
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest {
    symbol: String,
    qty: String,
    side: &'static str,
    #[serde(rename = "type")]
    order_type: &'static str,
    time_in_force: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_class: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_loss: Option<StopLossLeg>,
}

impl From<&OrderRequest> for CreateOrderRequest {
    fn from(request: &OrderRequest) -> Self {
        let order_class = match request.order_class {
            OrderClass::Simple => None,
            class => Some(class.as_str()),
        };

        Self {
            symbol: request.symbol.clone(),
            qty: request.quantity.to_string(),
            side: request.side.as_str(),
            order_type: request.order_type.as_str(),
            time_in_force: request.time_in_force.as_str(),
            order_class,
            stop_loss: request.stop_loss.map(|s| StopLossLeg {
                stop_price: s.stop_price.to_string(),
            }),
        }
    }
}

fn decimal(field: &str, value: &str) -> Result<Decimal, BrokerError> {
    value
        .parse()
        .map_err(|_| BrokerError::ApiError(format!("invalid {} '{}'", field, value)))
}

fn parse_account(account: AlpacaAccount) -> Result<Account, BrokerError> {
    Ok(Account {
        cash: decimal("cash", &account.cash)?,
        buying_power: decimal("buying_power", &account.buying_power)?,
        equity: decimal("equity", &account.equity)?,
    })
}

/// Only the symbol matters for deciding what is held, so an unreadable
/// figure is logged and zeroed instead of failing the whole fetch.
fn parse_position(p: AlpacaPosition) -> Position {
    let figure = |field: &str, value: &Option<String>| {
        value
            .as_deref()
            .and_then(|v| v.parse::<Decimal>().ok())
            .unwrap_or_else(|| {
                warn!(symbol = %p.symbol, field, value = ?value, "unreadable position figure");
                Decimal::ZERO
            })
    };

    Position {
        quantity: figure("qty", &p.qty),
        avg_entry_price: figure("avg_entry_price", &p.avg_entry_price),
        current_price: figure("current_price", &p.current_price),
        market_value: figure("market_value", &p.market_value),
        unrealized_pnl: figure("unrealized_pl", &p.unrealized_pl),
        symbol: p.symbol,
    }
}

fn parse_order(order: AlpacaOrder) -> Result<Order, BrokerError> {
    let id = Uuid::parse_str(&order.id)
        .map_err(|_| BrokerError::ApiError(format!("invalid order id '{}'", order.id)))?;

    let side = match order.side.as_str() {
        "buy" => Side::Buy,
        "sell" => Side::Sell,
        _ => return Err(BrokerError::ApiError(format!("Unknown side: {}", order.side))),
    };

    let order_type = match order.order_type.as_str() {
        "limit" => OrderType::Limit,
        "stop" => OrderType::Stop,
        "stop_limit" => OrderType::StopLimit,
        _ => OrderType::Market,
    };

    let order_class = match order.order_class.as_str() {
        "bracket" => OrderClass::Bracket,
        _ => OrderClass::Simple,
    };

    let time_in_force = match order.time_in_force.as_str() {
        "gtc" => TimeInForce::GTC,
        _ => TimeInForce::Day,
    };

    let status = match order.status.as_str() {
        "new" | "pending_new" => OrderStatus::Pending,
        "accepted" => OrderStatus::Accepted,
        "partially_filled" => OrderStatus::PartiallyFilled,
        "filled" => OrderStatus::Filled,
        "rejected" => OrderStatus::Rejected,
        "canceled" | "expired" => OrderStatus::Canceled,
        _ => OrderStatus::Pending,
    };

    // Bracket parents carry the stop on their stop-loss leg.
    let stop_price = order.stop_price.clone().or_else(|| {
        order
            .legs
            .iter()
            .flatten()
            .find_map(|leg| leg.stop_price.clone())
    });

    let created_at = DateTime::parse_from_rfc3339(&order.created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| BrokerError::ApiError(format!("invalid created_at '{}'", order.created_at)))?;

    Ok(Order {
        id,
        client_order_id: order.client_order_id,
        symbol: order.symbol,
        side,
        order_type,
        order_class,
        quantity: order
            .qty
            .as_deref()
            .map(|q| decimal("qty", q))
            .transpose()?
            .unwrap_or(Decimal::ZERO),
        stop_price: stop_price.as_deref().and_then(|p| p.parse().ok()),
        time_in_force,
        status,
        filled_quantity: decimal("filled_qty", &order.filled_qty)?,
        filled_avg_price: order.filled_avg_price.as_deref().and_then(|p| p.parse().ok()),
        created_at,
    })
}

/// Turn a non-success response into the matching error.
async fn error_for(resp: Response) -> BrokerError {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    let message = format!("{}: {}", status, text);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            BrokerError::AuthenticationError(message)
        }
        _ => BrokerError::ApiError(message),
    }
}

/// Alpaca broker client.
pub struct AlpacaBroker {
    config: AlpacaConfig,
    client: Client,
}

impl AlpacaBroker {
    /// Create a new Alpaca broker client.
    pub fn new(config: AlpacaConfig) -> Result<Self, BrokerError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(&config.api_key)
                .map_err(|e| BrokerError::Configuration(e.to_string()))?,
        );
        headers.insert(
            "APCA-API-SECRET-KEY",
            header::HeaderValue::from_str(&config.api_secret)
                .map_err(|e| BrokerError::Configuration(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn mode(&self) -> TradingMode {
        self.config.mode
    }
}

#[async_trait]
impl Broker for AlpacaBroker {
    async fn get_account(&self) -> Result<Account, BrokerError> {
        let url = format!("{}/v2/account", self.config.base_url());

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(error_for(resp).await);
        }

        let account: AlpacaAccount = resp
            .json()
            .await
            .map_err(|e| BrokerError::ApiError(e.to_string()))?;

        parse_account(account)
    }

    async fn get_positions(&self) -> Result<Vec<Position>, BrokerError> {
        let url = format!("{}/v2/positions", self.config.base_url());

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(error_for(resp).await);
        }

        let positions: Vec<AlpacaPosition> = resp
            .json()
            .await
            .map_err(|e| BrokerError::ApiError(e.to_string()))?;

        Ok(positions.into_iter().map(parse_position).collect())
    }

    async fn submit_order(&self, request: OrderRequest) -> Result<Order, BrokerError> {
        let url = format!("{}/v2/orders", self.config.base_url());
        let create_req = CreateOrderRequest::from(&request);

        debug!("Submitting order: {:?}", create_req);

        let resp = self
            .client
            .post(&url)
            .json(&create_req)
            .send()
            .await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(error_for(resp).await);
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(BrokerError::OrderRejected(format!("{}: {}", status, text)));
        }

        let order: AlpacaOrder = resp
            .json()
            .await
            .map_err(|e| BrokerError::ApiError(e.to_string()))?;

        info!(
            "Order submitted: {} {} {} ({})",
            order.side,
            order.qty.as_deref().unwrap_or("?"),
            order.symbol,
            order.status
        );
        parse_order(order)
    }

    fn name(&self) -> &str {
        match self.config.mode {
            TradingMode::Paper => "Alpaca Paper",
            TradingMode::Live => "Alpaca Live",
        }
    }
}
