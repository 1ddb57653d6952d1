//! Order types and structures.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Wire name used by the brokerage API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Market order - execute immediately at best available price
    Market,
    /// Limit order - execute at specified price or better
    Limit,
    /// Stop order - becomes market order when stop price is reached
    Stop,
    /// Stop-limit order - becomes limit order when stop price is reached
    StopLimit,
}

impl OrderType {
    /// Wire name used by the brokerage API.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "market",
            OrderType::Limit => "limit",
            OrderType::Stop => "stop",
            OrderType::StopLimit => "stop_limit",
        }
    }
}

/// Time in force for orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Valid for the trading day only
    #[default]
    Day,
    /// Good til canceled
    #[serde(rename = "gtc")]
    GTC,
}

impl TimeInForce {
    /// Wire name used by the brokerage API.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Day => "day",
            TimeInForce::GTC => "gtc",
        }
    }
}

/// Order class: a lone order or a parent with attached children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderClass {
    /// Single order without children
    #[default]
    Simple,
    /// Entry order with a protective stop-loss child
    Bracket,
}

impl OrderClass {
    /// Wire name used by the brokerage API.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderClass::Simple => "simple",
            OrderClass::Bracket => "bracket",
        }
    }
}

/// Stop-loss leg attached to a bracket order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopLoss {
    /// Price at which the protective sell triggers
    pub stop_price: Decimal,
}

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order created but not yet acknowledged
    Pending,
    /// Order accepted by broker/exchange
    Accepted,
    /// Order partially filled
    PartiallyFilled,
    /// Order completely filled
    Filled,
    /// Order canceled or expired
    Canceled,
    /// Order rejected
    Rejected,
}

/// Order request for submitting new orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Symbol to trade
    pub symbol: String,
    /// Buy or sell
    pub side: Side,
    /// Type of order
    pub order_type: OrderType,
    /// Whole shares to trade
    pub quantity: u64,
    /// Time in force
    pub time_in_force: TimeInForce,
    /// Simple or bracket
    pub order_class: OrderClass,
    /// Protective stop for bracket orders
    pub stop_loss: Option<StopLoss>,
}

impl OrderRequest {
    /// Create a market order request.
    pub fn market(symbol: impl Into<String>, side: Side, quantity: u64) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            quantity,
            time_in_force: TimeInForce::Day,
            order_class: OrderClass::Simple,
            stop_loss: None,
        }
    }

    /// Create a day market buy with an attached stop-loss child.
    pub fn bracket_buy(symbol: impl Into<String>, quantity: u64, stop_price: Decimal) -> Self {
        Self::market(symbol, Side::Buy, quantity).with_stop_loss(stop_price)
    }

    /// Attach a stop-loss leg, turning the request into a bracket order.
    pub fn with_stop_loss(mut self, stop_price: Decimal) -> Self {
        self.order_class = OrderClass::Bracket;
        self.stop_loss = Some(StopLoss { stop_price });
        self
    }
}

/// Order as acknowledged by the broker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID
    pub id: Uuid,
    /// Client-provided order ID
    pub client_order_id: String,
    /// Symbol traded
    pub symbol: String,
    /// Buy or sell
    pub side: Side,
    /// Type of order
    pub order_type: OrderType,
    /// Simple or bracket
    pub order_class: OrderClass,
    /// Original quantity
    pub quantity: Decimal,
    /// Stop price of the attached stop-loss, if any
    pub stop_price: Option<Decimal>,
    /// Time in force
    pub time_in_force: TimeInForce,
    /// Current status
    pub status: OrderStatus,
    /// Quantity filled so far
    pub filled_quantity: Decimal,
    /// Average fill price
    pub filled_avg_price: Option<Decimal>,
    /// When the order was created
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create a pending order mirroring a request.
    pub fn from_request(request: &OrderRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_order_id: Uuid::new_v4().to_string(),
            symbol: request.symbol.clone(),
            side: request.side,
            order_type: request.order_type,
            order_class: request.order_class,
            quantity: Decimal::from(request.quantity),
            stop_price: request.stop_loss.map(|s| s.stop_price),
            time_in_force: request.time_in_force,
            status: OrderStatus::Pending,
            filled_quantity: Decimal::ZERO,
            filled_avg_price: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_request_market() {
        let request = OrderRequest::market("AAPL", Side::Buy, 100);
        assert_eq!(request.symbol, "AAPL");
        assert_eq!(request.side, Side::Buy);
        assert_eq!(request.order_type, OrderType::Market);
        assert_eq!(request.order_class, OrderClass::Simple);
        assert!(request.stop_loss.is_none());
    }

    #[test]
    fn test_bracket_buy() {
        let request = OrderRequest::bracket_buy("MSFT", 5, dec!(97.00));
        assert_eq!(request.side, Side::Buy);
        assert_eq!(request.order_type, OrderType::Market);
        assert_eq!(request.time_in_force, TimeInForce::Day);
        assert_eq!(request.order_class, OrderClass::Bracket);
        assert_eq!(request.stop_loss, Some(StopLoss { stop_price: dec!(97.00) }));
    }

    #[test]
    fn test_order_from_request() {
        let request = OrderRequest::bracket_buy("AAPL", 3, dec!(145.50));
        let order = Order::from_request(&request);

        assert_eq!(order.symbol, "AAPL");
        assert_eq!(order.quantity, dec!(3));
        assert_eq!(order.stop_price, Some(dec!(145.50)));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.filled_quantity, Decimal::ZERO);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(Side::Buy.as_str(), "buy");
        assert_eq!(OrderType::StopLimit.as_str(), "stop_limit");
        assert_eq!(TimeInForce::Day.as_str(), "day");
        assert_eq!(OrderClass::Bracket.as_str(), "bracket");
    }
}
