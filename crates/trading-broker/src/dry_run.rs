//! Dry-run broker: reads from a real account, never sends orders.

use async_trait::async_trait;
use std::sync::Mutex;
use trading_core::error::BrokerError;
use trading_core::traits::Broker;
use trading_core::types::{Account, Order, OrderRequest, OrderStatus, Position};
use tracing::info;

/// Wraps another broker. Account and position reads go through to the inner
/// broker; submitted orders are recorded and acknowledged locally.
pub struct DryRunBroker<B> {
    inner: B,
    orders: Mutex<Vec<Order>>,
}

impl<B: Broker> DryRunBroker<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            orders: Mutex::new(Vec::new()),
        }
    }

    /// Orders that would have been sent, in submission order.
    pub fn recorded_orders(&self) -> Vec<Order> {
        self.orders
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl<B: Broker> Broker for DryRunBroker<B> {
    async fn get_account(&self) -> Result<Account, BrokerError> {
        self.inner.get_account().await
    }

    async fn get_positions(&self) -> Result<Vec<Position>, BrokerError> {
        self.inner.get_positions().await
    }

    async fn submit_order(&self, request: OrderRequest) -> Result<Order, BrokerError> {
        let mut order = Order::from_request(&request);
        order.status = OrderStatus::Accepted;

        info!(
            symbol = %order.symbol,
            side = %order.side,
            qty = request.quantity,
            stop_price = ?order.stop_price,
            "dry run: order not sent"
        );

        self.orders
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(order.clone());

        Ok(order)
    }

    fn name(&self) -> &str {
        "Dry Run"
    }
}
