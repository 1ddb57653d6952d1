//! Broker trait definition.

use crate::error::BrokerError;
use crate::types::{Account, Order, OrderRequest, Position};
use async_trait::async_trait;
use std::collections::HashSet;

/// Trait for brokerage sessions.
///
/// A broker reports the account balance and open positions and accepts new
/// orders. Implementations are expected to be already authenticated.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Get account balances.
    async fn get_account(&self) -> Result<Account, BrokerError>;

    /// Get all open positions.
    async fn get_positions(&self) -> Result<Vec<Position>, BrokerError>;

    /// Submit a new order.
    ///
    /// # Arguments
    /// * `request` - The order request to submit
    ///
    /// # Returns
    /// The order as acknowledged by the broker
    async fn submit_order(&self, request: OrderRequest) -> Result<Order, BrokerError>;

    /// Symbols with an open position.
    async fn held_symbols(&self) -> Result<HashSet<String>, BrokerError> {
        let positions = self.get_positions().await?;
        Ok(positions.into_iter().map(|p| p.symbol).collect())
    }

    /// Get the broker name.
    fn name(&self) -> &str;
}
