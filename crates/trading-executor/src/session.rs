//! Session bootstrap.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;
use trading_core::error::BrokerError;
use trading_core::traits::Broker;
use trading_core::types::Account;

/// Failures that abort a run before any order is placed.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("could not read account: {0}")]
    Account(#[source] BrokerError),

    #[error("could not read open positions: {0}")]
    Positions(#[source] BrokerError),
}

impl RunError {
    /// Whether the broker refused the credentials.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            RunError::Account(BrokerError::AuthenticationError(_))
                | RunError::Positions(BrokerError::AuthenticationError(_))
        )
    }
}

/// An authenticated session with the capital read once at startup.
#[derive(Debug, Clone)]
pub struct Session {
    account: Account,
}

impl Session {
    /// Read the account. Any failure here means the credentials or the
    /// endpoint are unusable.
    pub async fn open<B: Broker + ?Sized>(broker: &B) -> Result<Self, RunError> {
        let account = broker.get_account().await.map_err(RunError::Account)?;
        info!(broker = broker.name(), cash = %account.cash, "session opened");
        Ok(Self { account })
    }

    /// Available cash; the sizing base for the whole run.
    pub fn capital(&self) -> Decimal {
        self.account.cash
    }

    pub fn account(&self) -> &Account {
        &self.account
    }
}
