//! Position and account types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An open holding reported by the broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Symbol
    pub symbol: String,
    /// Number of shares (positive for long, negative for short)
    pub quantity: Decimal,
    /// Average entry price
    pub avg_entry_price: Decimal,
    /// Current market price
    pub current_price: Decimal,
    /// Market value (quantity * current_price)
    pub market_value: Decimal,
    /// Unrealized profit/loss
    pub unrealized_pnl: Decimal,
}

impl Position {
    /// Create a new position marked at its entry price.
    pub fn new(symbol: impl Into<String>, quantity: Decimal, avg_entry_price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            avg_entry_price,
            current_price: avg_entry_price,
            market_value: quantity * avg_entry_price,
            unrealized_pnl: Decimal::ZERO,
        }
    }

    /// Check if this is a long position.
    pub fn is_long(&self) -> bool {
        self.quantity > Decimal::ZERO
    }
}

/// Account balances at session start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Available cash
    pub cash: Decimal,
    /// Buying power (may be different from cash due to margin)
    pub buying_power: Decimal,
    /// Total equity (cash + market value of positions)
    pub equity: Decimal,
}

impl Account {
    /// Create an account holding only cash.
    pub fn new(cash: Decimal) -> Self {
        Self {
            cash,
            buying_power: cash,
            equity: cash,
        }
    }
}
