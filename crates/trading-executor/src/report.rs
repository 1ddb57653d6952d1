//! Per-symbol outcomes and the run report.

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// What happened to one symbol during a run. Exactly one per symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SymbolOutcome {
    Bought {
        qty: u64,
        price: Decimal,
        stop_price: Decimal,
        order_id: Uuid,
    },
    AlreadyHeld,
    NoSignal,
    NoData,
    InsufficientCapital,
    Errored {
        reason: String,
    },
}

impl SymbolOutcome {
    /// Short machine-readable name, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            SymbolOutcome::Bought { .. } => "bought",
            SymbolOutcome::AlreadyHeld => "already_held",
            SymbolOutcome::NoSignal => "no_signal",
            SymbolOutcome::NoData => "no_data",
            SymbolOutcome::InsufficientCapital => "insufficient_capital",
            SymbolOutcome::Errored { .. } => "errored",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SymbolOutcome::Errored { .. })
    }
}

/// One journal entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolReport {
    pub symbol: String,
    #[serde(flatten)]
    pub outcome: SymbolOutcome,
}

impl fmt::Display for SymbolReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = &self.symbol;
        match &self.outcome {
            SymbolOutcome::Bought { qty, price, .. } => {
                let price = price.round_dp(2);
                write!(f, "Bought {} shares of {} at ${:.2}", qty, symbol, price)
            }
            SymbolOutcome::AlreadyHeld => write!(f, "Position already open for {}", symbol),
            SymbolOutcome::NoSignal => write!(f, "No buying opportunity for {}", symbol),
            SymbolOutcome::NoData => write!(f, "No data today for {}", symbol),
            SymbolOutcome::InsufficientCapital => {
                write!(f, "Insufficient capital to buy {}", symbol)
            }
            SymbolOutcome::Errored { reason } => write!(f, "Error on {} : {}", symbol, reason),
        }
    }
}

/// Ordered outcomes of one pass over the symbol list.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub capital: Decimal,
    pub risk_level: Decimal,
    pub entries: Vec<SymbolReport>,
}

impl RunReport {
    pub fn new(capital: Decimal, risk_level: Decimal) -> Self {
        Self {
            capital,
            risk_level,
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, symbol: impl Into<String>, outcome: SymbolOutcome) {
        self.entries.push(SymbolReport {
            symbol: symbol.into(),
            outcome,
        });
    }

    /// Human-readable journal lines, in processing order.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.to_string()).collect()
    }

    pub fn orders_submitted(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, SymbolOutcome::Bought { .. }))
            .count()
    }

    pub fn errors(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_error()).count()
    }

    pub fn outcome_for(&self, symbol: &str) -> Option<&SymbolOutcome> {
        self.entries
            .iter()
            .find(|e| e.symbol == symbol)
            .map(|e| &e.outcome)
    }
}
