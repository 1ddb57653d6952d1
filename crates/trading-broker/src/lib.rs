//! Broker integrations.

mod alpaca;
mod dry_run;

pub use alpaca::{AlpacaBroker, AlpacaConfig, TradingMode};
pub use dry_run::DryRunBroker;
