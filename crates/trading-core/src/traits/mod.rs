//! Core traits for the trading assistant.

mod broker;
mod indicator;
mod market_data;

pub use broker::Broker;
pub use indicator::Indicator;
pub use market_data::MarketData;
