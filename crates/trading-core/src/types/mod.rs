//! Core data types for the trading assistant.

mod lookback;
mod ohlcv;
mod order;
mod position;

pub use lookback::Lookback;
pub use ohlcv::{Bar, BarSeries};
pub use order::{
    Order, OrderClass, OrderRequest, OrderStatus, OrderType, Side, StopLoss, TimeInForce,
};
pub use position::{Account, Position};
