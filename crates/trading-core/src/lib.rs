//! Core types and traits for the crossover trading assistant.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries, Lookback)
//! - Order, position and account types
//! - Capability traits for brokers, market-data sources and indicators

pub mod types;
pub mod traits;
pub mod error;

pub use error::TradingError;
pub use types::*;
pub use traits::*;
