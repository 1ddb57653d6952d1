//! Entry signal for the trading assistant.
//!
//! The crossover detector is pure: it looks at a slice of closes and says
//! whether the fast average overtook the slow one on the newest bar. The
//! evaluator wraps it with a market-data fetch.

mod evaluator;
mod ma_crossover;

pub use evaluator::SignalEvaluator;
pub use ma_crossover::{CrossoverConfig, CrossoverReading, MACrossover};
