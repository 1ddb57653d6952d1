//! Technical indicators.
//!
//! Provides the simple moving average used by the crossover signal, both as
//! a compact tail-aligned vector and as a series aligned bar-for-bar with
//! its input.

pub mod moving_average;

pub use moving_average::{MovingAverage, Sma};
