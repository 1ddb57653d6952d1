//! Risk management for trading.
//!
//! Turns a risk level into a share count and an entry price into a
//! protective stop.

mod position_sizer;
mod stop_loss;

pub use position_sizer::{compute_qty, PositionSizer, RiskLevel};
pub use stop_loss::StopLossManager;
