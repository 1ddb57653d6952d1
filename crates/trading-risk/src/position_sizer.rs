//! Position sizing.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use trading_core::error::TradingError;

/// User-chosen aggressiveness in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct RiskLevel(Decimal);

impl RiskLevel {
    pub const MIN: RiskLevel = RiskLevel(Decimal::ZERO);
    pub const MAX: RiskLevel = RiskLevel(Decimal::ONE);

    /// Create a risk level, rejecting values outside `[0, 1]`.
    pub fn new(value: Decimal) -> Result<Self, TradingError> {
        if value < Decimal::ZERO || value > Decimal::ONE {
            return Err(TradingError::Validation(format!(
                "risk level must be between 0 and 1, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl Default for RiskLevel {
    fn default() -> Self {
        RiskLevel(dec!(0.3))
    }
}

impl TryFrom<f64> for RiskLevel {
    type Error = TradingError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let decimal = Decimal::try_from(value).map_err(|_| {
            TradingError::Validation(format!("risk level must be a finite number, got {}", value))
        })?;
        Self::new(decimal)
    }
}

impl From<RiskLevel> for f64 {
    fn from(level: RiskLevel) -> Self {
        level.0.to_f64().unwrap_or_default()
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sizes entries as a slice of available cash that grows linearly with the
/// risk level: `base_fraction` at 0, `base_fraction + risk_fraction` at 1.
#[derive(Debug, Clone)]
pub struct PositionSizer {
    base_fraction: Decimal,
    risk_fraction: Decimal,
}

impl Default for PositionSizer {
    fn default() -> Self {
        Self {
            base_fraction: dec!(0.01),
            risk_fraction: dec!(0.04),
        }
    }
}

impl PositionSizer {
    /// Fraction of capital committed at `risk`.
    pub fn allocation_fraction(&self, risk: RiskLevel) -> Decimal {
        self.base_fraction + risk.value() * self.risk_fraction
    }

    /// Whole shares affordable with the allocated cash, rounded down.
    ///
    /// Returns 0 when the allocation does not cover a single share or when
    /// the price is not positive.
    pub fn compute_qty(&self, price: Decimal, capital: Decimal, risk: RiskLevel) -> u64 {
        if price <= Decimal::ZERO || capital <= Decimal::ZERO {
            return 0;
        }

        capital
            .checked_mul(self.allocation_fraction(risk))
            .and_then(|budget| budget.checked_div(price))
            .and_then(|shares| shares.floor().to_u64())
            .unwrap_or(0)
    }
}

/// Size a position with the default 1%-5% allocation band.
pub fn compute_qty(price: Decimal, capital: Decimal, risk: RiskLevel) -> u64 {
    PositionSizer::default().compute_qty(price, capital, risk)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn risk(value: Decimal) -> RiskLevel {
        RiskLevel::new(value).unwrap()
    }

    #[test]
    fn test_lowest_risk_allocates_one_percent() {
        // floor(10000 * 0.01 / 100)
        assert_eq!(compute_qty(dec!(100), dec!(10000), RiskLevel::MIN), 1);
    }

    #[test]
    fn test_highest_risk_allocates_five_percent() {
        // floor(10000 * 0.05 / 100)
        assert_eq!(compute_qty(dec!(100), dec!(10000), RiskLevel::MAX), 5);
    }

    #[test]
    fn test_insufficient_capital_yields_zero() {
        assert_eq!(compute_qty(dec!(1000000), dec!(100), risk(dec!(0.5))), 0);
    }

    #[test]
    fn test_rounds_down() {
        // 0.01 + 0.3 * 0.04 = 0.022; 25000 * 0.022 = 550; 550 / 187.32 = 2.93
        assert_eq!(compute_qty(dec!(187.32), dec!(25000), RiskLevel::default()), 2);
    }

    #[test]
    fn test_allocation_fraction_is_linear() {
        let sizer = PositionSizer::default();
        assert_eq!(sizer.allocation_fraction(RiskLevel::MIN), dec!(0.01));
        assert_eq!(sizer.allocation_fraction(risk(dec!(0.5))), dec!(0.03));
        assert_eq!(sizer.allocation_fraction(RiskLevel::MAX), dec!(0.05));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(compute_qty(Decimal::ZERO, dec!(10000), RiskLevel::MAX), 0);
        assert_eq!(compute_qty(dec!(-5), dec!(10000), RiskLevel::MAX), 0);
        assert_eq!(compute_qty(dec!(100), Decimal::ZERO, RiskLevel::MAX), 0);
        assert_eq!(compute_qty(dec!(100), dec!(-10000), RiskLevel::MAX), 0);
    }

    #[test]
    fn test_same_inputs_same_output() {
        let sizer = PositionSizer::default();
        let first = sizer.compute_qty(dec!(42.17), dec!(98765.43), risk(dec!(0.7)));
        for _ in 0..10 {
            assert_eq!(sizer.compute_qty(dec!(42.17), dec!(98765.43), risk(dec!(0.7))), first);
        }
    }

    #[test]
    fn test_risk_level_bounds() {
        assert!(RiskLevel::new(dec!(-0.1)).is_err());
        assert!(RiskLevel::new(dec!(1.1)).is_err());
        assert!(RiskLevel::try_from(f64::NAN).is_err());
        assert_eq!(RiskLevel::try_from(0.3).unwrap(), RiskLevel::default());
    }

    #[test]
    fn test_risk_level_serde() {
        let level: RiskLevel = serde_json::from_str("0.7").unwrap();
        assert_eq!(level.value(), dec!(0.7));
        assert!(serde_json::from_str::<RiskLevel>("1.5").is_err());
    }
}
