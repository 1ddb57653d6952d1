//! Moving average indicators.

use trading_core::traits::Indicator;

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Rolling mean aligned with `data`: one entry per input point, `None`
    /// until a full window is available.
    pub fn rolling(&self, data: &[f64]) -> MovingAverage {
        let warmup = data.len().min(self.period - 1);
        let mut values: Vec<Option<f64>> = vec![None; warmup];
        values.extend(self.calculate(data).into_iter().map(Some));
        MovingAverage {
            period: self.period,
            values,
        }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if self.validate_data(data).is_err() {
            return vec![];
        }

        let mut result = Vec::with_capacity(data.len() - self.period + 1);
        let period_f64 = self.period as f64;

        // Initial sum
        let mut sum: f64 = data[..self.period].iter().sum();
        result.push(sum / period_f64);

        // Sliding window
        for i in self.period..data.len() {
            sum = sum - data[i - self.period] + data[i];
            result.push(sum / period_f64);
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Moving-average values aligned bar-for-bar with the price series they
/// were computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverage {
    period: usize,
    values: Vec<Option<f64>>,
}

impl MovingAverage {
    /// Window length.
    pub fn period(&self) -> usize {
        self.period
    }

    /// Number of aligned points (equals the input length).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when computed over an empty input.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value `offset` bars back from the newest (0 = latest bar).
    /// `None` when out of range or still warming up.
    pub fn from_end(&self, offset: usize) -> Option<f64> {
        let idx = self.values.len().checked_sub(offset + 1)?;
        self.values[idx]
    }

    /// All aligned values.
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma() {
        let sma = Sma::new(3);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma.calculate(&data);

        assert_eq!(result.len(), 3);
        assert!((result[0] - 2.0).abs() < 1e-10); // (1+2+3)/3
        assert!((result[1] - 3.0).abs() < 1e-10); // (2+3+4)/3
        assert!((result[2] - 4.0).abs() < 1e-10); // (3+4+5)/3
    }

    #[test]
    fn test_sma_insufficient_data() {
        let sma = Sma::new(5);
        let data = vec![1.0, 2.0, 3.0];
        let result = sma.calculate(&data);

        assert!(result.is_empty());
    }

    #[test]
    fn test_rolling_alignment() {
        let ma = Sma::new(3).rolling(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(ma.len(), 5);
        assert_eq!(ma.values()[0], None);
        assert_eq!(ma.values()[1], None);
        assert!((ma.from_end(0).unwrap() - 4.0).abs() < 1e-10);
        assert!((ma.from_end(1).unwrap() - 3.0).abs() < 1e-10);
        assert!((ma.from_end(2).unwrap() - 2.0).abs() < 1e-10);
        assert_eq!(ma.from_end(3), None);
        assert_eq!(ma.from_end(10), None);
    }

    #[test]
    fn test_rolling_short_input_is_all_undefined() {
        let ma = Sma::new(50).rolling(&[100.0; 20]);

        assert_eq!(ma.len(), 20);
        assert!(ma.values().iter().all(Option::is_none));
        assert_eq!(ma.from_end(0), None);
    }

    #[test]
    fn test_rolling_empty_input() {
        let ma = Sma::new(10).rolling(&[]);
        assert!(ma.is_empty());
        assert_eq!(ma.from_end(0), None);
    }
}
