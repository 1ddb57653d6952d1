//! History window definitions for market-data requests.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How far back a daily-history request reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lookback {
    /// Calendar days
    Days(u32),
    /// Calendar months
    Months(u32),
}

impl Lookback {
    /// Window used to evaluate the crossover signal.
    pub const SIGNAL: Lookback = Lookback::Months(6);

    /// Window used to read the execution price.
    pub const LATEST: Lookback = Lookback::Days(1);

    /// Start of the window measured back from `end`.
    pub fn start_from(&self, end: DateTime<Utc>) -> DateTime<Utc> {
        match *self {
            Lookback::Days(days) => end - Duration::days(i64::from(days)),
            Lookback::Months(months) => end
                .checked_sub_months(Months::new(months))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        }
    }

    /// Range parameter understood by the Yahoo chart API.
    pub fn as_range(&self) -> String {
        match self {
            Lookback::Days(days) => format!("{}d", days),
            Lookback::Months(months) => format!("{}mo", months),
        }
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_lookback_range() {
        assert_eq!(Lookback::SIGNAL.as_range(), "6mo");
        assert_eq!(Lookback::LATEST.as_range(), "1d");
        assert_eq!(Lookback::Days(5).to_string(), "5d");
    }

    #[test]
    fn test_lookback_start() {
        let end = Utc.with_ymd_and_hms(2024, 7, 15, 0, 0, 0).unwrap();

        assert_eq!(
            Lookback::SIGNAL.start_from(end),
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
        );
        assert_eq!(
            Lookback::LATEST.start_from(end),
            Utc.with_ymd_and_hms(2024, 7, 14, 0, 0, 0).unwrap()
        );
    }
}
