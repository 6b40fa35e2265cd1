//! Calendar quarter bucketing for payment dates.

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;

/// A calendar quarter. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FiscalQuarter {
    pub year:    i32,
    pub quarter: u8,
}

impl FiscalQuarter {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year:    date.year(),
            quarter: ((date.month() - 1) / 3 + 1) as u8,
        }
    }

    /// Last calendar day of the quarter (Mar 31, Jun 30, Sep 30, Dec 31).
    pub fn end_date(&self) -> NaiveDate {
        let (month, day) = match self.quarter {
            1 => (3, 31),
            2 => (6, 30),
            3 => (9, 30),
            _ => (12, 31),
        };
        NaiveDate::from_ymd_opt(self.year, month, day)
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for FiscalQuarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-Q{}", self.year, self.quarter)
    }
}

impl Serialize for FiscalQuarter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn quarter_boundaries_follow_calendar() {
        assert_eq!(FiscalQuarter::from_date(d(2025, 1, 1)).quarter, 1);
        assert_eq!(FiscalQuarter::from_date(d(2025, 3, 31)).quarter, 1);
        assert_eq!(FiscalQuarter::from_date(d(2025, 4, 1)).quarter, 2);
        assert_eq!(FiscalQuarter::from_date(d(2025, 9, 30)).quarter, 3);
        assert_eq!(FiscalQuarter::from_date(d(2025, 12, 31)).quarter, 4);
    }

    #[test]
    fn label_and_end_date() {
        let q = FiscalQuarter::from_date(d(2025, 8, 14));
        assert_eq!(q.to_string(), "2025-Q3");
        assert_eq!(q.end_date(), d(2025, 9, 30));
    }

    #[test]
    fn orders_by_year_then_quarter() {
        let a = FiscalQuarter { year: 2024, quarter: 4 };
        let b = FiscalQuarter { year: 2025, quarter: 1 };
        assert!(a < b);
    }
}
