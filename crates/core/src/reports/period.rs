//! Month anchoring for ledger periods.
//!
//! The opening balance of a ledger is the closing balance of the month
//! before the anchor month, so rows always start on a month boundary unless
//! the caller asked for a later day within the anchor month.

use chrono::{Datelike, Months, NaiveDate};

use crate::ledger::LedgerError;

/// First day of `date`'s month.
#[must_use]
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month after `date`'s month.
#[must_use]
pub fn next_month_start(date: NaiveDate) -> NaiveDate {
    month_start(date)
        .checked_add_months(Months::new(1))
        .unwrap_or(NaiveDate::MAX)
}

/// Whether `date` is the last day of its month.
#[must_use]
pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    date.succ_opt().is_none_or(|next| next.month() != date.month())
}

/// Resolved period of a ledger query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerPeriod {
    /// Lines strictly before this date make up the opening balance.
    pub anchor: NaiveDate,
    /// First date of the row window.
    pub row_start: NaiveDate,
    /// Last date of the row window (inclusive).
    pub end: NaiveDate,
}

impl LedgerPeriod {
    /// Resolves the anchor and row window for `[start, end]`.
    ///
    /// The anchor is the first day of `start`'s month. When `start` is the
    /// last day of its month the anchor moves to the first of the next
    /// month and the row window starts there.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` when `start > end`.
    pub fn resolve(start: NaiveDate, end: Option<NaiveDate>) -> Result<Self, LedgerError> {
        let end = end.unwrap_or(NaiveDate::MAX);
        if start > end {
            return Err(LedgerError::InvalidDateRange { start, end });
        }

        if is_last_day_of_month(start) {
            let anchor = next_month_start(start);
            Ok(Self {
                anchor,
                row_start: anchor,
                end,
            })
        } else {
            Ok(Self {
                anchor: month_start(start),
                row_start: start,
                end,
            })
        }
    }

    /// Whether a line dated `date` is part of the opening balance.
    #[must_use]
    pub fn is_opening(&self, date: NaiveDate) -> bool {
        date < self.anchor
    }

    /// Whether a line dated `date` produces a row.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.row_start && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[rstest]
    #[case(d(2024, 1, 31), true)]
    #[case(d(2024, 2, 29), true)]
    #[case(d(2023, 2, 28), true)]
    #[case(d(2024, 2, 28), false)]
    #[case(d(2024, 12, 31), true)]
    #[case(d(2024, 3, 15), false)]
    fn test_last_day_of_month(#[case] date: NaiveDate, #[case] expected: bool) {
        assert_eq!(is_last_day_of_month(date), expected);
    }

    #[test]
    fn test_mid_month_start() {
        let period = LedgerPeriod::resolve(d(2024, 3, 15), Some(d(2024, 4, 30))).unwrap();
        assert_eq!(period.anchor, d(2024, 3, 1));
        assert_eq!(period.row_start, d(2024, 3, 15));
        assert!(period.is_opening(d(2024, 2, 29)));
        assert!(!period.is_opening(d(2024, 3, 1)));
        assert!(!period.contains(d(2024, 3, 10)));
        assert!(period.contains(d(2024, 4, 30)));
    }

    #[test]
    fn test_last_day_start_moves_anchor() {
        let period = LedgerPeriod::resolve(d(2024, 1, 31), Some(d(2024, 2, 29))).unwrap();
        assert_eq!(period.anchor, d(2024, 2, 1));
        assert_eq!(period.row_start, d(2024, 2, 1));
        assert!(period.is_opening(d(2024, 1, 31)));
    }

    #[test]
    fn test_december_rolls_year() {
        assert_eq!(next_month_start(d(2024, 12, 31)), d(2025, 1, 1));
        let period = LedgerPeriod::resolve(d(2024, 12, 31), None).unwrap();
        assert_eq!(period.anchor, d(2025, 1, 1));
        assert_eq!(period.end, NaiveDate::MAX);
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(matches!(
            LedgerPeriod::resolve(d(2024, 5, 1), Some(d(2024, 4, 1))),
            Err(LedgerError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_single_day_range() {
        let period = LedgerPeriod::resolve(d(2024, 5, 1), Some(d(2024, 5, 1))).unwrap();
        assert!(period.contains(d(2024, 5, 1)));
        assert!(!period.contains(d(2024, 5, 2)));
    }
}
