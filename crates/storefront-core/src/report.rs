//! # Report Windows
//!
//! The time window a sales report covers.
//!
//! ## Window Selection
//! ```text
//! startDate   endDate     →  window
//! ─────────   ─────────      ──────────────────────────────
//! absent      absent         Today
//! ""          ""             Today
//! 2026-03-01  absent         Today      (both-or-neither)
//! 2026-03-01  2026-03-31     Range(2026-03-01 ..= 2026-03-31)
//! 2026-03-31  2026-03-01     ValidationError::InvalidDateRange
//! ```
//!
//! "Today" carries no date on purpose: it is resolved by the store's clock
//! at query time, the same clock that stamped the orders.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::validation::ValidationResult;
use crate::REPORT_DATE_FORMAT;

/// An inclusive range of calendar dates with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Builds a range, rejecting one whose end precedes its start.
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use storefront_core::DateRange;
    ///
    /// let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
    /// assert!(DateRange::new(start, end).is_ok());
    /// assert!(DateRange::new(end, start).is_err());
    /// ```
    pub fn new(start: NaiveDate, end: NaiveDate) -> ValidationResult<Self> {
        if end < start {
            return Err(ValidationError::InvalidDateRange { start, end });
        }
        Ok(DateRange { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// The window a report is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportWindow {
    /// The current day according to the store's clock.
    Today,
    /// An explicit inclusive date range.
    Range(DateRange),
}

impl ReportWindow {
    /// Picks the window from optional query parameters.
    ///
    /// Both dates present and non-blank select a range; anything else
    /// selects today. A malformed date or an inverted range is an error.
    pub fn from_params(start: Option<&str>, end: Option<&str>) -> ValidationResult<Self> {
        let start = start.map(str::trim).filter(|s| !s.is_empty());
        let end = end.map(str::trim).filter(|s| !s.is_empty());

        match (start, end) {
            (Some(start), Some(end)) => {
                let start = parse_report_date("startDate", start)?;
                let end = parse_report_date("endDate", end)?;
                Ok(ReportWindow::Range(DateRange::new(start, end)?))
            }
            _ => Ok(ReportWindow::Today),
        }
    }
}

impl fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportWindow::Today => write!(f, "today"),
            ReportWindow::Range(range) => write!(f, "{}", range),
        }
    }
}

/// Parses a `YYYY-MM-DD` date for the named field.
pub fn parse_report_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value, REPORT_DATE_FORMAT).map_err(|e| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("expected YYYY-MM-DD ({})", e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        let err = DateRange::new(date(2026, 3, 10), date(2026, 3, 1)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_range_accepts_single_day() {
        let range = DateRange::new(date(2026, 3, 1), date(2026, 3, 1)).unwrap();
        assert_eq!(range.start(), range.end());
        assert_eq!(range.to_string(), "2026-03-01..=2026-03-01");
    }

    #[test]
    fn test_window_defaults_to_today() {
        assert_eq!(ReportWindow::from_params(None, None).unwrap(), ReportWindow::Today);
        assert_eq!(
            ReportWindow::from_params(Some(""), Some("  ")).unwrap(),
            ReportWindow::Today
        );
        assert_eq!(
            ReportWindow::from_params(Some("2026-03-01"), None).unwrap(),
            ReportWindow::Today
        );
        assert_eq!(
            ReportWindow::from_params(None, Some("2026-03-01")).unwrap(),
            ReportWindow::Today
        );
    }

    #[test]
    fn test_window_range_from_params() {
        let window = ReportWindow::from_params(Some("2026-03-01"), Some("2026-03-31")).unwrap();
        match window {
            ReportWindow::Range(range) => {
                assert_eq!(range.start(), date(2026, 3, 1));
                assert_eq!(range.end(), date(2026, 3, 31));
            }
            ReportWindow::Today => panic!("expected a range"),
        }
    }

    #[test]
    fn test_window_rejects_bad_input() {
        let err = ReportWindow::from_params(Some("2026/03/01"), Some("2026-03-31")).unwrap_err();
        match err {
            ValidationError::InvalidFormat { field, .. } => assert_eq!(field, "startDate"),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = ReportWindow::from_params(Some("2026-03-31"), Some("2026-03-01")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDateRange { .. }));
    }
}
