//! Calendar date range for price history requests.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::DomainError;

/// Inclusive start, exclusive end (the provider's convention).
///
/// `start <= end` is not checked: an inverted range is
/// forwarded to the provider as-is and whatever it returns is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parse a pair of `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, DomainError> {
        Ok(Self {
            start: parse_date(start)?,
            end: parse_date(end)?,
        })
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Shift the start date by whole days.
    pub fn shift_start(&mut self, days: i64) {
        self.start = shift(self.start, days);
    }

    /// Shift the end date by whole days.
    pub fn shift_end(&mut self, days: i64) {
        self.end = shift(self.end, days);
    }
}

/// Parse a single `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| DomainError::InvalidDate(value.trim().to_owned()))
}

fn shift(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}
