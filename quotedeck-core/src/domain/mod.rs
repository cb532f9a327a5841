//! Domain types for QuoteDeck

pub mod bar;
pub mod interval;
pub mod profile;
pub mod range;

pub use bar::{PriceBar, PriceColumn, PriceSeries};
pub use interval::SamplingInterval;
pub use profile::CompanyProfile;
pub use range::{parse_date, DateRange};

use thiserror::Error;

/// Rejected user input (dates, interval tokens).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("invalid interval '{0}' (expected 1d, 1wk or 1mo)")]
    InvalidInterval(String),
}
