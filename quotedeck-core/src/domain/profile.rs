//! Company-level metrics shown next to the price history.

use serde::{Deserialize, Serialize};

/// Headline metrics for a symbol. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub trailing_pe: Option<f64>,
    /// Fraction, e.g. `0.0051` for 0.51%.
    pub dividend_yield: Option<f64>,
}
