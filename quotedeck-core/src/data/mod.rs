//! Data acquisition: providers, memoization, bundled datasets

pub mod memo;
pub mod provider;
pub mod tips;
pub mod yahoo;

pub use memo::{MemoCache, MemoStats};
pub use provider::{DataError, MarketDataProvider, MarketQuery};
pub use tips::TipsSource;
pub use yahoo::YahooProvider;
