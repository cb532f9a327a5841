//! The dashboard's three flows: market data, the tips chart, upload-and-plot.

pub mod datasets;
pub mod market;

pub use datasets::{
    PlotOutcome, TipsFlow, TipsOutcome, TipsReport, UploadSession, DATASET_PREVIEW_ROWS,
    TIPS_EXPORT_NAME, TIPS_TITLE,
};
pub use market::{
    failure_message, MarketFlow, MarketOutcome, MarketReport, ProfileOutcome, EMPTY_WARNING,
    PREVIEW_ROWS,
};
