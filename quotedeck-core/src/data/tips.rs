//! The restaurant tips dataset behind the static chart panel.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::table::{TableError, UploadedTable};

pub const TIPS_URL: &str = "https://raw.githubusercontent.com/mwaskom/seaborn-data/master/tips.csv";

/// Where the tips dataset is read from.
///
/// A value starting with `http://` or `https://` is downloaded, anything
/// else is treated as a local path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TipsSource {
    Url(String),
    File(PathBuf),
}

impl Default for TipsSource {
    fn default() -> Self {
        Self::Url(TIPS_URL.to_string())
    }
}

impl From<String> for TipsSource {
    fn from(value: String) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value)
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

impl From<TipsSource> for String {
    fn from(value: TipsSource) -> Self {
        match value {
            TipsSource::Url(url) => url,
            TipsSource::File(path) => path.display().to_string(),
        }
    }
}

impl TipsSource {
    pub fn load(&self) -> Result<UploadedTable, TableError> {
        match self {
            Self::File(path) => UploadedTable::from_path(path),
            Self::Url(url) => {
                tracing::info!(%url, "downloading tips dataset");
                let client = reqwest::blocking::Client::builder()
                    .timeout(Duration::from_secs(30))
                    .build()
                    .map_err(|e| TableError::Download(e.to_string()))?;
                let resp = client
                    .get(url)
                    .send()
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| TableError::Download(e.to_string()))?;
                let bytes = resp
                    .bytes()
                    .map_err(|e| TableError::Download(e.to_string()))?;
                UploadedTable::from_bytes("tips.csv", bytes.to_vec())
            }
        }
    }
}
