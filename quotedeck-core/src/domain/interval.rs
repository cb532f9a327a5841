//! Sampling interval for price history requests.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// How far apart consecutive rows of a price series are.
///
/// The wire tokens (`1d`, `1wk`, `1mo`) are the ones the chart endpoint
/// accepts as its `interval` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SamplingInterval {
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "1wk")]
    Weekly,
    #[default]
    #[serde(rename = "1mo")]
    Monthly,
}

impl SamplingInterval {
    pub const ALL: [Self; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Weekly => "1wk",
            Self::Monthly => "1mo",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Next interval in selector order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Daily => Self::Weekly,
            Self::Weekly => Self::Monthly,
            Self::Monthly => Self::Daily,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Daily => Self::Monthly,
            Self::Weekly => Self::Daily,
            Self::Monthly => Self::Weekly,
        }
    }
}

impl Display for SamplingInterval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SamplingInterval {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1d" | "daily" => Ok(Self::Daily),
            "1wk" | "weekly" => Ok(Self::Weekly),
            "1mo" | "monthly" => Ok(Self::Monthly),
            other => Err(DomainError::InvalidInterval(other.to_owned())),
        }
    }
}
