//! Dashboard configuration: TOML file with every field optional.
//!
//! Lookup order: explicit `--config` path, then
//! `<config dir>/quotedeck/config.toml`, then built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::TipsSource;
use crate::domain::SamplingInterval;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Everything the dashboard needs that is not picked interactively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Ticker shown by the market panel.
    pub symbol: String,
    /// Initial start date; the initial end date is today.
    pub default_start: NaiveDate,
    pub default_interval: SamplingInterval,
    /// Max distinct queries kept in the memo cache.
    pub cache_capacity: usize,
    /// Seconds a cached query stays valid.
    pub cache_ttl_secs: u64,
    pub tips_source: TipsSource,
    /// Directory PNG exports are written to.
    pub export_dir: PathBuf,
    /// Directory the TUI writes its log file to.
    pub log_dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            symbol: "AAPL".to_string(),
            default_start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            default_interval: SamplingInterval::Monthly,
            cache_capacity: 16,
            cache_ttl_secs: 15 * 60,
            tips_source: TipsSource::default(),
            export_dir: PathBuf::from("."),
            log_dir: None,
        }
    }
}

impl DashboardConfig {
    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string; missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// An explicit path must exist; the default location may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Configured log directory, else the config directory, else `.`.
    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .or_else(|| dirs::config_dir().map(|d| d.join("quotedeck")))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// `<config dir>/quotedeck/config.toml`, when the platform has a config dir.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("quotedeck").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = DashboardConfig::from_toml("").unwrap();
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.symbol, "AAPL");
        assert_eq!(cfg.default_interval, SamplingInterval::Monthly);
    }

    #[test]
    fn partial_toml_overrides_fields() {
        let cfg = DashboardConfig::from_toml(
            r#"
            symbol = "MSFT"
            default_start = "2019-06-01"
            default_interval = "1wk"
            cache_ttl_secs = 60
            tips_source = "fixtures/tips.csv"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.symbol, "MSFT");
        assert_eq!(cfg.default_start, NaiveDate::from_ymd_opt(2019, 6, 1).unwrap());
        assert_eq!(cfg.default_interval, SamplingInterval::Weekly);
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(60));
        assert_eq!(cfg.tips_source, TipsSource::File(PathBuf::from("fixtures/tips.csv")));
        assert_eq!(cfg.cache_capacity, 16);
    }

    #[test]
    fn bad_toml_is_reported() {
        let err = DashboardConfig::from_toml("cache_capacity = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = DashboardConfig::load(Some(Path::new("/nonexistent/quotedeck.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
