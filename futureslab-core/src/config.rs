//! TOML configuration.
//!
//! Every field has a default, so an empty file (or no file at all) is a
//! valid configuration:
//!
//! ```toml
//! export_dir = "exports"
//!
//! [provider]
//! base_url = "https://query2.finance.yahoo.com"
//! timeout_secs = 30
//! curve_months = 36
//!
//! [chart]
//! width = 0    # 0 = fit to terminal
//! height = 0
//!
//! [historical]
//! lookback_days = 1095
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuturesLabConfig {
    /// Directory export artifacts are written to.
    pub export_dir: PathBuf,
    /// Replacement reference table CSV; the embedded table is used when unset.
    pub reference_csv: Option<PathBuf>,
    pub provider: ProviderSettings,
    pub chart: ChartSettings,
    pub historical: HistoricalSettings,
}

impl Default for FuturesLabConfig {
    fn default() -> Self {
        Self {
            export_dir: PathBuf::from("exports"),
            reference_csv: None,
            provider: ProviderSettings::default(),
            chart: ChartSettings::default(),
            historical: HistoricalSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Number of monthly contracts probed when building a curve.
    pub curve_months: u32,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://query2.finance.yahoo.com".into(),
            timeout_secs: 30,
            curve_months: 36,
        }
    }
}

/// Standalone chart size in terminal cells. Zero means "fit to terminal".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoricalSettings {
    /// Default distance of the start date from today.
    pub lookback_days: i64,
}

impl Default for HistoricalSettings {
    fn default() -> Self {
        Self {
            lookback_days: 3 * 365,
        }
    }
}

impl FuturesLabConfig {
    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            log::debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::Invalid("provider.timeout_secs must be > 0".into()));
        }
        if self.provider.curve_months == 0 {
            return Err(ConfigError::Invalid("provider.curve_months must be > 0".into()));
        }
        if self.historical.lookback_days < 0 {
            return Err(ConfigError::Invalid(
                "historical.lookback_days must not be negative".into(),
            ));
        }
        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("provider.base_url must not be empty".into()));
        }
        Ok(())
    }
}
