//! Settings for detection and display
//!
//! ## Configuration Resolution
//!
//! Settings are loaded with a two-layer resolution:
//! 1. Check for an override file (explicit path, or ~/.config/allot/config.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::detect::DEFAULT_VARIANCE;
use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/allot.toml");

/// Recurring detection settings
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    /// Relative amount tolerance; zero or less groups by exact amount
    pub variance: f64,
    /// Calendar months of history to consider
    pub lookback_months: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            variance: DEFAULT_VARIANCE,
            lookback_months: 2,
        }
    }
}

/// All Allot settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub detection: DetectionConfig,
    /// Prefix for amounts in CLI output
    pub currency_symbol: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            currency_symbol: "$".to_string(),
        }
    }
}

impl Settings {
    /// Load from `path` if it exists, else the user config dir, else embedded defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let override_path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path(),
        };

        let content = match override_path {
            Some(ref p) if p.exists() => {
                debug!("Loading settings from {}", p.display());
                fs::read_to_string(p)
                    .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
            }
            _ => DEFAULT_CONFIG.to_string(),
        };

        parse_config(&content)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("allot").join("config.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    detection: Option<RawDetection>,
    display: Option<RawDisplay>,
}

#[derive(Debug, Deserialize)]
struct RawDetection {
    variance: Option<f64>,
    lookback_months: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawDisplay {
    currency_symbol: Option<String>,
}

/// Parse settings from TOML content
pub fn parse_config(content: &str) -> Result<Settings> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut settings = Settings::default();

    if let Some(detection) = raw.detection {
        if let Some(variance) = detection.variance {
            if !variance.is_finite() || variance < 0.0 {
                return Err(Error::Config(format!(
                    "detection.variance must be a non-negative number, got {}",
                    variance
                )));
            }
            settings.detection.variance = variance;
        }
        if let Some(months) = detection.lookback_months {
            settings.detection.lookback_months = months;
        }
    }

    if let Some(display) = raw.display {
        if let Some(symbol) = display.currency_symbol {
            settings.currency_symbol = symbol;
        }
    }

    Ok(settings)
}
