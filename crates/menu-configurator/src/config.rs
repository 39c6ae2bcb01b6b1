//! Engine configuration.

use std::path::Path;

use menu_commerce::{CommerceError, Currency};
use menu_observability::{LogFormat, LogLevel, SessionLogger};
use serde::{Deserialize, Serialize};

/// Configuration for the configurator engine.
///
/// Every section falls back to its defaults, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Currency every catalog price must be expressed in.
    #[serde(default)]
    pub currency: Currency,

    /// Upper bound for the per-line quantity stepper.
    #[serde(default = "default_max_quantity")]
    pub max_quantity_per_item: u32,

    /// Half-and-half configuration.
    #[serde(default)]
    pub split: SplitConfig,

    /// Session logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_max_quantity() -> u32 {
    99
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            max_quantity_per_item: default_max_quantity(),
            split: SplitConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load config from a TOML or JSON file, chosen by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CommerceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CommerceError::ConfigError(format!("failed to read {}: {}", path.display(), e))
        })?;

        let parsed = if path.extension().map(|e| e == "json").unwrap_or(false) {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        };
        parsed.map_err(|e| match e {
            CommerceError::ConfigError(reason) => {
                CommerceError::ConfigError(format!("{}: {}", path.display(), reason))
            }
            other => other,
        })
    }

    /// Parse config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, CommerceError> {
        let config: Self =
            toml::from_str(content).map_err(|e| CommerceError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse config from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self, CommerceError> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| CommerceError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.max_quantity_per_item == 0 {
            return Err(CommerceError::ConfigError(
                "max_quantity_per_item must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Build a session logger honoring the logging section.
    pub fn session_logger(&self, session_id: impl Into<String>) -> SessionLogger {
        SessionLogger::new(session_id)
            .with_min_level(self.logging.level)
            .with_format(self.logging.format)
    }
}

/// Which categories offer half-and-half items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Case-insensitive keywords matched against the category name.
    #[serde(default = "default_split_categories")]
    pub categories: Vec<String>,
}

fn default_split_categories() -> Vec<String> {
    vec!["pizza".to_string()]
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            categories: default_split_categories(),
        }
    }
}

/// Session logging configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default)]
    pub format: LogFormat,
}
