//! Review configuration
//!
//! Read from an explicit `--config` path, else from
//! `$OPENQA_REVIEW_CONFIG_DIR/config.toml`, else from the user's config
//! directory. A missing file means defaults.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use crate::bail_invalid;
use crate::error::{ReviewError, Result};

pub use types::{AggregationConfig, AggregationMode, ReviewConfig, SimilarityConfig, StatusConfig};

const CONFIG_DIR: &str = "openqa-review";
const CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR_ENV_VAR: &str = "OPENQA_REVIEW_CONFIG_DIR";

impl ReviewConfig {
    /// Default location of the user configuration file
    pub fn default_path() -> Result<PathBuf> {
        // Allow environment variable override for testing
        let config_dir = if let Ok(env_dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
            PathBuf::from(env_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| {
                    ReviewError::Other("unable to determine config directory".to_string())
                })?
                .join(CONFIG_DIR)
        };

        Ok(config_dir.join(CONFIG_FILE))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ReviewError::io_operation("read config", path.display(), e))?;
        let config: ReviewConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `explicit` if given, else the default location, else defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let path = Self::default_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ReviewError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)
            .map_err(|e| ReviewError::io_operation("write config", path.display(), e))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            (
                "similarity.module_rename_threshold",
                self.similarity.module_rename_threshold,
            ),
            (
                "similarity.needle_rename_threshold",
                self.similarity.needle_rename_threshold,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail_invalid!(name, value);
            }
        }

        if self.aggregation.min_variants == 0 {
            bail_invalid!("aggregation.min_variants", 0);
        }

        if self.status.green_known_issues > self.status.amber_known_issues {
            bail_invalid!(
                "status.green_known_issues",
                format!(
                    "{} exceeds amber_known_issues {}",
                    self.status.green_known_issues, self.status.amber_known_issues
                )
            );
        }

        Ok(())
    }
}
