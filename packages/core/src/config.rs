//! Import configuration
//!
//! Runtime settings for the seed CLI and host applications: where the
//! catalog database lives, which feed files to import, and whether runs
//! skip feeds the store already reflects.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for batch seed imports
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportConfig {
    /// Path of the catalog database file
    pub database_path: PathBuf,

    /// CSV feed with category tree rows, when configured
    pub category_feed: Option<PathBuf>,

    /// JSON feed with glossary translation rows, when configured
    pub glossary_feed: Option<PathBuf>,

    /// Skip feeds whose importer reports the store as already imported
    pub skip_imported: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("./data/storeseed.db"),
            category_feed: None,
            glossary_feed: None,
            skip_imported: true,
        }
    }
}

impl ImportConfig {
    /// Load configuration from a JSON file
    ///
    /// Missing fields fall back to their defaults, so a partial config
    /// file is valid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.database_path.as_os_str().is_empty() {
            return Err("database_path must not be empty".to_string());
        }

        if let Some(feed) = &self.category_feed {
            if feed.as_os_str().is_empty() {
                return Err("category_feed must not be empty when set".to_string());
            }
        }

        if let Some(feed) = &self.glossary_feed {
            if feed.as_os_str().is_empty() {
                return Err("glossary_feed must not be empty when set".to_string());
            }
        }

        Ok(())
    }
}
