//! Settings manager.
//!
//! Resolves the platform config path, loads the configuration (falling back
//! to defaults when the file is missing or invalid), and persists changes.

use crate::config::Config;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const APP_DIR: &str = "printkit";
const CONFIG_FILE: &str = "config.json";

/// Loads, holds, and saves the application configuration.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    path: PathBuf,
    config: Config,
}

impl SettingsManager {
    /// Loads from the platform config directory, or defaults when nothing
    /// is stored yet.
    pub fn load() -> Self {
        let path = default_config_path();
        Self::load_from(path)
    }

    /// Loads from an explicit path, falling back to defaults on a missing
    /// or unreadable file.
    pub fn load_from(path: PathBuf) -> Self {
        let config = if path.exists() {
            match Config::load_from_file(&path).and_then(|c| c.validate().map(|_| c)) {
                Ok(config) => {
                    info!(path = %path.display(), "settings loaded");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "settings unusable; using defaults");
                    Config::default()
                }
            }
        } else {
            Config::default()
        };
        Self { path, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validates and persists the current configuration.
    pub fn save(&self) -> Result<()> {
        self.config.validate()?;
        self.config.save_to_file(&self.path)
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}
