//! Configuration and settings management for PrintKit
//!
//! Provides configuration file handling, settings management, and validation.
//! Supports JSON and TOML file formats stored in platform-specific
//! directories.
//!
//! Configuration is organized into logical sections:
//! - Export settings (pixel ratio, format)
//! - Font settings (default family, extra font directories)
//! - Commerce settings (API base URL, request timeout)
//! - Studio preferences (autosave)

use crate::error::{Result, SettingsError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Preview export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Pixel density multiplier for exported previews
    pub pixel_ratio: f64,
    /// Output image format
    pub format: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            pixel_ratio: 2.0,
            format: "png".to_string(),
        }
    }
}

/// Font settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontSettings {
    /// Family used for newly placed text
    pub default_family: String,
    /// Extra directories scanned for font files
    pub extra_font_dirs: Vec<PathBuf>,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            default_family: "Roboto".to_string(),
            extra_font_dirs: Vec::new(),
        }
    }
}

/// Commerce API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommerceSettings {
    /// Base URL of the commerce API
    pub api_base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for CommerceSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.example.com".to_string(),
            request_timeout_ms: 15000,
        }
    }
}

/// Studio preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioSettings {
    /// Periodically snapshot the design session to disk
    pub autosave_snapshot: bool,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            autosave_snapshot: false,
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub export: ExportSettings,
    pub fonts: FontSettings,
    pub commerce: CommerceSettings,
    pub studio: StudioSettings,
}

impl Config {
    /// Load configuration from a file, inferring the format from the
    /// extension (`.json` or `.toml`).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {e}", path.display())))?;
        let config = match extension(path) {
            "json" => serde_json::from_str(&contents)?,
            "toml" => toml::from_str(&contents)?,
            other => return Err(SettingsError::UnsupportedFormat(other.to_string())),
        };
        Ok(config)
    }

    /// Save configuration to a file, inferring the format from the
    /// extension.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = match extension(path) {
            "json" => serde_json::to_string_pretty(self)?,
            "toml" => toml::to_string_pretty(self)?,
            other => return Err(SettingsError::UnsupportedFormat(other.to_string())),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SettingsError::ConfigDirectory(e.to_string()))?;
        }
        std::fs::write(path, contents)
            .map_err(|e| SettingsError::SaveError(format!("{}: {e}", path.display())))?;
        Ok(())
    }

    /// Validate configured ranges.
    pub fn validate(&self) -> Result<()> {
        if !(1.0..=4.0).contains(&self.export.pixel_ratio) {
            return Err(SettingsError::InvalidSetting {
                key: "export.pixel_ratio".to_string(),
                reason: format!("{} outside 1.0..=4.0", self.export.pixel_ratio),
            });
        }
        if self.export.format != "png" {
            return Err(SettingsError::InvalidSetting {
                key: "export.format".to_string(),
                reason: format!("unsupported format '{}'", self.export.format),
            });
        }
        if self.commerce.request_timeout_ms == 0 {
            return Err(SettingsError::InvalidSetting {
                key: "commerce.request_timeout_ms".to_string(),
                reason: "must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

fn extension(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("")
}
