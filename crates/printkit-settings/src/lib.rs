//! PrintKit Settings Crate
//!
//! Handles application configuration and settings persistence.

pub mod config;
pub mod error;
pub mod manager;

pub use config::{CommerceSettings, Config, ExportSettings, FontSettings, StudioSettings};
pub use error::{Result, SettingsError};
pub use manager::SettingsManager;
