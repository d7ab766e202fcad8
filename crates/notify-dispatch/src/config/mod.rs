//! Configuration management: defaults, validation, loading from the environment.

pub mod defaults;
pub mod manager;
pub mod notifier_config;
pub mod validation;

pub use manager::SettingsManager;
pub use notifier_config::{LaunchMode, NotifierConfig, SeverityIcons};

use serde::{Deserialize, Serialize};

/// A setting as reported by diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingInfo {
    pub key: String,
    pub value: String,
    pub description: String,
    /// `true` when the value came from the source rather than the defaults.
    pub overridden: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown setting key: {0}")]
    UnknownKey(String),

    #[error("validation error for {key}: {reason}")]
    Invalid { key: String, reason: String },
}
