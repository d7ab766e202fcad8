//! SettingsManager: string settings snapshotted from a source, with defaults.

use std::collections::HashMap;

use super::defaults::{self, DEFAULT_SETTINGS};
use super::validation::validate_setting;
use super::{ConfigError, SettingInfo};

/// Settings snapshot. Keys not present in the source resolve to their
/// defaults; keys outside [`DEFAULT_SETTINGS`] are ignored.
#[derive(Debug, Clone, Default)]
pub struct SettingsManager {
    values: HashMap<String, String>,
}

impl SettingsManager {
    /// A manager with no overrides: every key resolves to its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot every known `DESKTOP_NOTIFIER_*` key from the process environment.
    pub fn from_env() -> Self {
        Self::from_pairs(std::env::vars())
    }

    /// Snapshot from arbitrary key/value pairs. Invalid values are dropped
    /// with a warning so the defaults stay in effect.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut manager = Self::new();
        for (key, value) in pairs {
            let key = key.into();
            if !DEFAULT_SETTINGS.contains_key(key.as_str()) {
                continue;
            }
            let value = value.into();
            if let Err(e) = manager.set_setting(&key, value.trim()) {
                tracing::warn!("Ignoring setting: {e}");
            }
        }
        manager
    }

    /// Get a setting value. Falls back to default if not set.
    pub fn get_setting(&self, key: &str) -> Result<String, ConfigError> {
        if let Some(val) = self.values.get(key) {
            return Ok(val.clone());
        }
        defaults::get_default(key)
            .map(str::to_string)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))
    }

    /// Set a setting value with validation.
    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        if !DEFAULT_SETTINGS.contains_key(key) {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        validate_setting(key, value).map_err(|reason| ConfigError::Invalid {
            key: key.to_string(),
            reason,
        })?;

        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// All settings in definition order, defaults filled in.
    pub fn get_all_settings(&self) -> Vec<SettingInfo> {
        defaults::keys()
            .filter_map(|key| {
                let def = DEFAULT_SETTINGS.get(key)?;
                let set = self.values.get(key);
                Some(SettingInfo {
                    key: key.to_string(),
                    value: set.cloned().unwrap_or_else(|| def.default.to_string()),
                    description: def.description.to_string(),
                    overridden: set.is_some(),
                })
            })
            .collect()
    }
}
