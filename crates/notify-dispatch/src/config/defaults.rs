//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Prefix shared by every setting key.
pub const SETTING_PREFIX: &str = "DESKTOP_NOTIFIER_";

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    // Option defaults
    ("DESKTOP_NOTIFIER_DEFAULT_ICON", "", "Icon used when a call sets none"),
    ("DESKTOP_NOTIFIER_DEFAULT_SOUND", "true", "Play a sound by default"),
    ("DESKTOP_NOTIFIER_CUSTOM_SOUND_FILE", "", "Sound file (.wav/.mp3/.ogg) used instead of the platform sound"),
    ("DESKTOP_NOTIFIER_POSITION", "bottom-right", "Named position preset"),
    ("DESKTOP_NOTIFIER_CUSTOM_POSITION", "", "Explicit placement as x,y"),
    ("DESKTOP_NOTIFIER_UI_THEME", "default", "Theme preset"),
    ("DESKTOP_NOTIFIER_ANIMATION", "slide", "Animation preset"),
    ("DESKTOP_NOTIFIER_ANIMATION_DURATION", "", "Animation duration override in ms"),
    ("DESKTOP_NOTIFIER_SIZE", "medium", "Size preset"),
    ("DESKTOP_NOTIFIER_TIMEOUT", "5000", "Display timeout in ms"),
    ("DESKTOP_NOTIFIER_WAIT", "false", "Keep the worker alive for click/close callbacks"),
    // Severity icons
    ("DESKTOP_NOTIFIER_ICON_SUCCESS", "", "Icon for success notifications"),
    ("DESKTOP_NOTIFIER_ICON_ERROR", "", "Icon for error notifications"),
    ("DESKTOP_NOTIFIER_ICON_WARNING", "", "Icon for warning notifications"),
    ("DESKTOP_NOTIFIER_ICON_INFO", "", "Icon for info notifications"),
    // Runtime
    ("DESKTOP_NOTIFIER_RUNTIME_PATH", "", "Runtime executable; empty means auto-detect"),
    ("DESKTOP_NOTIFIER_LAUNCH_MODE", "standalone", "script (runtime + render script) or standalone (native worker)"),
    ("DESKTOP_NOTIFIER_BASE_PATH", "", "Directory searched for the render script; empty means current dir"),
    // Logging
    ("DESKTOP_NOTIFIER_LOG_NOTIFICATIONS", "true", "Log one record per notification"),
    ("DESKTOP_NOTIFIER_DEBUG_MODE", "false", "Log resolved runtime and built command"),
    // Throughput
    ("DESKTOP_NOTIFIER_BATCH_SIZE", "10", "Batch chunk size"),
    ("DESKTOP_NOTIFIER_BATCH_DELAY", "100", "Delay between batch chunks in ms"),
    ("DESKTOP_NOTIFIER_MAX_CONCURRENT", "5", "Concurrent worker processes"),
    ("DESKTOP_NOTIFIER_SLOW_THRESHOLD", "1000", "Executions slower than this (ms) are logged"),
    ("DESKTOP_NOTIFIER_METRICS_RETENTION", "100", "Execution samples kept in memory"),
    ("DESKTOP_NOTIFIER_WORKER_GRACE", "2000", "Grace period added to the display timeout in ms"),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

/// Setting keys in definition order.
pub fn keys() -> impl Iterator<Item = &'static str> {
    DEFS.iter().map(|&(key, _, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::validate_setting;

    #[test]
    fn every_key_is_prefixed() {
        assert!(keys().all(|k| k.starts_with(SETTING_PREFIX)));
        assert_eq!(keys().count(), DEFAULT_SETTINGS.len());
    }

    #[test]
    fn defaults_pass_validation() {
        for def in DEFAULT_SETTINGS.values() {
            assert!(
                validate_setting(def.key, def.default).is_ok(),
                "{} default {:?} rejected",
                def.key,
                def.default
            );
        }
    }
}
