//! Typed notifier configuration loaded from the settings snapshot.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use notify_presets::NotificationOptions;

use super::manager::SettingsManager;
use super::validation::parse_coordinates;
use crate::notifier::Severity;

/// How the worker process is launched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    /// `{runtime} {script} {payload}` with an interpreter and an installed
    /// render script.
    Script,
    /// `{worker} {payload}` with the `notifier-worker` binary.
    #[default]
    Standalone,
}

impl LaunchMode {
    pub fn from_str_setting(s: &str) -> Self {
        match s {
            "script" => Self::Script,
            _ => Self::Standalone,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Standalone => "standalone",
        }
    }
}

/// Icon per severity, used only when the caller leaves the icon unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityIcons {
    pub success: Option<PathBuf>,
    pub error: Option<PathBuf>,
    pub warning: Option<PathBuf>,
    pub info: Option<PathBuf>,
}

impl SeverityIcons {
    pub fn get(&self, severity: Severity) -> Option<&PathBuf> {
        match severity {
            Severity::Success => self.success.as_ref(),
            Severity::Error => self.error.as_ref(),
            Severity::Warning => self.warning.as_ref(),
            Severity::Info => self.info.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Configuration layer of the option merge.
    pub defaults: NotificationOptions,
    pub icons: SeverityIcons,
    /// Explicit runtime executable; `None` auto-detects.
    pub runtime_path: Option<PathBuf>,
    pub launch_mode: LaunchMode,
    /// Root for render script candidates; `None` uses the current directory.
    pub base_path: Option<PathBuf>,
    pub log_notifications: bool,
    pub debug_mode: bool,
    pub batch_size: usize,
    pub batch_delay_ms: u64,
    pub max_concurrent_processes: usize,
    pub slow_execution_threshold_ms: u64,
    pub metrics_retention: usize,
    pub worker_grace_ms: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            defaults: NotificationOptions::new(),
            icons: SeverityIcons::default(),
            runtime_path: None,
            launch_mode: LaunchMode::Standalone,
            base_path: None,
            log_notifications: true,
            debug_mode: false,
            batch_size: 10,
            batch_delay_ms: 100,
            max_concurrent_processes: 5,
            slow_execution_threshold_ms: 1000,
            metrics_retention: 100,
            worker_grace_ms: 2000,
        }
    }
}

impl NotifierConfig {
    /// Load configuration from the settings manager.
    pub fn load(sm: &SettingsManager) -> Self {
        let g = |key: &str| -> String { sm.get_setting(key).unwrap_or_default() };
        let base = Self::default();

        let custom_position = parse_coordinates(&g("DESKTOP_NOTIFIER_CUSTOM_POSITION"));
        let animation_duration = g("DESKTOP_NOTIFIER_ANIMATION_DURATION").parse().ok();

        let mut defaults = NotificationOptions {
            icon: parse_path(&g("DESKTOP_NOTIFIER_DEFAULT_ICON")),
            sound: Some(g("DESKTOP_NOTIFIER_DEFAULT_SOUND") == "true"),
            custom_sound_file: parse_path(&g("DESKTOP_NOTIFIER_CUSTOM_SOUND_FILE")),
            timeout: Some(parse_num(&g("DESKTOP_NOTIFIER_TIMEOUT"), 5000)),
            position: non_empty(g("DESKTOP_NOTIFIER_POSITION")),
            custom_position: None,
            ui_theme: non_empty(g("DESKTOP_NOTIFIER_UI_THEME")),
            animation: non_empty(g("DESKTOP_NOTIFIER_ANIMATION")),
            animation_duration,
            size: non_empty(g("DESKTOP_NOTIFIER_SIZE")),
            wait: Some(g("DESKTOP_NOTIFIER_WAIT") == "true"),
        };
        if let Some((x, y)) = custom_position {
            defaults = defaults.with_custom_position(x, y);
        }

        Self {
            defaults,
            icons: SeverityIcons {
                success: parse_path(&g("DESKTOP_NOTIFIER_ICON_SUCCESS")),
                error: parse_path(&g("DESKTOP_NOTIFIER_ICON_ERROR")),
                warning: parse_path(&g("DESKTOP_NOTIFIER_ICON_WARNING")),
                info: parse_path(&g("DESKTOP_NOTIFIER_ICON_INFO")),
            },
            runtime_path: parse_path(&g("DESKTOP_NOTIFIER_RUNTIME_PATH")),
            launch_mode: LaunchMode::from_str_setting(&g("DESKTOP_NOTIFIER_LAUNCH_MODE")),
            base_path: parse_path(&g("DESKTOP_NOTIFIER_BASE_PATH")),
            log_notifications: g("DESKTOP_NOTIFIER_LOG_NOTIFICATIONS") != "false",
            debug_mode: g("DESKTOP_NOTIFIER_DEBUG_MODE") == "true",
            batch_size: parse_num(&g("DESKTOP_NOTIFIER_BATCH_SIZE"), base.batch_size),
            batch_delay_ms: parse_num(&g("DESKTOP_NOTIFIER_BATCH_DELAY"), base.batch_delay_ms),
            max_concurrent_processes: parse_num(
                &g("DESKTOP_NOTIFIER_MAX_CONCURRENT"),
                base.max_concurrent_processes,
            ),
            slow_execution_threshold_ms: parse_num(
                &g("DESKTOP_NOTIFIER_SLOW_THRESHOLD"),
                base.slow_execution_threshold_ms,
            ),
            metrics_retention: parse_num(
                &g("DESKTOP_NOTIFIER_METRICS_RETENTION"),
                base.metrics_retention,
            ),
            worker_grace_ms: parse_num(&g("DESKTOP_NOTIFIER_WORKER_GRACE"), base.worker_grace_ms),
        }
    }

    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::load(&SettingsManager::from_env())
    }

    /// Builder: set the runtime executable.
    pub fn with_runtime_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.runtime_path = Some(path.into());
        self
    }

    /// Builder: set the script search root.
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Builder: set the launch mode.
    pub fn with_launch_mode(mut self, mode: LaunchMode) -> Self {
        self.launch_mode = mode;
        self
    }

    /// Builder: replace the configured option defaults.
    pub fn with_defaults(mut self, defaults: NotificationOptions) -> Self {
        self.defaults = defaults;
        self
    }
}

fn parse_num<T: std::str::FromStr>(s: &str, default: T) -> T {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

fn parse_path(s: &str) -> Option<PathBuf> {
    non_empty(s.to_string()).map(PathBuf::from)
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify_presets::CustomPosition;

    #[test]
    fn load_defaults_match_default_impl() {
        let cfg = NotifierConfig::load(&SettingsManager::new());
        let def = NotifierConfig::default();
        assert_eq!(cfg.batch_size, def.batch_size);
        assert_eq!(cfg.max_concurrent_processes, 5);
        assert_eq!(cfg.worker_grace_ms, 2000);
        assert_eq!(cfg.launch_mode, LaunchMode::Standalone);
        assert_eq!(def.launch_mode, LaunchMode::Standalone);
        assert!(cfg.log_notifications);
        assert!(!cfg.debug_mode);
        assert_eq!(cfg.runtime_path, None);
        assert_eq!(cfg.defaults.position.as_deref(), Some("bottom-right"));
        assert_eq!(cfg.defaults.animation_duration, None);
        assert_eq!(cfg.defaults.custom_position, None);
    }

    #[test]
    fn load_reads_overrides() {
        let sm = SettingsManager::from_pairs([
            ("DESKTOP_NOTIFIER_CUSTOM_POSITION", "300,40"),
            ("DESKTOP_NOTIFIER_ANIMATION_DURATION", "120"),
            ("DESKTOP_NOTIFIER_LAUNCH_MODE", "script"),
            ("DESKTOP_NOTIFIER_RUNTIME_PATH", "/opt/node/bin/node"),
            ("DESKTOP_NOTIFIER_ICON_ERROR", "/icons/error.png"),
            ("DESKTOP_NOTIFIER_DEFAULT_SOUND", "false"),
        ]);
        let cfg = NotifierConfig::load(&sm);
        assert_eq!(cfg.defaults.custom_position, Some(CustomPosition::new(300, 40)));
        assert_eq!(cfg.defaults.animation_duration, Some(120));
        assert_eq!(cfg.defaults.sound, Some(false));
        assert_eq!(cfg.launch_mode, LaunchMode::Script);
        assert_eq!(cfg.runtime_path, Some(PathBuf::from("/opt/node/bin/node")));
        assert_eq!(
            cfg.icons.get(Severity::Error),
            Some(&PathBuf::from("/icons/error.png"))
        );
        assert_eq!(cfg.icons.get(Severity::Info), None);
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = NotifierConfig::default().with_runtime_path("/usr/bin/node");
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["launch_mode"], "standalone");
        let back: NotifierConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.runtime_path, cfg.runtime_path);

        let partial: NotifierConfig =
            serde_json::from_value(serde_json::json!({ "batch_size": 3 })).unwrap();
        assert_eq!(partial.batch_size, 3);
        assert_eq!(partial.batch_delay_ms, 100);
    }
}
