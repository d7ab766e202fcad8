//! Environment report for the dispatch side.

use std::fmt;

use serde::Serialize;

use notify_dispatch::config::SettingInfo;
use notify_dispatch::log_buffer::LogBuffer;
use notify_dispatch::{DesktopNotifier, ErrorKind, NotificationOptions, PerformanceStats, SettingsManager};

pub const TEST_TITLE: &str = "Desktop Notifier";
pub const TEST_MESSAGE: &str = "Test notification from notifier-doctor";

#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    pub platform: String,
    pub launch_mode: String,
    pub runtime_path: String,
    pub runtime_available: bool,
    pub runtime_version: Option<String>,
    pub script_path: Option<String>,
    pub script_available: bool,
    pub command_preview: Option<String>,
    pub command_error: Option<String>,
    pub settings: Vec<SettingInfo>,
    pub stats: PerformanceStats,
    pub recommendations: Vec<String>,
}

impl DoctorReport {
    pub async fn collect(notifier: &DesktopNotifier, settings: &SettingsManager) -> Self {
        let runtime_available = notifier.is_runtime_available().await;
        let script_available = notifier.is_script_available();

        let (command_preview, command_error) =
            match notifier.build_command(TEST_TITLE, TEST_MESSAGE, &NotificationOptions::new()) {
                Ok(built) => (Some(built.command_line), None),
                Err(e) => (None, Some(e.to_string())),
            };

        let mut recommendations = Vec::new();
        if !runtime_available {
            recommendations.push(ErrorKind::RuntimeUnavailable.recommendation().to_string());
        }
        if !script_available {
            recommendations.push(ErrorKind::ScriptUnavailable.recommendation().to_string());
        }
        if command_error.is_some() {
            recommendations.push(ErrorKind::EncodingError.recommendation().to_string());
        }

        Self {
            platform: notifier.platform().name().to_string(),
            launch_mode: notifier.config().launch_mode.as_str().to_string(),
            runtime_path: notifier.runtime_path().display().to_string(),
            runtime_available,
            runtime_version: notifier.runtime_version().await,
            script_path: notifier.script_path().map(|p| p.display().to_string()),
            script_available,
            command_preview,
            command_error,
            settings: settings.get_all_settings(),
            stats: notifier.performance_stats(),
            recommendations,
        }
    }

    /// Fold the outcome of a test send into the report.
    pub fn record_send(&mut self, notifier: &DesktopNotifier, logs: &LogBuffer) {
        self.stats = notifier.performance_stats();
        let Some(failure) = logs.last_failure() else {
            return;
        };
        if let Some(hint) = failure.field_str("recommendation") {
            if !self.recommendations.iter().any(|r| r == hint) {
                self.recommendations.push(hint.to_string());
            }
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.recommendations.is_empty()
    }
}

fn yes_no(v: bool) -> &'static str {
    if v { "yes" } else { "no" }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Platform:          {}", self.platform)?;
        writeln!(f, "Launch mode:       {}", self.launch_mode)?;
        writeln!(f, "Runtime:           {}", self.runtime_path)?;
        writeln!(f, "  available:       {}", yes_no(self.runtime_available))?;
        writeln!(
            f,
            "  version:         {}",
            self.runtime_version.as_deref().unwrap_or("unknown")
        )?;
        writeln!(
            f,
            "Script:            {}",
            self.script_path.as_deref().unwrap_or("(none, standalone worker)")
        )?;
        writeln!(f, "  available:       {}", yes_no(self.script_available))?;
        match (&self.command_preview, &self.command_error) {
            (Some(cmd), _) => writeln!(f, "Command preview:   {cmd}")?,
            (None, Some(err)) => writeln!(f, "Command preview:   failed: {err}")?,
            (None, None) => {}
        }

        writeln!(f, "\nSettings:")?;
        for s in &self.settings {
            let marker = if s.overridden { "*" } else { " " };
            writeln!(f, " {marker} {} = {:?}", s.key, s.value)?;
        }

        if self.stats.total > 0 {
            writeln!(
                f,
                "\nExecutions: {} (avg {:.0} ms, min {} ms, max {} ms, {:.0}% ok)",
                self.stats.total,
                self.stats.average_ms,
                self.stats.min_ms,
                self.stats.max_ms,
                self.stats.success_rate * 100.0
            )?;
        }

        if self.is_healthy() {
            writeln!(f, "\nNo problems found.")?;
        } else {
            writeln!(f, "\nRecommendations:")?;
            for r in &self.recommendations {
                writeln!(f, "  - {r}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify_dispatch::{LaunchMode, NotifierConfig, Notify};
    use tracing_subscriber::layer::SubscriberExt;

    #[tokio::test]
    async fn missing_runtime_and_script_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = DesktopNotifier::new(
            NotifierConfig::default()
                .with_launch_mode(LaunchMode::Script)
                .with_runtime_path("/nonexistent/bin/node")
                .with_base_path(dir.path()),
        );
        let report = DoctorReport::collect(&notifier, &SettingsManager::new()).await;

        assert!(!report.runtime_available);
        assert_eq!(report.runtime_version, None);
        assert!(!report.script_available);
        assert!(report.command_preview.is_some());
        assert_eq!(report.recommendations.len(), 2);
        assert!(!report.is_healthy());

        let text = report.to_string();
        assert!(text.contains("/nonexistent/bin/node"));
        assert!(text.contains("Recommendations:"));
    }

    #[tokio::test]
    async fn standalone_mode_has_no_script() {
        let notifier = DesktopNotifier::new(
            NotifierConfig::default()
                .with_launch_mode(LaunchMode::Standalone)
                .with_runtime_path("/nonexistent/notifier-worker"),
        );
        let report = DoctorReport::collect(&notifier, &SettingsManager::new()).await;
        assert_eq!(report.launch_mode, "standalone");
        assert_eq!(report.script_path, None);
        assert!(report.script_available);
    }

    #[tokio::test]
    async fn failed_send_adds_its_recommendation_once() {
        let logs = LogBuffer::new();
        let subscriber = tracing_subscriber::registry()
            .with(notify_dispatch::log_buffer::LogCaptureLayer::new(logs.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let notifier = DesktopNotifier::new(
            NotifierConfig::default().with_runtime_path("/nonexistent/bin/node"),
        );
        let mut report = DoctorReport::collect(&notifier, &SettingsManager::new()).await;
        let before = report.recommendations.len();

        assert!(!notifier.notify(TEST_TITLE, TEST_MESSAGE, NotificationOptions::new()).await);
        report.record_send(&notifier, &logs);

        assert_eq!(report.stats.total, 1);
        assert_eq!(report.recommendations.len(), before);
        assert!(
            report
                .recommendations
                .iter()
                .any(|r| r == ErrorKind::RuntimeUnavailable.recommendation())
        );
    }
}
