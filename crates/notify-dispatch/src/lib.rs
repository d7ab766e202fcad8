//! Desktop notification dispatch.
//!
//! Builds a shell-safe command line for one notification, locates the
//! runtime and render script, runs the worker as a subprocess and turns
//! its exit status into a boolean plus a structured log record.

pub mod classify;
pub mod command;
pub mod config;
pub mod escape;
pub mod invoker;
pub mod log_buffer;
pub mod metrics;
pub mod notifier;
pub mod runtime;
pub mod script;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

// Re-exports for convenience
pub use command::BuiltCommand;
pub use config::{LaunchMode, NotifierConfig, SettingsManager};
pub use escape::HostPlatform;
pub use metrics::{PerformanceMonitor, PerformanceStats};
pub use notifier::{BatchItem, BatchResult, DesktopNotifier, Notify, Severity};
pub use notify_presets::{CustomPosition, NotificationOptions, NotificationRequest};
pub use runtime::{RuntimeCache, RuntimeProfile, RuntimeResolver};
pub use script::ScriptLocator;

/// Errors that can occur while dispatching a notification.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Runtime `{runtime}` is not available: {output}")]
    RuntimeUnavailable { runtime: String, output: String },

    #[error("Render script not found at {}", path.display())]
    ScriptUnavailable { path: PathBuf, output: String },

    #[error("Worker dependencies missing: {output}")]
    DependencyMissing { output: String },

    #[error("Payload encoding failed: {0}")]
    Encoding(String),

    #[error("Native notification failed (exit code {exit_code:?}): {output}")]
    NativeNotify {
        exit_code: Option<i32>,
        output: String,
    },

    #[error("Worker did not exit within {0:?}")]
    Timeout(Duration),
}

impl NotifyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RuntimeUnavailable { .. } => ErrorKind::RuntimeUnavailable,
            Self::ScriptUnavailable { .. } => ErrorKind::ScriptUnavailable,
            Self::DependencyMissing { .. } => ErrorKind::DependencyMissing,
            Self::Encoding(_) => ErrorKind::EncodingError,
            Self::NativeNotify { .. } => ErrorKind::NativeNotifyError,
            Self::Timeout(_) => ErrorKind::Timeout,
        }
    }
}

impl From<serde_json::Error> for NotifyError {
    fn from(e: serde_json::Error) -> Self {
        Self::Encoding(e.to_string())
    }
}

impl From<notify_presets::ProtocolError> for NotifyError {
    fn from(e: notify_presets::ProtocolError) -> Self {
        Self::Encoding(e.to_string())
    }
}

/// Failure category recorded in the diagnostic log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    RuntimeUnavailable,
    ScriptUnavailable,
    DependencyMissing,
    EncodingError,
    NativeNotifyError,
    /// Soft: the worker outlived the hard deadline. Reported as success.
    Timeout,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RuntimeUnavailable => "RuntimeUnavailable",
            Self::ScriptUnavailable => "ScriptUnavailable",
            Self::DependencyMissing => "DependencyMissing",
            Self::EncodingError => "EncodingError",
            Self::NativeNotifyError => "NativeNotifyError",
            Self::Timeout => "Timeout",
        }
    }

    /// Actionable hint logged alongside the failure.
    pub fn recommendation(self) -> &'static str {
        match self {
            Self::RuntimeUnavailable => {
                "Install the notification runtime or set DESKTOP_NOTIFIER_RUNTIME_PATH"
            }
            Self::ScriptUnavailable => "Render script missing; re-run the install step",
            Self::DependencyMissing => "Worker dependencies missing; reinstall them",
            Self::EncodingError => {
                "Request could not be encoded for the host shell; check title, message and paths"
            }
            Self::NativeNotifyError => {
                "The OS notification service rejected the request; check the notification daemon"
            }
            Self::Timeout => "Worker exceeded its deadline; it was terminated",
        }
    }

    pub fn is_soft(self) -> bool {
        matches!(self, Self::Timeout)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type alias for dispatch operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
