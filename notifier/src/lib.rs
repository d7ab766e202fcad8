//! Render worker and diagnostics for desktop notifications.
//!
//! The `notifier-worker` binary decodes one request, resolves presets and
//! hands the result to the OS notification service, then exits. The
//! `notifier-doctor` binary reports on the dispatch side's environment.

pub mod doctor;
pub mod lifecycle;
pub mod native;
pub mod worker;

use tracing_subscriber::EnvFilter;

/// Application name shown by the OS notification service.
pub const APP_NAME: &str = "Desktop Notifier";

/// Initialise stderr logging. stdout stays free for the caller to capture.
pub fn init_stderr_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
