//! Runs the built `notifier-worker` binary. None of these reach the
//! notification service.

use std::path::Path;
use std::process::Command;

use notify_dispatch::{DesktopNotifier, LaunchMode, NotifierConfig};

const WORKER: &str = env!("CARGO_BIN_EXE_notifier-worker");

fn canonical(path: &Path) -> std::path::PathBuf {
    std::fs::canonicalize(path).unwrap()
}

#[tokio::test]
async fn default_config_runs_the_bundled_worker() {
    let notifier = DesktopNotifier::new(NotifierConfig::default());
    assert_eq!(notifier.config().launch_mode, LaunchMode::Standalone);
    assert_eq!(canonical(&notifier.runtime_path()), canonical(Path::new(WORKER)));
    assert!(notifier.is_script_available());
    assert!(notifier.is_runtime_available().await);
    assert_eq!(
        notifier.runtime_version().await.as_deref(),
        Some(env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn missing_payload_exits_one() {
    let out = Command::new(WORKER).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("No notification data provided"));
}

#[test]
fn malformed_payload_exits_one() {
    let out = Command::new(WORKER).arg("{\"title\":").output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Error parsing notification data"));
}

#[test]
fn extra_arguments_are_a_usage_error_exiting_one() {
    let out = Command::new(WORKER).args(["{}", "surplus"]).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(!out.stderr.is_empty());
}

#[test]
fn version_flag_still_exits_zero() {
    let out = Command::new(WORKER).arg("--version").output().unwrap();
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains(env!("CARGO_PKG_VERSION")));
}
