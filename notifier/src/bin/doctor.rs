//! Diagnostics binary: reports runtime, script and configuration state,
//! and optionally sends a test notification.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use desktop_notifier_lib::doctor::{DoctorReport, TEST_MESSAGE, TEST_TITLE};
use notify_dispatch::log_buffer::{LogBuffer, LogCaptureLayer};
use notify_dispatch::{DesktopNotifier, NotificationOptions, NotifierConfig, Notify, SettingsManager};

#[derive(Parser)]
#[command(name = "notifier-doctor", version, about = "Check the desktop notification setup")]
struct Cli {
    /// Also dispatch a test notification
    #[arg(long)]
    send: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let logs = LogBuffer::new();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::from_default_env()),
        )
        .with(LogCaptureLayer::new(logs.clone()))
        .init();

    let cli = Cli::parse();
    let settings = SettingsManager::from_env();
    let notifier = DesktopNotifier::new(NotifierConfig::load(&settings));

    let mut report = DoctorReport::collect(&notifier, &settings).await;

    if cli.send {
        let sent = notifier
            .notify(TEST_TITLE, TEST_MESSAGE, NotificationOptions::new())
            .await;
        tracing::info!(sent, "Test notification dispatched");
        report.record_send(&notifier, &logs);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }

    if !report.is_healthy() {
        std::process::exit(1);
    }
    Ok(())
}
