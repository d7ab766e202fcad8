//! Render worker binary.
//!
//! Takes exactly one argument, the encoded notification request. Exits 0
//! once the notification is displayed, clicked, closed or force-exited,
//! and 1 on a missing/malformed argument or a native error.

use std::sync::Arc;

use clap::Parser;

use desktop_notifier_lib::lifecycle::FORCED_EXIT_GRACE;
use desktop_notifier_lib::native::NativeBackend;
use desktop_notifier_lib::worker::run_worker;

#[derive(Parser)]
#[command(name = "notifier-worker", version, about = "Show one desktop notification")]
struct Cli {
    /// Encoded request: {"title", "message", "options"}
    payload: Option<String>,
}

fn main() {
    desktop_notifier_lib::init_stderr_tracing();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            1
        }
    };
    // Exit without waiting on a native call still blocked past the deadline.
    std::process::exit(code);
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let backend = Arc::new(NativeBackend::new(desktop_notifier_lib::APP_NAME));

    let result = runtime.block_on(run_worker(
        cli.payload.as_deref(),
        backend,
        FORCED_EXIT_GRACE,
    ));
    runtime.shutdown_background();

    let lifecycle = result?;
    let state = lifecycle.state();
    tracing::info!(%state, "Notification finished");
    Ok(state.exit_code())
}
