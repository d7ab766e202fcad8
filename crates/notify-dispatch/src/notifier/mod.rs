//! Dispatch facade: merge options, build the command, run the worker,
//! classify failures and log one record per call.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use notify_presets::request::DEFAULT_TIMEOUT_MS;
use notify_presets::{NotificationOptions, NotificationRequest};

use crate::classify::{FailureContext, classify};
use crate::command::{self, BuiltCommand};
use crate::config::{LaunchMode, NotifierConfig};
use crate::escape::HostPlatform;
use crate::invoker::{self, Execution, ExecutionResult};
use crate::metrics::{PerformanceMonitor, PerformanceStats};
use crate::runtime::{self, RuntimeCache, RuntimeProbe, RuntimeProfile, RuntimeResolver};
use crate::script::ScriptLocator;
use crate::{ErrorKind, NotifyError, Result};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

/// One entry of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub options: NotificationOptions,
}

impl BatchItem {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            options: NotificationOptions::new(),
        }
    }

    pub fn with_options(mut self, options: NotificationOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub success: bool,
    pub elapsed_ms: u64,
}

/// Public notification surface.
///
/// Only [`Notify::notify`] must be implemented; every wrapper pre-fills
/// one option and delegates to it. Explicit wrapper arguments replace the
/// same field in `options`.
#[allow(async_fn_in_trait)]
pub trait Notify {
    /// Show one notification. `true` iff the worker reported success
    /// (or was cut off by the hard deadline).
    async fn notify(&self, title: &str, message: &str, options: NotificationOptions) -> bool;

    /// Icon used by the severity wrappers when the caller sets none.
    fn severity_icon(&self, _severity: Severity) -> Option<PathBuf> {
        None
    }

    async fn notify_severity(
        &self,
        severity: Severity,
        title: &str,
        message: &str,
        mut options: NotificationOptions,
    ) -> bool {
        if options.icon.is_none() {
            options.icon = self.severity_icon(severity);
        }
        self.notify(title, message, options).await
    }

    async fn success(&self, title: &str, message: &str, options: NotificationOptions) -> bool {
        self.notify_severity(Severity::Success, title, message, options)
            .await
    }

    async fn error(&self, title: &str, message: &str, options: NotificationOptions) -> bool {
        self.notify_severity(Severity::Error, title, message, options)
            .await
    }

    async fn warning(&self, title: &str, message: &str, options: NotificationOptions) -> bool {
        self.notify_severity(Severity::Warning, title, message, options)
            .await
    }

    async fn info(&self, title: &str, message: &str, options: NotificationOptions) -> bool {
        self.notify_severity(Severity::Info, title, message, options)
            .await
    }

    async fn notify_at_position(
        &self,
        title: &str,
        message: &str,
        position: &str,
        options: NotificationOptions,
    ) -> bool {
        self.notify(title, message, options.with_position(position))
            .await
    }

    async fn notify_at_coordinates(
        &self,
        title: &str,
        message: &str,
        x: i32,
        y: i32,
        options: NotificationOptions,
    ) -> bool {
        self.notify(title, message, options.with_custom_position(x, y))
            .await
    }

    async fn notify_with_theme(
        &self,
        title: &str,
        message: &str,
        theme: &str,
        options: NotificationOptions,
    ) -> bool {
        self.notify(title, message, options.with_theme(theme)).await
    }

    /// `duration_ms = None` keeps the animation preset's own duration.
    async fn notify_with_animation(
        &self,
        title: &str,
        message: &str,
        animation: &str,
        duration_ms: Option<u32>,
        mut options: NotificationOptions,
    ) -> bool {
        options = options.with_animation(animation);
        options.animation_duration = duration_ms;
        self.notify(title, message, options).await
    }

    async fn notify_with_size(
        &self,
        title: &str,
        message: &str,
        size: &str,
        options: NotificationOptions,
    ) -> bool {
        self.notify(title, message, options.with_size(size)).await
    }

    /// Only sets the file; a disabled sound flag from `options` or the
    /// config defaults still silences it.
    async fn notify_with_sound(
        &self,
        title: &str,
        message: &str,
        sound_file: &Path,
        options: NotificationOptions,
    ) -> bool {
        self.notify(title, message, options.with_custom_sound_file(sound_file))
            .await
    }

    async fn notify_silent(&self, title: &str, message: &str, options: NotificationOptions) -> bool {
        self.notify(title, message, options.with_sound(false)).await
    }

    /// Items run sequentially; results keep input order.
    async fn notify_batch(&self, items: Vec<BatchItem>) -> Vec<BatchResult> {
        let mut results = Vec::with_capacity(items.len());
        for item in items {
            let start = Instant::now();
            let success = self.notify(&item.title, &item.message, item.options).await;
            results.push(BatchResult {
                success,
                elapsed_ms: millis(start.elapsed()),
            });
        }
        results
    }
}

/// Outcome of a successful dispatch.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub command: BuiltCommand,
    pub elapsed: Duration,
    pub output: String,
    /// The worker outlived the hard deadline and was killed.
    pub timed_out: bool,
}

struct NotifierInner {
    config: NotifierConfig,
    platform: HostPlatform,
    runtime: RuntimeResolver,
    scripts: ScriptLocator,
    limiter: Semaphore,
    monitor: PerformanceMonitor,
}

/// Notifier backed by a worker subprocess per notification.
///
/// Cheap to clone; clones share the runtime cache, the process limiter
/// and the performance monitor.
#[derive(Clone)]
pub struct DesktopNotifier {
    inner: Arc<NotifierInner>,
}

impl DesktopNotifier {
    pub fn new(config: NotifierConfig) -> Self {
        Self::with_parts(config, HostPlatform::current(), Arc::new(RuntimeCache::new()))
    }

    /// Notifier configured from `DESKTOP_NOTIFIER_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(NotifierConfig::from_env())
    }

    /// Full control over the target shell and the runtime cache.
    pub fn with_parts(config: NotifierConfig, platform: HostPlatform, cache: Arc<RuntimeCache>) -> Self {
        let profile = match config.launch_mode {
            LaunchMode::Script => RuntimeProfile::node(),
            LaunchMode::Standalone => RuntimeProfile::standalone_worker(),
        };
        let runtime = RuntimeResolver::new(profile, config.runtime_path.clone(), cache);
        let base = config
            .base_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let scripts = ScriptLocator::for_base_path(&base);
        let limiter = Semaphore::new(config.max_concurrent_processes.max(1));
        let monitor = PerformanceMonitor::new(
            config.metrics_retention,
            Duration::from_millis(config.slow_execution_threshold_ms),
        );

        Self {
            inner: Arc::new(NotifierInner {
                config,
                platform,
                runtime,
                scripts,
                limiter,
                monitor,
            }),
        }
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.inner.config
    }

    pub fn platform(&self) -> HostPlatform {
        self.inner.platform
    }

    /// Per-call options over configured defaults over built-in defaults.
    pub fn merged_options(&self, options: &NotificationOptions) -> NotificationOptions {
        options
            .merged_over(&self.inner.config.defaults)
            .merged_over(&NotificationOptions::builtin())
    }

    pub fn build_request(
        &self,
        title: &str,
        message: &str,
        options: &NotificationOptions,
    ) -> NotificationRequest {
        NotificationRequest::new(title, message, self.merged_options(options))
            .with_grace_ms(self.inner.config.worker_grace_ms)
    }

    /// The exact command line `notify` would run, without running it.
    pub fn build_command(
        &self,
        title: &str,
        message: &str,
        options: &NotificationOptions,
    ) -> Result<BuiltCommand> {
        let request = self.build_request(title, message, options);
        let runtime = self.runtime_path();
        let script = self.script_path();
        command::build_command(self.inner.platform, &runtime, script.as_deref(), &request)
    }

    pub fn runtime_path(&self) -> PathBuf {
        self.inner.runtime.resolve()
    }

    /// Render script path; `None` when the native worker is the runtime.
    pub fn script_path(&self) -> Option<PathBuf> {
        match self.inner.config.launch_mode {
            LaunchMode::Script => Some(self.inner.scripts.locate()),
            LaunchMode::Standalone => None,
        }
    }

    pub fn is_script_available(&self) -> bool {
        match self.inner.config.launch_mode {
            LaunchMode::Script => self.inner.scripts.is_available(),
            LaunchMode::Standalone => true,
        }
    }

    pub async fn is_runtime_available(&self) -> bool {
        self.probe_runtime().await.available
    }

    pub async fn runtime_version(&self) -> Option<String> {
        self.probe_runtime().await.version
    }

    async fn probe_runtime(&self) -> RuntimeProbe {
        if let Some(probe) = self.inner.runtime.cached_probe() {
            return probe;
        }
        let _permit = self.inner.limiter.acquire().await.ok();
        self.inner.runtime.probe().await
    }

    /// Forget the resolved runtime path and probe result.
    pub fn invalidate_caches(&self) {
        self.inner.runtime.invalidate();
    }

    pub fn performance_stats(&self) -> PerformanceStats {
        self.inner.monitor.stats()
    }

    pub fn monitor(&self) -> &PerformanceMonitor {
        &self.inner.monitor
    }

    fn hard_timeout(&self, options: &NotificationOptions) -> Duration {
        let display = options
            .timeout
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let grace = self.inner.config.worker_grace_ms;
        Duration::from_millis(display.saturating_add(grace.saturating_mul(2)))
    }

    /// Run one notification and report why it failed, if it did.
    ///
    /// Emits the per-call log record unless logging is disabled.
    pub async fn dispatch(
        &self,
        title: &str,
        message: &str,
        options: NotificationOptions,
    ) -> Result<DispatchReport> {
        let cfg = &self.inner.config;
        let request = self.build_request(title, message, &options);
        let runtime = self.runtime_path();
        let script = self.script_path();

        if cfg.debug_mode {
            tracing::debug!(runtime = %runtime.display(), "Resolved notification runtime");
        }

        let built = match command::build_command(
            self.inner.platform,
            &runtime,
            script.as_deref(),
            &request,
        ) {
            Ok(built) => built,
            Err(e) => {
                let attempt = Attempt {
                    command: "",
                    exit_code: None,
                    output: "",
                    runtime: &runtime,
                    script: script.as_deref(),
                };
                self.log_failure(&e, &attempt).await;
                return Err(e);
            }
        };

        if cfg.debug_mode {
            tracing::debug!(command = %built.command_line, "Built notification command");
        }

        let hard_timeout = self.hard_timeout(&request.options);
        let start = Instant::now();
        let execution = {
            let _permit = self.inner.limiter.acquire().await.ok();
            invoker::execute(self.inner.platform, &built.command_line, hard_timeout).await
        };

        match execution {
            Err(e) => {
                self.inner.monitor.record(start.elapsed(), false);
                let output = e.to_string();
                let err = NotifyError::RuntimeUnavailable {
                    runtime: runtime.display().to_string(),
                    output: output.clone(),
                };
                let attempt = Attempt {
                    command: &built.command_line,
                    exit_code: None,
                    output: &output,
                    runtime: &runtime,
                    script: script.as_deref(),
                };
                self.log_failure(&err, &attempt).await;
                Err(err)
            }
            Ok(Execution::TimedOut(elapsed)) => {
                self.inner.monitor.record(elapsed, true);
                if cfg.log_notifications {
                    let kind = ErrorKind::Timeout;
                    tracing::warn!(
                        kind = kind.as_str(),
                        platform = self.inner.platform.name(),
                        command = %built.command_line,
                        elapsed_ms = millis(elapsed),
                        recommendation = kind.recommendation(),
                        "Desktop notification worker timed out"
                    );
                }
                Ok(DispatchReport {
                    command: built,
                    elapsed,
                    output: String::new(),
                    timed_out: true,
                })
            }
            Ok(Execution::Finished(result)) if result.success() => {
                self.inner.monitor.record(result.elapsed, true);
                if cfg.log_notifications {
                    tracing::info!(
                        title = %request.title,
                        exit_code = 0_i64,
                        elapsed_ms = millis(result.elapsed),
                        "Desktop notification sent"
                    );
                }
                Ok(DispatchReport {
                    output: result.combined_output(),
                    elapsed: result.elapsed,
                    command: built,
                    timed_out: false,
                })
            }
            Ok(Execution::Finished(result)) => {
                self.inner.monitor.record(result.elapsed, false);
                let output = result.combined_output();
                let err = self.failure_error(&result, &output, &runtime, script.as_deref());
                let attempt = Attempt {
                    command: &built.command_line,
                    exit_code: result.exit_code,
                    output: &output,
                    runtime: &runtime,
                    script: script.as_deref(),
                };
                self.log_failure(&err, &attempt).await;
                Err(err)
            }
        }
    }

    fn failure_error(
        &self,
        result: &ExecutionResult,
        output: &str,
        runtime: &Path,
        script: Option<&Path>,
    ) -> NotifyError {
        let kind = classify(&FailureContext {
            output,
            exit_code: result.exit_code,
            runtime_present: runtime::is_present(runtime),
            script_present: script.is_none_or(Path::is_file),
            script_path: script,
        });

        let output = output.to_string();
        match kind {
            ErrorKind::RuntimeUnavailable => NotifyError::RuntimeUnavailable {
                runtime: runtime.display().to_string(),
                output,
            },
            ErrorKind::ScriptUnavailable => NotifyError::ScriptUnavailable {
                path: script.map(Path::to_path_buf).unwrap_or_default(),
                output,
            },
            ErrorKind::DependencyMissing => NotifyError::DependencyMissing { output },
            ErrorKind::EncodingError => NotifyError::Encoding(output),
            ErrorKind::NativeNotifyError | ErrorKind::Timeout => NotifyError::NativeNotify {
                exit_code: result.exit_code,
                output,
            },
        }
    }

    async fn log_failure(&self, err: &NotifyError, attempt: &Attempt<'_>) {
        if !self.inner.config.log_notifications {
            return;
        }
        let probe = self.probe_runtime().await;
        let kind = err.kind();
        let script_path = attempt
            .script
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        tracing::error!(
            kind = kind.as_str(),
            platform = self.inner.platform.name(),
            command = attempt.command,
            exit_code = attempt.exit_code.map(i64::from),
            output = attempt.output,
            runtime_path = %attempt.runtime.display(),
            runtime_present = runtime::is_present(attempt.runtime),
            runtime_available = probe.available,
            runtime_version = probe.version.as_deref().unwrap_or(""),
            script_path = %script_path,
            script_available = self.is_script_available(),
            recommendation = kind.recommendation(),
            "Desktop notification failed: {err}"
        );
    }
}

/// Inputs of one invocation, for the failure record.
struct Attempt<'a> {
    command: &'a str,
    exit_code: Option<i32>,
    output: &'a str,
    runtime: &'a Path,
    script: Option<&'a Path>,
}

impl Notify for DesktopNotifier {
    async fn notify(&self, title: &str, message: &str, options: NotificationOptions) -> bool {
        self.dispatch(title, message, options).await.is_ok()
    }

    fn severity_icon(&self, severity: Severity) -> Option<PathBuf> {
        self.inner.config.icons.get(severity).cloned()
    }

    /// Chunks of `batch_size` items with `batch_delay_ms` between chunks.
    async fn notify_batch(&self, items: Vec<BatchItem>) -> Vec<BatchResult> {
        let chunk_size = self.inner.config.batch_size.max(1);
        let delay = Duration::from_millis(self.inner.config.batch_delay_ms);
        let chunk_count = items.len().div_ceil(chunk_size);

        let mut results = Vec::with_capacity(items.len());
        for (idx, chunk) in items.chunks(chunk_size).enumerate() {
            for item in chunk {
                let start = Instant::now();
                let success = self
                    .notify(&item.title, &item.message, item.options.clone())
                    .await;
                results.push(BatchResult {
                    success,
                    elapsed_ms: millis(start.elapsed()),
                });
            }
            if idx + 1 < chunk_count && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
        results
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
