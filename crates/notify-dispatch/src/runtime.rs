//! Runtime Resolver: locates the runtime executable and probes it.
//!
//! Resolution order: explicit configured path, well-known install
//! locations, a PATH lookup, then the bare command name. Results are kept
//! in a [`RuntimeCache`] that lives as long as the resolver's owner.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, LazyLock, RwLock};
use std::time::Duration;

use regex::Regex;
use tokio::process::Command;

static RE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v?\d+(?:\.\d+){0,2}").unwrap());

/// Upper bound for the `--version` probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Binary name of the native worker.
#[cfg(windows)]
pub const WORKER_BINARY: &str = "notifier-worker.exe";
#[cfg(not(windows))]
pub const WORKER_BINARY: &str = "notifier-worker";

/// What to look for when resolving a runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeProfile {
    /// Bare command name, used for PATH lookup and as the last resort.
    pub program: String,
    /// Absolute locations checked before PATH.
    pub install_locations: Vec<PathBuf>,
    pub version_flag: String,
}

impl RuntimeProfile {
    /// Node.js, the interpreter for the render script.
    pub fn node() -> Self {
        Self {
            program: "node".into(),
            install_locations: node_install_locations(),
            version_flag: "--version".into(),
        }
    }

    /// The native worker binary shipped with this workspace.
    pub fn standalone_worker() -> Self {
        let mut install_locations = Vec::new();
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            install_locations.push(dir.join(WORKER_BINARY));
            // Test and bench executables live one level down in cargo's `deps/`.
            if let Some(target) = dir.parent().filter(|_| dir.ends_with("deps")) {
                install_locations.push(target.join(WORKER_BINARY));
            }
        }
        if let Some(home) = dirs::home_dir() {
            install_locations.push(home.join(".cargo").join("bin").join(WORKER_BINARY));
        }
        if cfg!(unix) {
            install_locations.push(Path::new("/usr/local/bin").join(WORKER_BINARY));
            install_locations.push(Path::new("/usr/bin").join(WORKER_BINARY));
        }
        Self {
            program: WORKER_BINARY.into(),
            install_locations,
            version_flag: "--version".into(),
        }
    }
}

#[cfg(windows)]
fn node_install_locations() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from(r"C:\Program Files\nodejs\node.exe"),
        PathBuf::from(r"C:\Program Files (x86)\nodejs\node.exe"),
    ];
    if let Some(roaming) = dirs::config_dir() {
        paths.push(roaming.join("npm").join("node.exe"));
    }
    if let Some(local) = dirs::data_local_dir() {
        paths.push(local.join("Programs").join("nodejs").join("node.exe"));
    }
    paths
}

#[cfg(not(windows))]
fn node_install_locations() -> Vec<PathBuf> {
    [
        "/usr/bin/node",
        "/usr/local/bin/node",
        "/opt/homebrew/bin/node",
        "/usr/local/node/bin/node",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

/// Outcome of running the runtime's version flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeProbe {
    pub available: bool,
    pub version: Option<String>,
}

/// Resolved path and probe result, shared by clones of one notifier.
///
/// Concurrent fills are idempotent; the last writer wins.
#[derive(Debug, Default)]
pub struct RuntimeCache {
    path: RwLock<Option<PathBuf>>,
    probe: RwLock<Option<RuntimeProbe>>,
}

impl RuntimeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything cached so the next call re-resolves.
    pub fn invalidate(&self) {
        if let Ok(mut path) = self.path.write() {
            *path = None;
        }
        if let Ok(mut probe) = self.probe.write() {
            *probe = None;
        }
    }

    fn path(&self) -> Option<PathBuf> {
        self.path.read().ok()?.clone()
    }

    fn store_path(&self, path: &Path) {
        if let Ok(mut slot) = self.path.write() {
            *slot = Some(path.to_path_buf());
        }
    }

    fn probe(&self) -> Option<RuntimeProbe> {
        self.probe.read().ok()?.clone()
    }

    fn store_probe(&self, probe: &RuntimeProbe) {
        if let Ok(mut slot) = self.probe.write() {
            *slot = Some(probe.clone());
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeResolver {
    profile: RuntimeProfile,
    configured: Option<PathBuf>,
    cache: Arc<RuntimeCache>,
}

impl RuntimeResolver {
    pub fn new(profile: RuntimeProfile, configured: Option<PathBuf>, cache: Arc<RuntimeCache>) -> Self {
        Self {
            profile,
            configured,
            cache,
        }
    }

    pub fn profile(&self) -> &RuntimeProfile {
        &self.profile
    }

    pub fn cache(&self) -> &Arc<RuntimeCache> {
        &self.cache
    }

    /// Path of the runtime executable. Always returns something; the bare
    /// program name is the last resort.
    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = self.cache.path() {
            return path;
        }
        let path = self.resolve_uncached();
        self.cache.store_path(&path);
        path
    }

    fn resolve_uncached(&self) -> PathBuf {
        if let Some(configured) = &self.configured {
            return configured.clone();
        }
        if let Some(found) = self.profile.install_locations.iter().find(|p| p.is_file()) {
            return found.clone();
        }
        match which::which(&self.profile.program) {
            Ok(found) => found,
            Err(_) => PathBuf::from(&self.profile.program),
        }
    }

    /// Whether the resolved runtime exists on disk or on PATH, without
    /// running it.
    pub fn is_present(&self) -> bool {
        is_present(&self.resolve())
    }

    /// Cached probe result, if any.
    pub fn cached_probe(&self) -> Option<RuntimeProbe> {
        self.cache.probe()
    }

    /// Run the version flag once and cache the result.
    ///
    /// Callers that bound process concurrency must hold a permit.
    pub async fn probe(&self) -> RuntimeProbe {
        if let Some(probe) = self.cache.probe() {
            return probe;
        }
        let probe = probe_runtime(&self.resolve(), &self.profile.version_flag).await;
        self.cache.store_probe(&probe);
        probe
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }
}

/// Existence check for a runtime path: a file for paths, a PATH hit for
/// bare names.
pub fn is_present(path: &Path) -> bool {
    if path.components().count() > 1 || path.is_absolute() {
        return path.is_file();
    }
    which::which(path).is_ok()
}

async fn probe_runtime(path: &Path, flag: &str) -> RuntimeProbe {
    let child = Command::new(path)
        .arg(flag)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    let output = match tokio::time::timeout(PROBE_TIMEOUT, child).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            tracing::debug!(runtime = %path.display(), "Runtime probe failed to start: {e}");
            return RuntimeProbe {
                available: false,
                version: None,
            };
        }
        Err(_) => {
            tracing::debug!(runtime = %path.display(), "Runtime probe timed out");
            return RuntimeProbe {
                available: false,
                version: None,
            };
        }
    };

    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    let version = parse_version(&text);
    RuntimeProbe {
        available: output.status.success() && version.is_some(),
        version,
    }
}

/// First `v?MAJOR(.MINOR(.PATCH))` token in `output`.
pub fn parse_version(output: &str) -> Option<String> {
    RE_VERSION.find(output).map(|m| m.as_str().to_string())
}
