//! Script Locator: finds the render script among ordered candidates.

use std::path::{Path, PathBuf};

/// File name of the render script.
pub const SCRIPT_FILE_NAME: &str = "notifier.js";

/// Directory name the render script is installed under.
pub const SCRIPT_PACKAGE_DIR: &str = "desktop-notifier";

#[derive(Debug, Clone)]
pub struct ScriptLocator {
    /// Never empty; the first entry is the primary location.
    candidates: Vec<PathBuf>,
}

impl ScriptLocator {
    /// Locator over explicit candidates. An empty list falls back to the
    /// default layout under the current directory.
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        if candidates.is_empty() {
            return Self::for_base_path(Path::new("."));
        }
        Self { candidates }
    }

    /// Installed locations under `base`, then development locations.
    pub fn for_base_path(base: &Path) -> Self {
        let mut candidates = vec![
            base.join("vendor").join(SCRIPT_PACKAGE_DIR).join(SCRIPT_FILE_NAME),
            base.join("node_modules")
                .join(SCRIPT_PACKAGE_DIR)
                .join(SCRIPT_FILE_NAME),
            base.join(SCRIPT_FILE_NAME),
        ];
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            candidates.push(dir.join(SCRIPT_FILE_NAME));
        }
        Self { candidates }
    }

    /// First existing candidate, or the primary location when none exist.
    pub fn locate(&self) -> PathBuf {
        self.candidates
            .iter()
            .find(|p| p.is_file())
            .unwrap_or(&self.candidates[0])
            .clone()
    }

    pub fn is_available(&self) -> bool {
        self.candidates.iter().any(|p| p.is_file())
    }

    pub fn primary(&self) -> &Path {
        &self.candidates[0]
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_script_reports_primary_path() {
        let dir = tempfile::tempdir().unwrap();
        let locator = ScriptLocator::for_base_path(dir.path());
        assert!(!locator.is_available());
        assert_eq!(
            locator.locate(),
            dir.path().join("vendor/desktop-notifier/notifier.js")
        );
    }

    #[test]
    fn first_existing_candidate_wins() {
        let dir = tempfile::tempdir().unwrap();
        let nm = dir.path().join("node_modules/desktop-notifier");
        std::fs::create_dir_all(&nm).unwrap();
        std::fs::write(nm.join(SCRIPT_FILE_NAME), "// worker").unwrap();
        std::fs::write(dir.path().join(SCRIPT_FILE_NAME), "// dev").unwrap();

        let locator = ScriptLocator::for_base_path(dir.path());
        assert!(locator.is_available());
        assert_eq!(locator.locate(), nm.join(SCRIPT_FILE_NAME));
    }

    #[test]
    fn empty_candidate_list_uses_default_layout() {
        let locator = ScriptLocator::new(Vec::new());
        assert!(locator.primary().ends_with("vendor/desktop-notifier/notifier.js"));
    }
}
