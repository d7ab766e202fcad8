//! Notification sound selection.

use std::path::{Path, PathBuf};

#[cfg(all(unix, not(target_os = "macos")))]
pub const PLATFORM_DEFAULT_SOUND: &str = "message-new-instant";

#[cfg(not(all(unix, not(target_os = "macos"))))]
pub const PLATFORM_DEFAULT_SOUND: &str = "Default";

/// Accepted custom sound file extensions.
pub const SOUND_EXTENSIONS: &[&str] = &["wav", "mp3", "ogg"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundChoice {
    Off,
    File(PathBuf),
    PlatformDefault,
}

impl SoundChoice {
    pub fn is_off(&self) -> bool {
        matches!(self, Self::Off)
    }
}

/// Resolve the sound for one notification.
///
/// `enabled == Some(false)` silences the notification even when a custom
/// file is supplied. A custom file is only used when it exists on disk.
pub fn resolve_sound(enabled: Option<bool>, custom_file: Option<&Path>) -> SoundChoice {
    if enabled == Some(false) {
        return SoundChoice::Off;
    }
    match custom_file {
        Some(path) if path.is_file() => SoundChoice::File(path.to_path_buf()),
        _ => SoundChoice::PlatformDefault,
    }
}

/// Whether `path` has one of the accepted sound file extensions.
pub fn has_sound_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SOUND_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}
