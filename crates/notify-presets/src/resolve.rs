//! Turns a decoded request into concrete rendering parameters.

use std::path::PathBuf;

use crate::animation::{ResolvedAnimation, resolve_animation};
use crate::position::{ResolvedPosition, resolve_position};
use crate::request::{DEFAULT_TIMEOUT_MS, FALLBACK_TITLE, NotificationRequest};
use crate::size::{SIZES, SizePreset};
use crate::sound::{SoundChoice, resolve_sound};
use crate::table::Preset;
use crate::theme::{THEMES, ThemePreset};

/// Fully resolved rendering options handed to the native notification call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub title: String,
    pub message: String,
    pub icon: Option<PathBuf>,
    pub sound: SoundChoice,
    pub timeout_ms: u64,
    pub position: ResolvedPosition,
    pub theme: Preset<ThemePreset>,
    pub animation: ResolvedAnimation,
    pub size: Preset<SizePreset>,
    pub wait: bool,
}

impl RenderPlan {
    pub fn from_request(request: &NotificationRequest) -> Self {
        let opts = &request.options;

        let title = if request.title.is_empty() {
            FALLBACK_TITLE.to_string()
        } else {
            request.title.clone()
        };

        Self {
            title,
            message: request.message.clone(),
            icon: opts.icon.clone().filter(|p| !p.as_os_str().is_empty()),
            sound: resolve_sound(opts.sound, opts.custom_sound_file.as_deref()),
            timeout_ms: opts
                .timeout
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_TIMEOUT_MS),
            position: resolve_position(opts.position.as_deref(), opts.custom_position.as_ref()),
            theme: *THEMES.lookup(opts.ui_theme.as_deref()),
            animation: resolve_animation(opts.animation.as_deref(), opts.animation_duration),
            size: *SIZES.lookup(opts.size.as_deref()),
            wait: opts.wait.unwrap_or(false),
        }
    }
}
