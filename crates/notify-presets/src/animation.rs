//! Entry animations.

use std::sync::LazyLock;

use serde::Serialize;

use crate::table::{Preset, PresetTable};

pub const DEFAULT_ANIMATION: &str = "slide";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    Slide,
    Fade,
    Bounce,
    Zoom,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationPreset {
    pub kind: AnimationKind,
    pub default_duration_ms: u32,
}

/// Animation after applying any duration override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedAnimation {
    #[serde(rename = "type")]
    pub kind: AnimationKind,
    #[serde(rename = "duration")]
    pub duration_ms: u32,
}

const fn preset(name: &'static str, kind: AnimationKind, ms: u32) -> Preset<AnimationPreset> {
    Preset {
        name,
        value: AnimationPreset {
            kind,
            default_duration_ms: ms,
        },
    }
}

pub static ANIMATIONS: LazyLock<PresetTable<AnimationPreset>> = LazyLock::new(|| {
    PresetTable::new(
        preset(DEFAULT_ANIMATION, AnimationKind::Slide, 300),
        [
            preset("fade", AnimationKind::Fade, 300),
            preset("bounce", AnimationKind::Bounce, 400),
            preset("zoom", AnimationKind::Zoom, 300),
            preset("none", AnimationKind::None, 0),
        ],
    )
});

/// An explicit duration replaces the preset's default, except for `none`
/// which always resolves to zero.
pub fn resolve_animation(name: Option<&str>, duration_override: Option<u32>) -> ResolvedAnimation {
    let preset = ANIMATIONS.lookup(name).value;
    let duration_ms = match preset.kind {
        AnimationKind::None => 0,
        _ => duration_override.unwrap_or(preset.default_duration_ms),
    };
    ResolvedAnimation {
        kind: preset.kind,
        duration_ms,
    }
}
