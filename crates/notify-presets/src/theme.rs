//! Color themes.

use std::sync::LazyLock;

use serde::Serialize;

use crate::table::{Preset, PresetTable};

pub const DEFAULT_THEME: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePreset {
    pub background_color: &'static str,
    pub text_color: &'static str,
    pub border_color: &'static str,
    pub shadow: &'static str,
}

pub static THEMES: LazyLock<PresetTable<ThemePreset>> = LazyLock::new(|| {
    PresetTable::new(
        Preset {
            name: DEFAULT_THEME,
            value: ThemePreset {
                background_color: "#ffffff",
                text_color: "#333333",
                border_color: "#e0e0e0",
                shadow: "0 4px 12px rgba(0,0,0,0.15)",
            },
        },
        [
            Preset {
                name: "modern",
                value: ThemePreset {
                    background_color: "#f8f9fa",
                    text_color: "#212529",
                    border_color: "#dee2e6",
                    shadow: "0 8px 25px rgba(0,0,0,0.1)",
                },
            },
            Preset {
                name: "minimal",
                value: ThemePreset {
                    background_color: "#ffffff",
                    text_color: "#000000",
                    border_color: "#000000",
                    shadow: "none",
                },
            },
            Preset {
                name: "dark",
                value: ThemePreset {
                    background_color: "#2d3748",
                    text_color: "#ffffff",
                    border_color: "#4a5568",
                    shadow: "0 4px 12px rgba(0,0,0,0.3)",
                },
            },
            Preset {
                name: "light",
                value: ThemePreset {
                    background_color: "#ffffff",
                    text_color: "#2d3748",
                    border_color: "#e2e8f0",
                    shadow: "0 2px 8px rgba(0,0,0,0.1)",
                },
            },
        ],
    )
});
