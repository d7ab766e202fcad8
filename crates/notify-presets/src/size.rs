//! Notification window sizes.

use std::sync::LazyLock;

use serde::Serialize;

use crate::table::{Preset, PresetTable};

pub const DEFAULT_SIZE: &str = "medium";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizePreset {
    pub width: u32,
    pub height: u32,
}

pub static SIZES: LazyLock<PresetTable<SizePreset>> = LazyLock::new(|| {
    PresetTable::new(
        Preset {
            name: DEFAULT_SIZE,
            value: SizePreset {
                width: 350,
                height: 100,
            },
        },
        [
            Preset {
                name: "small",
                value: SizePreset {
                    width: 280,
                    height: 80,
                },
            },
            Preset {
                name: "large",
                value: SizePreset {
                    width: 420,
                    height: 120,
                },
            },
        ],
    )
});
