//! Screen placement presets.
//!
//! Named positions are anchored inside an assumed display rather than the
//! real monitor geometry, which the worker never queries.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::request::CustomPosition;
use crate::table::{Preset, PresetTable};

/// Assumed display size used for anchoring named positions.
pub const ASSUMED_DISPLAY_WIDTH: i32 = 1920;
pub const ASSUMED_DISPLAY_HEIGHT: i32 = 1080;

/// Assumed notification footprint.
pub const FOOTPRINT_WIDTH: i32 = 330;
pub const FOOTPRINT_HEIGHT: i32 = 100;

/// Distance kept from the display edges.
pub const SCREEN_MARGIN: i32 = 20;

pub const DEFAULT_POSITION: &str = "bottom-right";

/// Absolute screen coordinates of the notification's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    Left,
    Center,
    Right,
}

/// Corner/center combination a named position pins the footprint to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub vertical: Vertical,
    pub horizontal: Horizontal,
}

impl Anchor {
    const fn new(vertical: Vertical, horizontal: Horizontal) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    pub fn coordinates(self) -> Coordinates {
        let x = match self.horizontal {
            Horizontal::Left => SCREEN_MARGIN,
            Horizontal::Center => (ASSUMED_DISPLAY_WIDTH - FOOTPRINT_WIDTH) / 2,
            Horizontal::Right => ASSUMED_DISPLAY_WIDTH - FOOTPRINT_WIDTH - SCREEN_MARGIN,
        };
        let y = match self.vertical {
            Vertical::Top => SCREEN_MARGIN,
            Vertical::Bottom => ASSUMED_DISPLAY_HEIGHT - FOOTPRINT_HEIGHT - SCREEN_MARGIN,
        };
        Coordinates { x, y }
    }
}

pub static POSITIONS: LazyLock<PresetTable<Anchor>> = LazyLock::new(|| {
    use Horizontal::*;
    use Vertical::*;

    PresetTable::new(
        Preset {
            name: DEFAULT_POSITION,
            value: Anchor::new(Bottom, Right),
        },
        [
            Preset {
                name: "top-right",
                value: Anchor::new(Top, Right),
            },
            Preset {
                name: "top-left",
                value: Anchor::new(Top, Left),
            },
            Preset {
                name: "bottom-left",
                value: Anchor::new(Bottom, Left),
            },
            Preset {
                name: "top-center",
                value: Anchor::new(Top, Center),
            },
            Preset {
                name: "bottom-center",
                value: Anchor::new(Bottom, Center),
            },
        ],
    )
});

/// Where the notification ends up, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedPosition {
    Preset {
        name: &'static str,
        coordinates: Coordinates,
    },
    /// Caller-supplied coordinates, passed through unvalidated.
    Custom(Coordinates),
}

impl ResolvedPosition {
    pub fn coordinates(&self) -> Coordinates {
        match self {
            Self::Preset { coordinates, .. } => *coordinates,
            Self::Custom(coordinates) => *coordinates,
        }
    }
}

/// Resolve placement. Explicit coordinates win whenever both axes are given.
pub fn resolve_position(name: Option<&str>, custom: Option<&CustomPosition>) -> ResolvedPosition {
    if let Some(coordinates) = custom.and_then(CustomPosition::coordinates) {
        return ResolvedPosition::Custom(coordinates);
    }

    let preset = POSITIONS.lookup(name);
    ResolvedPosition::Preset {
        name: preset.name,
        coordinates: preset.value.coordinates(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preset_xy(name: &str) -> (i32, i32) {
        let c = POSITIONS.lookup(Some(name)).value.coordinates();
        (c.x, c.y)
    }

    #[test]
    fn canonical_preset_coordinates() {
        assert_eq!(preset_xy("top-right"), (1570, 20));
        assert_eq!(preset_xy("top-left"), (20, 20));
        assert_eq!(preset_xy("bottom-right"), (1570, 960));
        assert_eq!(preset_xy("bottom-left"), (20, 960));
        assert_eq!(preset_xy("top-center"), (795, 20));
        assert_eq!(preset_xy("bottom-center"), (795, 960));
    }

    #[test]
    fn six_canonical_names_default_first() {
        assert_eq!(
            POSITIONS.names(),
            vec![
                "bottom-right",
                "top-right",
                "top-left",
                "bottom-left",
                "top-center",
                "bottom-center"
            ]
        );
    }

    #[test]
    fn unknown_name_resolves_to_bottom_right() {
        let resolved = resolve_position(Some("middle-ish"), None);
        assert_eq!(
            resolved,
            ResolvedPosition::Preset {
                name: "bottom-right",
                coordinates: Coordinates { x: 1570, y: 960 },
            }
        );
    }

    #[test]
    fn explicit_coordinates_override_every_named_combination() {
        let custom = CustomPosition::new(100, 100);
        for name in [None, Some("top-left"), Some("bogus")] {
            for coords in [None, Some(&custom)] {
                let resolved = resolve_position(name, coords);
                match coords {
                    Some(_) => assert_eq!(
                        resolved,
                        ResolvedPosition::Custom(Coordinates { x: 100, y: 100 })
                    ),
                    None => assert!(matches!(resolved, ResolvedPosition::Preset { .. })),
                }
            }
        }
    }

    #[test]
    fn partial_coordinates_are_ignored() {
        let partial = CustomPosition {
            x: Some(5),
            y: None,
        };
        let resolved = resolve_position(Some("top-left"), Some(&partial));
        assert_eq!(resolved.coordinates(), Coordinates { x: 20, y: 20 });
    }

    #[test]
    fn out_of_bounds_coordinates_pass_through() {
        let resolved = resolve_position(None, Some(&CustomPosition::new(-50, 99_999)));
        assert_eq!(
            resolved,
            ResolvedPosition::Custom(Coordinates { x: -50, y: 99_999 })
        );
    }
}
