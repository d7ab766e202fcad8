//! Notification request protocol and presentation presets.
//!
//! Shared by the dispatcher (which encodes requests) and the render worker
//! (which decodes them and resolves named presets into concrete parameters).

pub mod animation;
pub mod position;
pub mod request;
pub mod resolve;
pub mod size;
pub mod sound;
pub mod table;
pub mod theme;

// Re-exports for convenience
pub use animation::{AnimationKind, AnimationPreset, ResolvedAnimation};
pub use position::{Coordinates, ResolvedPosition};
pub use request::{CustomPosition, NotificationOptions, NotificationRequest};
pub use resolve::RenderPlan;
pub use size::SizePreset;
pub use sound::SoundChoice;
pub use table::{Preset, PresetTable};
pub use theme::ThemePreset;

/// Errors raised while decoding a notification request.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("No notification data provided")]
    MissingPayload,

    #[error("Error parsing notification data: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
