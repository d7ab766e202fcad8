//! Request payload passed from the dispatcher to the render worker.
//!
//! Every option is optional on the wire. The dispatcher fills gaps by
//! merging per-call options over configuration over built-in defaults;
//! the worker falls back to preset defaults for anything still missing.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::animation::DEFAULT_ANIMATION;
use crate::position::{Coordinates, DEFAULT_POSITION};
use crate::size::DEFAULT_SIZE;
use crate::theme::DEFAULT_THEME;
use crate::{ProtocolError, Result};

/// Display timeout used when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Title used by the worker when the request carries an empty one.
pub const FALLBACK_TITLE: &str = "Desktop Notification";

/// Explicit placement. Only honoured when both axes are present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPosition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
}

impl CustomPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates {
            x: self.x?,
            y: self.y?,
        })
    }
}

/// Per-notification options (the OptionSet).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<PathBuf>,

    /// `Some(false)` disables sound outright.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_sound_file: Option<PathBuf>,

    /// Display timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_position: Option<CustomPosition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,

    /// Animation duration in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_duration: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Keep the worker alive for click/close callbacks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait: Option<bool>,
}

impl NotificationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hard-coded defaults at the bottom of the merge chain.
    ///
    /// Animation duration is left unset so the animation preset's own
    /// default applies.
    pub fn builtin() -> Self {
        Self {
            icon: None,
            sound: Some(true),
            custom_sound_file: None,
            timeout: Some(DEFAULT_TIMEOUT_MS),
            position: Some(DEFAULT_POSITION.into()),
            custom_position: None,
            ui_theme: Some(DEFAULT_THEME.into()),
            animation: Some(DEFAULT_ANIMATION.into()),
            animation_duration: None,
            size: Some(DEFAULT_SIZE.into()),
            wait: Some(false),
        }
    }

    /// Field-by-field merge: values set on `self` win, gaps come from `base`.
    pub fn merged_over(&self, base: &NotificationOptions) -> NotificationOptions {
        NotificationOptions {
            icon: self.icon.clone().or_else(|| base.icon.clone()),
            sound: self.sound.or(base.sound),
            custom_sound_file: self
                .custom_sound_file
                .clone()
                .or_else(|| base.custom_sound_file.clone()),
            timeout: self.timeout.or(base.timeout),
            position: self.position.clone().or_else(|| base.position.clone()),
            custom_position: self.custom_position.or(base.custom_position),
            ui_theme: self.ui_theme.clone().or_else(|| base.ui_theme.clone()),
            animation: self.animation.clone().or_else(|| base.animation.clone()),
            animation_duration: self.animation_duration.or(base.animation_duration),
            size: self.size.clone().or_else(|| base.size.clone()),
            wait: self.wait.or(base.wait),
        }
    }

    /// Builder: set icon path.
    pub fn with_icon(mut self, icon: impl Into<PathBuf>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Builder: enable or disable sound.
    pub fn with_sound(mut self, enabled: bool) -> Self {
        self.sound = Some(enabled);
        self
    }

    /// Builder: set a custom sound file.
    pub fn with_custom_sound_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.custom_sound_file = Some(path.into());
        self
    }

    /// Builder: set display timeout in milliseconds.
    pub fn with_timeout(mut self, ms: u64) -> Self {
        self.timeout = Some(ms);
        self
    }

    /// Builder: set a named position preset.
    pub fn with_position(mut self, name: impl Into<String>) -> Self {
        self.position = Some(name.into());
        self
    }

    /// Builder: set explicit coordinates.
    pub fn with_custom_position(mut self, x: i32, y: i32) -> Self {
        self.custom_position = Some(CustomPosition::new(x, y));
        self
    }

    /// Builder: set theme name.
    pub fn with_theme(mut self, name: impl Into<String>) -> Self {
        self.ui_theme = Some(name.into());
        self
    }

    /// Builder: set animation name.
    pub fn with_animation(mut self, name: impl Into<String>) -> Self {
        self.animation = Some(name.into());
        self
    }

    /// Builder: set animation duration in milliseconds.
    pub fn with_animation_duration(mut self, ms: u32) -> Self {
        self.animation_duration = Some(ms);
        self
    }

    /// Builder: set size name.
    pub fn with_size(mut self, name: impl Into<String>) -> Self {
        self.size = Some(name.into());
        self
    }

    /// Builder: wait for interaction callbacks.
    pub fn with_wait(mut self, wait: bool) -> Self {
        self.wait = Some(wait);
        self
    }
}

/// One notification as carried in the worker's single argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub options: NotificationOptions,
    /// Margin past the display timeout before the worker forces its exit.
    /// The dispatcher sets it from its own config so both sides agree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_ms: Option<u64>,
}

impl NotificationRequest {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        options: NotificationOptions,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            options,
            grace_ms: None,
        }
    }

    pub fn with_grace_ms(mut self, ms: u64) -> Self {
        self.grace_ms = Some(ms);
        self
    }

    /// Compact JSON; Unicode and forward slashes are written unescaped.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(payload: &str) -> Result<Self> {
        if payload.trim().is_empty() {
            return Err(ProtocolError::MissingPayload);
        }
        Ok(serde_json::from_str(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_keeps_slashes_and_unicode_unescaped() {
        let req = NotificationRequest::new(
            "Déploiement ✓",
            "see /var/log/app.log",
            NotificationOptions::new().with_icon("/opt/icons/ok.png"),
        );
        let encoded = req.encode().unwrap();
        assert!(encoded.contains("Déploiement ✓"));
        assert!(encoded.contains("/var/log/app.log"));
        assert!(encoded.contains(r#""icon":"/opt/icons/ok.png""#));
        assert!(!encoded.contains("\\/"));
    }

    #[test]
    fn absent_options_are_omitted() {
        let encoded = NotificationRequest::new("T", "M", NotificationOptions::new())
            .encode()
            .unwrap();
        assert_eq!(encoded, r#"{"title":"T","message":"M","options":{}}"#);
    }

    #[test]
    fn decode_tolerates_missing_options_and_unknown_keys() {
        let req = NotificationRequest::decode(
            r#"{"title":"a","message":"b","options":{"custom_css":".x{}","timeout":1200}}"#,
        )
        .unwrap();
        assert_eq!(req.options.timeout, Some(1200));

        let bare = NotificationRequest::decode(r#"{"title":"a","message":"b"}"#).unwrap();
        assert_eq!(bare.options, NotificationOptions::default());
    }

    #[test]
    fn decode_rejects_empty_and_malformed() {
        assert!(matches!(
            NotificationRequest::decode("  "),
            Err(ProtocolError::MissingPayload)
        ));
        assert!(matches!(
            NotificationRequest::decode("{not json"),
            Err(ProtocolError::Decode(_))
        ));
    }

    #[test]
    fn merge_is_field_by_field() {
        let config = NotificationOptions::new()
            .with_theme("dark")
            .with_timeout(8000);
        let call = NotificationOptions::new().with_position("top-left");

        let merged = call
            .merged_over(&config)
            .merged_over(&NotificationOptions::builtin());

        assert_eq!(merged.position.as_deref(), Some("top-left"));
        assert_eq!(merged.ui_theme.as_deref(), Some("dark"));
        assert_eq!(merged.timeout, Some(8000));
        assert_eq!(merged.animation.as_deref(), Some("slide"));
        assert_eq!(merged.sound, Some(true));
    }

    #[test]
    fn merge_is_associative() {
        let builtin = NotificationOptions::builtin();
        let config = NotificationOptions::new()
            .with_sound(false)
            .with_size("large")
            .with_custom_position(1, 2);
        let call = NotificationOptions::new()
            .with_size("small")
            .with_animation("fade")
            .with_animation_duration(90);

        let left = call.merged_over(&config).merged_over(&builtin);
        let right = call.merged_over(&config.merged_over(&builtin));
        assert_eq!(left, right);
        assert_eq!(left.size.as_deref(), Some("small"));
        assert_eq!(left.sound, Some(false));
        assert_eq!(left.custom_position, Some(CustomPosition::new(1, 2)));
    }
}
