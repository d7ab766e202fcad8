//! OS notification backend built on notify-rust.

use notify_rust::{Notification, Timeout};

use notify_presets::sound::PLATFORM_DEFAULT_SOUND;
use notify_presets::{RenderPlan, SoundChoice};

use crate::lifecycle::{BackendError, Delivery, NotificationBackend};

/// Action key the notification service reports for a dismissed notification.
#[cfg(all(unix, not(target_os = "macos")))]
const CLOSED_ACTION: &str = "__closed";

impl From<notify_rust::error::Error> for BackendError {
    fn from(e: notify_rust::error::Error) -> Self {
        Self::Native(e.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct NativeBackend {
    app_name: String,
}

impl NativeBackend {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    /// Translate a plan into a notify-rust notification.
    pub fn build(&self, plan: &RenderPlan) -> Notification {
        let mut notification = Notification::new();
        notification
            .summary(&plan.title)
            .body(&plan.message)
            .appname(&self.app_name)
            .timeout(Timeout::Milliseconds(
                u32::try_from(plan.timeout_ms).unwrap_or(u32::MAX),
            ));

        if let Some(icon) = &plan.icon {
            notification.icon(&icon.to_string_lossy());
        }

        match &plan.sound {
            SoundChoice::Off => {}
            SoundChoice::PlatformDefault => {
                notification.sound_name(PLATFORM_DEFAULT_SOUND);
            }
            SoundChoice::File(path) => apply_sound_file(&mut notification, path),
        }

        apply_presentation(&mut notification, plan);
        notification
    }
}

impl NotificationBackend for NativeBackend {
    fn deliver(&self, plan: &RenderPlan) -> Result<Delivery, BackendError> {
        let notification = self.build(plan);
        tracing::debug!(
            title = %plan.title,
            x = plan.position.coordinates().x,
            y = plan.position.coordinates().y,
            theme = plan.theme.name,
            animation = ?plan.animation.kind,
            size = plan.size.name,
            wait = plan.wait,
            "Showing native notification"
        );
        show(&notification, plan.wait)
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn apply_sound_file(notification: &mut Notification, path: &std::path::Path) {
    notification.hint(notify_rust::Hint::SoundFile(
        path.to_string_lossy().into_owned(),
    ));
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn apply_sound_file(notification: &mut Notification, path: &std::path::Path) {
    // Only freedesktop servers play arbitrary files.
    tracing::debug!(sound = %path.display(), "Custom sound file unsupported; using default sound");
    notification.sound_name(PLATFORM_DEFAULT_SOUND);
}

/// Placement and styling hints. Servers that do not understand them
/// ignore them.
#[cfg(all(unix, not(target_os = "macos")))]
fn apply_presentation(notification: &mut Notification, plan: &RenderPlan) {
    use notify_rust::Hint;

    let coords = plan.position.coordinates();
    notification.hint(Hint::X(coords.x)).hint(Hint::Y(coords.y));

    let theme = &plan.theme.value;
    for (key, value) in [
        ("x-desktop-notifier-theme", plan.theme.name.to_string()),
        ("x-desktop-notifier-background", theme.background_color.to_string()),
        ("x-desktop-notifier-text-color", theme.text_color.to_string()),
        ("x-desktop-notifier-border-color", theme.border_color.to_string()),
        (
            "x-desktop-notifier-animation",
            serde_json::to_string(&plan.animation).unwrap_or_default(),
        ),
        (
            "x-desktop-notifier-size",
            format!("{}x{}", plan.size.value.width, plan.size.value.height),
        ),
    ] {
        notification.hint(Hint::Custom(key.to_string(), value));
    }

    if plan.wait {
        notification.action("default", "Open");
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn apply_presentation(_notification: &mut Notification, _plan: &RenderPlan) {}

#[cfg(all(unix, not(target_os = "macos")))]
fn show(notification: &Notification, wait: bool) -> Result<Delivery, BackendError> {
    let handle = notification.show()?;
    if !wait {
        return Ok(Delivery::Shown);
    }

    let mut delivery = Delivery::Closed;
    handle.wait_for_action(|action| {
        if action != CLOSED_ACTION {
            delivery = Delivery::Clicked;
        }
    });
    Ok(delivery)
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn show(notification: &Notification, _wait: bool) -> Result<Delivery, BackendError> {
    let _handle = notification.show()?;
    Ok(Delivery::Shown)
}
