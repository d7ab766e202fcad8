//! Setting value validation.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use notify_presets::animation::ANIMATIONS;
use notify_presets::position::POSITIONS;
use notify_presets::size::SIZES;
use notify_presets::sound::has_sound_extension;
use notify_presets::theme::THEMES;

static RE_COORDINATES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(-?\d{1,6})\s*,\s*(-?\d{1,6})\s*$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "DESKTOP_NOTIFIER_POSITION" => validate_preset(value, &POSITIONS.names())?,
        "DESKTOP_NOTIFIER_UI_THEME" => validate_preset(value, &THEMES.names())?,
        "DESKTOP_NOTIFIER_ANIMATION" => validate_preset(value, &ANIMATIONS.names())?,
        "DESKTOP_NOTIFIER_SIZE" => validate_preset(value, &SIZES.names())?,
        "DESKTOP_NOTIFIER_CUSTOM_POSITION" => {
            if !value.is_empty() && parse_coordinates(value).is_none() {
                return Err("expected x,y".into());
            }
        }
        "DESKTOP_NOTIFIER_CUSTOM_SOUND_FILE" => {
            if !value.is_empty() && !has_sound_extension(Path::new(value)) {
                return Err("must be a .wav, .mp3 or .ogg file".into());
            }
        }
        "DESKTOP_NOTIFIER_LAUNCH_MODE" => {
            if value != "script" && value != "standalone" {
                return Err("must be 'script' or 'standalone'".into());
            }
        }
        "DESKTOP_NOTIFIER_ANIMATION_DURATION" => {
            if !value.is_empty() {
                validate_int_range(value, 0, 10_000)?
            }
        }
        "DESKTOP_NOTIFIER_TIMEOUT" => validate_int_range(value, 0, 3_600_000)?,
        "DESKTOP_NOTIFIER_BATCH_SIZE" => validate_int_range(value, 1, 1000)?,
        "DESKTOP_NOTIFIER_BATCH_DELAY" => validate_int_range(value, 0, 60_000)?,
        "DESKTOP_NOTIFIER_MAX_CONCURRENT" => validate_int_range(value, 1, 64)?,
        "DESKTOP_NOTIFIER_SLOW_THRESHOLD" => validate_int_range(value, 1, 600_000)?,
        "DESKTOP_NOTIFIER_METRICS_RETENTION" => validate_int_range(value, 1, 100_000)?,
        "DESKTOP_NOTIFIER_WORKER_GRACE" => validate_int_range(value, 0, 60_000)?,
        // Boolean settings
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

/// Parse `x,y` into a coordinate pair.
pub fn parse_coordinates(value: &str) -> Option<(i32, i32)> {
    let caps = RE_COORDINATES.captures(value)?;
    Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
}

fn validate_preset(value: &str, names: &[&str]) -> Result<(), String> {
    if !names.contains(&value) {
        return Err(format!("must be one of: {}", names.join(", ")));
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(
        key,
        "DESKTOP_NOTIFIER_DEFAULT_SOUND"
            | "DESKTOP_NOTIFIER_WAIT"
            | "DESKTOP_NOTIFIER_LOG_NOTIFICATIONS"
            | "DESKTOP_NOTIFIER_DEBUG_MODE"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_boolean() {
        assert!(validate_setting("DESKTOP_NOTIFIER_DEBUG_MODE", "true").is_ok());
        assert!(validate_setting("DESKTOP_NOTIFIER_DEBUG_MODE", "false").is_ok());
        assert!(validate_setting("DESKTOP_NOTIFIER_DEBUG_MODE", "yes").is_err());
    }

    #[test]
    fn test_valid_custom_position() {
        assert!(validate_setting("DESKTOP_NOTIFIER_CUSTOM_POSITION", "100,200").is_ok());
        assert!(validate_setting("DESKTOP_NOTIFIER_CUSTOM_POSITION", " -5 , 40 ").is_ok());
        assert!(validate_setting("DESKTOP_NOTIFIER_CUSTOM_POSITION", "").is_ok());
        assert!(validate_setting("DESKTOP_NOTIFIER_CUSTOM_POSITION", "100").is_err());
        assert!(validate_setting("DESKTOP_NOTIFIER_CUSTOM_POSITION", "a,b").is_err());
        assert_eq!(parse_coordinates("-5,40"), Some((-5, 40)));
    }

    #[test]
    fn test_valid_presets() {
        assert!(validate_setting("DESKTOP_NOTIFIER_POSITION", "top-center").is_ok());
        assert!(validate_setting("DESKTOP_NOTIFIER_POSITION", "middle").is_err());
        assert!(validate_setting("DESKTOP_NOTIFIER_UI_THEME", "dark").is_ok());
        assert!(validate_setting("DESKTOP_NOTIFIER_ANIMATION", "none").is_ok());
        assert!(validate_setting("DESKTOP_NOTIFIER_SIZE", "huge").is_err());
    }

    #[test]
    fn test_valid_ranges() {
        assert!(validate_setting("DESKTOP_NOTIFIER_MAX_CONCURRENT", "0").is_err());
        assert!(validate_setting("DESKTOP_NOTIFIER_MAX_CONCURRENT", "8").is_ok());
        assert!(validate_setting("DESKTOP_NOTIFIER_ANIMATION_DURATION", "").is_ok());
        assert!(validate_setting("DESKTOP_NOTIFIER_ANIMATION_DURATION", "-1").is_err());
        assert!(validate_setting("DESKTOP_NOTIFIER_CUSTOM_SOUND_FILE", "/x/ding.flac").is_err());
        assert!(validate_setting("DESKTOP_NOTIFIER_CUSTOM_SOUND_FILE", "/x/ding.ogg").is_ok());
    }
}
