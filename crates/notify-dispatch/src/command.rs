//! Request Builder: turns a merged request into one shell command line.

use std::path::Path;

use serde::Serialize;

use notify_presets::NotificationRequest;

use crate::escape::HostPlatform;
use crate::{NotifyError, Result};

/// A fully escaped command ready for the host shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuiltCommand {
    /// `{runtime} [{script}] {payload}` as handed to the shell.
    pub command_line: String,
    pub runtime: String,
    pub script: Option<String>,
    /// Encoded request before shell escaping.
    pub payload: String,
}

/// Build the command line for `request`.
///
/// `script` is `None` when the runtime is the native worker itself.
pub fn build_command(
    platform: HostPlatform,
    runtime: &Path,
    script: Option<&Path>,
    request: &NotificationRequest,
) -> Result<BuiltCommand> {
    let runtime = path_str(runtime)?;
    let script = script.map(path_str).transpose()?;
    let payload = platform.encode_payload(request)?;
    let payload_arg = platform.escape_arg(&payload);

    let mut parts = vec![platform.quote_program(&runtime)];
    if let Some(script) = &script {
        parts.push(platform.escape_arg(script));
    }
    parts.push(payload_arg.clone());
    let command_line = parts.join(" ");

    platform.check_length(&command_line, &payload_arg)?;

    Ok(BuiltCommand {
        command_line,
        runtime,
        script,
        payload,
    })
}

fn path_str(path: &Path) -> Result<String> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| NotifyError::Encoding(format!("path is not valid UTF-8: {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify_presets::NotificationOptions;

    fn request() -> NotificationRequest {
        NotificationRequest::new(
            "Hello",
            "World",
            NotificationOptions::new().with_position("top-right"),
        )
    }

    #[test]
    fn posix_command_has_three_segments() {
        let built = build_command(
            HostPlatform::Posix,
            Path::new("node"),
            Some(Path::new("/opt/app/vendor/desktop-notifier/notifier.js")),
            &request(),
        )
        .unwrap();
        assert_eq!(
            built.command_line,
            format!(
                "node '/opt/app/vendor/desktop-notifier/notifier.js' '{}'",
                built.payload
            )
        );
        assert_eq!(
            built.payload,
            r#"{"title":"Hello","message":"World","options":{"position":"top-right"}}"#
        );
    }

    #[test]
    fn standalone_command_omits_script() {
        let built = build_command(
            HostPlatform::Posix,
            Path::new("/usr/local/bin/notifier-worker"),
            None,
            &request(),
        )
        .unwrap();
        assert!(built.command_line.starts_with("'/usr/local/bin/notifier-worker' '{"));
        assert_eq!(built.script, None);
    }

    #[test]
    fn windows_command_quotes_runtime_with_spaces() {
        let built = build_command(
            HostPlatform::Windows,
            Path::new(r"C:\Program Files\nodejs\node.exe"),
            Some(Path::new(r"C:\app\notifier.js")),
            &request(),
        )
        .unwrap();
        assert!(
            built
                .command_line
                .starts_with(r#""C:\Program Files\nodejs\node.exe" "C:\app\notifier.js" "{\"title\""#)
        );
    }

    #[test]
    fn oversized_windows_payload_is_rejected() {
        let req = NotificationRequest::new("T", "x".repeat(9000), NotificationOptions::new());
        let err = build_command(HostPlatform::Windows, Path::new("node"), None, &req).unwrap_err();
        assert!(matches!(err, NotifyError::Encoding(_)));
    }
}
