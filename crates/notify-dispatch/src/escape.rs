//! Host shell quoting.
//!
//! POSIX hosts get single-quote wrapping. Windows hosts go through
//! `cmd.exe`, so the payload is additionally encoded without raw quotes,
//! backslashes or cmd metacharacters inside JSON strings.

use std::io;

use serde::Serialize;
use serde_json::ser::{CharEscape, CompactFormatter, Formatter};

use crate::{NotifyError, Result};

/// Characters `cmd.exe` would interpret inside an argument.
const CMD_METACHARACTERS: &[char] = &['%', '^', '&', '|', '<', '>', '!'];

/// Longest accepted command line on Windows (`cmd.exe` limit).
const WINDOWS_MAX_COMMAND_LEN: usize = 8191;

/// Longest accepted single argument on POSIX (Linux `MAX_ARG_STRLEN`).
const POSIX_MAX_ARG_LEN: usize = 128 * 1024;

/// Shell family the command line is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostPlatform {
    Posix,
    Windows,
}

impl HostPlatform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Posix => std::env::consts::OS,
            Self::Windows => "windows",
        }
    }

    /// Quote one argument so the host shell passes it through verbatim.
    pub fn escape_arg(self, arg: &str) -> String {
        match self {
            Self::Posix => escape_posix(arg),
            Self::Windows => escape_windows(arg),
        }
    }

    /// Quote an executable unless it is a bare command name left to PATH.
    pub fn quote_program(self, program: &str) -> String {
        if is_bare_command(program) {
            return program.to_string();
        }
        match self {
            Self::Posix => escape_posix(program),
            Self::Windows => format!("\"{}\"", program.trim_matches('"')),
        }
    }

    /// Serialize `value` to compact JSON suitable for this shell.
    pub fn encode_payload<T: Serialize>(self, value: &T) -> Result<String> {
        match self {
            Self::Posix => Ok(serde_json::to_string(value)?),
            Self::Windows => {
                let mut buf = Vec::with_capacity(256);
                let mut ser = serde_json::Serializer::with_formatter(&mut buf, CmdSafeFormatter);
                value.serialize(&mut ser)?;
                String::from_utf8(buf).map_err(|e| NotifyError::Encoding(e.to_string()))
            }
        }
    }

    /// Reject command lines the host cannot pass to a child process.
    pub fn check_length(self, command_line: &str, payload_arg: &str) -> Result<()> {
        let (len, max) = match self {
            Self::Posix => (payload_arg.len(), POSIX_MAX_ARG_LEN),
            Self::Windows => (command_line.chars().count(), WINDOWS_MAX_COMMAND_LEN),
        };
        if len > max {
            return Err(NotifyError::Encoding(format!(
                "command too long for {} shell ({len} > {max})",
                self.name()
            )));
        }
        Ok(())
    }
}

/// POSIX single-argument escaping: `'...'` with `'` written as `'\''`.
pub fn escape_posix(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

/// Windows escaping: `"..."` with embedded `"` written as `\"`.
pub fn escape_windows(arg: &str) -> String {
    format!("\"{}\"", arg.replace('"', "\\\""))
}

/// A name without path separators that only contains safe characters.
pub fn is_bare_command(program: &str) -> bool {
    !program.is_empty()
        && program
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// JSON formatter that keeps string contents free of characters
/// `cmd.exe` or the MSVC argument parser would reinterpret.
struct CmdSafeFormatter;

impl Formatter for CmdSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (idx, ch) in fragment.char_indices() {
            if CMD_METACHARACTERS.contains(&ch) {
                writer.write_all(fragment[start..idx].as_bytes())?;
                write!(writer, "\\u{:04x}", ch as u32)?;
                start = idx + ch.len_utf8();
            }
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn write_char_escape<W>(&mut self, writer: &mut W, char_escape: CharEscape) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        match char_escape {
            CharEscape::Quote => writer.write_all(b"\\u0022"),
            CharEscape::ReverseSolidus => writer.write_all(b"\\u005c"),
            other => CompactFormatter.write_char_escape(writer, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify_presets::{NotificationOptions, NotificationRequest};

    const NASTY: &str = r#"it's "quoted" \ $HOME `id` <a> & b | c ^ 100% !x"#;

    #[test]
    fn posix_escaping_wraps_and_escapes_single_quotes() {
        assert_eq!(escape_posix("plain"), "'plain'");
        assert_eq!(escape_posix("it's"), r"'it'\''s'");
        assert_eq!(escape_posix(""), "''");
    }

    #[test]
    fn windows_escaping_wraps_and_escapes_double_quotes() {
        assert_eq!(escape_windows(r#"say "hi""#), r#""say \"hi\"""#);
    }

    #[test]
    fn bare_command_names_stay_unquoted() {
        assert_eq!(HostPlatform::Posix.quote_program("node"), "node");
        assert_eq!(HostPlatform::Windows.quote_program("node"), "node");
        assert_eq!(
            HostPlatform::Posix.quote_program("/opt/my node/bin/node"),
            "'/opt/my node/bin/node'"
        );
        assert_eq!(
            HostPlatform::Windows.quote_program(r#""C:\Program Files\nodejs\node.exe""#),
            r#""C:\Program Files\nodejs\node.exe""#
        );
    }

    #[test]
    fn windows_payload_has_no_raw_metacharacters_in_strings() {
        let req = NotificationRequest::new(NASTY, NASTY, NotificationOptions::new());
        let payload = HostPlatform::Windows.encode_payload(&req).unwrap();

        for ch in CMD_METACHARACTERS {
            assert!(!payload.contains(*ch), "raw {ch} in {payload}");
        }
        assert!(!payload.contains("\\\""));
        assert!(!payload.contains("\\\\"));

        let decoded: NotificationRequest = serde_json::from_str(&payload).unwrap();
        assert_eq!(decoded.title, NASTY);
        assert_eq!(decoded.message, NASTY);
    }

    #[test]
    fn windows_escaped_payload_round_trips_through_argv_rules() {
        let req = NotificationRequest::new(NASTY, "C:\\temp\\", NotificationOptions::new());
        let payload = HostPlatform::Windows.encode_payload(&req).unwrap();
        let escaped = escape_windows(&payload);

        // No backslash ever precedes a quote in the payload, so undoing
        // the wrapper is a plain `\"` -> `"` replacement.
        let inner = &escaped[1..escaped.len() - 1];
        let unescaped = inner.replace("\\\"", "\"");
        assert_eq!(unescaped, payload);

        let decoded: NotificationRequest = serde_json::from_str(&unescaped).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn posix_payload_is_plain_compact_json() {
        let req = NotificationRequest::new("a/b", "ü", NotificationOptions::new());
        assert_eq!(
            HostPlatform::Posix.encode_payload(&req).unwrap(),
            r#"{"title":"a/b","message":"ü","options":{}}"#
        );
    }

    #[test]
    fn oversized_command_is_an_encoding_error() {
        let long = "x".repeat(WINDOWS_MAX_COMMAND_LEN + 1);
        let err = HostPlatform::Windows
            .check_length(&long, &long)
            .unwrap_err();
        assert!(matches!(err, NotifyError::Encoding(_)));
        assert!(HostPlatform::Posix.check_length(&long, &long).is_ok());
    }
}
