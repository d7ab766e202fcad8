//! Maps a failed execution onto an [`ErrorKind`].

use std::path::Path;

use crate::ErrorKind;

/// Output fragments meaning the runtime could not be started.
const RUNTIME_MISSING_PATTERNS: &[&str] = &[
    "not found",
    "no such file or directory",
    "is not recognized as an internal or external command",
    "the system cannot find the path specified",
];

/// Output fragments meaning a dependency of the render script is missing.
const DEPENDENCY_PATTERNS: &[&str] = &[
    "cannot find module",
    "err_module_not_found",
    "cannot find package",
];

/// Output fragments meaning the payload reached the worker mangled.
const ENCODING_PATTERNS: &[&str] = &[
    "syntaxerror",
    "error parsing notification data",
    "no notification data provided",
    "unexpected token",
];

/// Exit codes shells use for "command not found".
const NOT_FOUND_EXIT_CODES: &[i32] = &[127, 9009];

/// Everything known about a failed invocation.
#[derive(Debug, Clone, Copy)]
pub struct FailureContext<'a> {
    pub output: &'a str,
    pub exit_code: Option<i32>,
    pub runtime_present: bool,
    pub script_present: bool,
    pub script_path: Option<&'a Path>,
}

fn matches_any(haystack: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| haystack.contains(p))
}

/// Classify a non-zero exit. Checks run from the most to the least
/// fundamental cause.
pub fn classify(ctx: &FailureContext<'_>) -> ErrorKind {
    let output = ctx.output.to_lowercase();
    let not_found_code = ctx
        .exit_code
        .is_some_and(|c| NOT_FOUND_EXIT_CODES.contains(&c));

    if !ctx.runtime_present && (not_found_code || matches_any(&output, RUNTIME_MISSING_PATTERNS)) {
        return ErrorKind::RuntimeUnavailable;
    }

    // Only an absent script counts: a present one still shows up in Node's
    // require stack when one of its own imports is missing.
    if ctx.script_path.is_some() && !ctx.script_present {
        return ErrorKind::ScriptUnavailable;
    }

    if matches_any(&output, DEPENDENCY_PATTERNS) {
        return ErrorKind::DependencyMissing;
    }
    if matches_any(&output, ENCODING_PATTERNS) {
        return ErrorKind::EncodingError;
    }
    if !ctx.runtime_present {
        return ErrorKind::RuntimeUnavailable;
    }
    ErrorKind::NativeNotifyError
}
