//! Subprocess Invoker: runs one command line through the host shell.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;

use crate::escape::HostPlatform;

/// Captured outcome of a finished child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// `None` when the child was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// stdout (which carries the redirected stderr) plus anything the
    /// shell itself wrote to stderr.
    pub fn combined_output(&self) -> String {
        let stdout = self.stdout.trim();
        let stderr = self.stderr.trim();
        match (stdout.is_empty(), stderr.is_empty()) {
            (_, true) => stdout.to_string(),
            (true, false) => stderr.to_string(),
            (false, false) => format!("{stdout}\n{stderr}"),
        }
    }
}

#[derive(Debug)]
pub enum Execution {
    Finished(ExecutionResult),
    /// The hard deadline passed; the child was killed.
    TimedOut(Duration),
}

/// Run `command_line` with stderr merged into stdout and wait at most
/// `hard_timeout`.
pub async fn execute(
    platform: HostPlatform,
    command_line: &str,
    hard_timeout: Duration,
) -> std::io::Result<Execution> {
    let mut cmd = shell_command(platform, command_line);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let start = Instant::now();
    let child = cmd.spawn()?;

    match tokio::time::timeout(hard_timeout, child.wait_with_output()).await {
        Ok(output) => {
            let output = output?;
            Ok(Execution::Finished(ExecutionResult {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                elapsed: start.elapsed(),
            }))
        }
        // Dropping the wait future drops the child, which kills it.
        Err(_) => Ok(Execution::TimedOut(start.elapsed())),
    }
}

#[cfg(windows)]
fn shell_command(platform: HostPlatform, command_line: &str) -> Command {
    match platform {
        HostPlatform::Windows => {
            let mut cmd = Command::new("cmd");
            // /S strips exactly the outer quote pair, leaving ours intact.
            cmd.raw_arg(format!("/D /S /C \"{command_line} 2>&1\""));
            cmd
        }
        HostPlatform::Posix => posix_shell(command_line),
    }
}

#[cfg(not(windows))]
fn shell_command(_platform: HostPlatform, command_line: &str) -> Command {
    posix_shell(command_line)
}

fn posix_shell(command_line: &str) -> Command {
    let mut cmd = Command::new("/bin/sh");
    cmd.arg("-c").arg(format!("{command_line} 2>&1"));
    cmd
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::escape::escape_posix;

    #[tokio::test]
    async fn captures_exit_code_and_merged_output() {
        let result = execute(
            HostPlatform::Posix,
            "echo out; echo err >&2; exit 3",
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        let Execution::Finished(result) = result else {
            panic!("expected the command to finish");
        };
        assert_eq!(result.exit_code, Some(3));
        assert!(!result.success());
        assert!(result.stdout.contains("out"));
        assert!(result.combined_output().contains("err"));
    }

    #[tokio::test]
    async fn escaped_argument_reaches_child_verbatim() {
        let nasty = r#"it's "x" $HOME `id` ; rm -rf / & | < > \ %PATH%"#;
        let line = format!("printf '%s' {}", escape_posix(nasty));
        let Execution::Finished(result) =
            execute(HostPlatform::Posix, &line, Duration::from_secs(5))
                .await
                .unwrap()
        else {
            panic!("expected the command to finish");
        };
        assert!(result.success());
        assert_eq!(result.stdout, nasty);
    }

    #[tokio::test]
    async fn hard_timeout_kills_child() {
        let result = execute(HostPlatform::Posix, "sleep 5", Duration::from_millis(100))
            .await
            .unwrap();
        assert!(matches!(result, Execution::TimedOut(_)));
    }

    #[tokio::test]
    async fn missing_program_exits_127() {
        let Execution::Finished(result) = execute(
            HostPlatform::Posix,
            "'/nonexistent/bin/node' x",
            Duration::from_secs(5),
        )
        .await
        .unwrap() else {
            panic!("expected the command to finish");
        };
        assert_eq!(result.exit_code, Some(127));
        assert!(result.combined_output().to_lowercase().contains("not found")
            || result.combined_output().to_lowercase().contains("no such file"));
    }
}
