use crate::error::{OpsError, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Run a command to completion and return its stdout. A non-zero exit
/// becomes an error carrying the captured stderr.
pub async fn run_capture<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    cwd: Option<&Path>,
) -> Result<String> {
    let mut cmd = Command::new(program);
    cmd.args(args).stdin(Stdio::null());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    debug!(program, "Running command");

    let output = cmd.output().await?;
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(OpsError::CommandFailed {
            program: program.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Run a command with inherited stdio, for steps the operator interacts
/// with or should watch scroll by (pip, the configuration wizard).
pub async fn run_interactive<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    cwd: Option<&Path>,
) -> Result<()> {
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    debug!(program, "Running command with inherited stdio");

    let status = cmd.status().await?;
    if status.success() {
        Ok(())
    } else {
        Err(OpsError::CommandFailed {
            program: program.to_string(),
            status,
            stderr: String::new(),
        })
    }
}

/// Minimal PATH lookup, enough for prerequisite checks.
pub fn which(tool: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(tool))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn capture_returns_stdout() {
        let out = run_capture("echo", &["hello"], None).await.unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[tokio::test]
    async fn capture_maps_nonzero_exit() {
        let err = run_capture("sh", &["-c", "echo oops >&2; exit 3"], None)
            .await
            .unwrap_err();
        match err {
            OpsError::CommandFailed { stderr, .. } => assert_eq!(stderr, "oops"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn which_finds_the_shell() {
        assert!(which("sh").is_some());
        assert!(which("definitely-not-a-real-tool-2026").is_none());
    }
}
