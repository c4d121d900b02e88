use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the ops tooling
#[derive(Error, Debug)]
pub enum OpsError {
    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An external command exited non-zero
    #[error("`{program}` exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// A required tool is not on the host
    #[error("prerequisite `{tool}` not found; {hint}")]
    PrerequisiteMissing { tool: String, hint: String },

    /// Neither a plain pull nor a rebase pull succeeded
    #[error("source update failed: {0}")]
    SourceUpdate(String),

    /// pip could not install from the manifest
    #[error("dependency installation failed: {0}")]
    DependencyInstall(String),

    /// The bot exited within the startup confirmation window
    #[error("bot process exited during startup; check the log at {}", log.display())]
    StartFailed { log: PathBuf },

    /// Crontab read/write errors
    #[error("crontab error: {0}")]
    Cron(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<String> for OpsError {
    fn from(s: String) -> Self {
        OpsError::Other(s)
    }
}

impl From<&str> for OpsError {
    fn from(s: &str) -> Self {
        OpsError::Other(s.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, OpsError>;
