use crate::error::{OpsError, Result};
use crate::exec;
use tracing::info;

/// Supported host platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Linux,
    MacOs,
}

pub fn detect() -> HostOs {
    if cfg!(target_os = "macos") {
        HostOs::MacOs
    } else {
        HostOs::Linux
    }
}

impl HostOs {
    pub fn name(&self) -> &'static str {
        match self {
            HostOs::Linux => "Linux",
            HostOs::MacOs => "macOS",
        }
    }

    /// Suggest how the operator can install a missing tool. The package
    /// manager is never invoked from here.
    pub fn install_hint(&self, tool: &str) -> String {
        match self {
            HostOs::Linux => {
                format!("try `apt-get install {tool}` or your distribution's equivalent")
            }
            HostOs::MacOs => format!("try `brew install {tool}`"),
        }
    }
}

/// Verify git, the python interpreter and pip are present.
/// A missing tool halts the pipeline.
pub fn check_prerequisites(os: HostOs, python: &str) -> Result<()> {
    for tool in ["git", python] {
        if exec::which(tool).is_none() {
            return Err(OpsError::PrerequisiteMissing {
                tool: tool.to_string(),
                hint: os.install_hint(tool),
            });
        }
    }
    if exec::which("pip3").is_none() && exec::which("pip").is_none() {
        return Err(OpsError::PrerequisiteMissing {
            tool: "pip".to_string(),
            hint: os.install_hint("python3-pip"),
        });
    }
    info!("Prerequisites present: git, {python}, pip");
    Ok(())
}
