use crate::config::OpsConfig;
use crate::error::{OpsError, Result};
use crate::version::Version;
use crate::{cron, exec, git, host, version};
use tracing::info;

#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Re-run the configuration wizard even if a config already exists
    pub reconfigure: bool,
    pub register_cron: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            reconfigure: false,
            register_cron: true,
        }
    }
}

#[derive(Debug)]
pub struct InstallSummary {
    pub version: Version,
    pub pid: u32,
    pub fresh_clone: bool,
}

/// Full installation pipeline: prerequisites, checkout, dependencies,
/// one-time configuration, first start, cron registration.
pub async fn run(cfg: &OpsConfig, opts: &InstallOptions) -> Result<InstallSummary> {
    let os = host::detect();
    info!(os = os.name(), "Installing to {}", cfg.install_dir.display());
    host::check_prerequisites(os, &cfg.python)?;

    if let Some(parent) = cfg.install_dir.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let fresh_clone = git::clone_or_pull(cfg).await?;
    create_directories(cfg).await?;

    install_dependencies(cfg).await?;
    mark_scripts_executable(cfg)?;

    if opts.reconfigure || !cfg.bot_config_path().exists() {
        info!("Running the one-time configuration wizard");
        exec::run_interactive(&cfg.python, &["config.py"], Some(&cfg.install_dir)).await?;
    }

    let version = version::detect(&cfg.python, &cfg.install_dir).await;
    let pid = cfg.lifecycle().start().await?;

    if opts.register_cron {
        cron::register(cfg).await?;
    }

    Ok(InstallSummary {
        version,
        pid,
        fresh_clone,
    })
}

async fn create_directories(cfg: &OpsConfig) -> Result<()> {
    for dir in [
        cfg.install_dir.join("Database"),
        cfg.install_dir.join("Logs"),
        cfg.backup_dir(),
    ] {
        tokio::fs::create_dir_all(&dir).await?;
    }
    Ok(())
}

/// pip install from the manifest; any failure here is fatal.
pub(crate) async fn install_dependencies(cfg: &OpsConfig) -> Result<()> {
    let manifest = cfg.requirements_path();
    if !manifest.exists() {
        return Err(OpsError::DependencyInstall(format!(
            "manifest {} not found",
            manifest.display()
        )));
    }
    info!("Installing python dependencies");
    exec::run_interactive(
        &cfg.python,
        &["-m", "pip", "install", "-r", "requirements.txt"],
        Some(&cfg.install_dir),
    )
    .await
    .map_err(|e| OpsError::DependencyInstall(e.to_string()))
}

#[cfg(unix)]
fn mark_scripts_executable(cfg: &OpsConfig) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    for script in [cfg.bot_entry.as_str(), "version.py", "update.py", "config.py"] {
        let path = cfg.install_dir.join(script);
        if path.exists() {
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
        }
    }
    Ok(())
}

#[cfg(not(unix))]
fn mark_scripts_executable(_cfg: &OpsConfig) -> Result<()> {
    Ok(())
}
