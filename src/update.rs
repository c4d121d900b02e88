use crate::config::OpsConfig;
use crate::error::{OpsError, Result};
use crate::install::{self, InstallOptions, InstallSummary};
use crate::version::Version;
use crate::{backup, cron, exec, git, host, version};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Skip the reinstall confirmation prompt
    pub assume_yes: bool,
    pub register_cron: bool,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            assume_yes: false,
            register_cron: true,
        }
    }
}

#[derive(Debug)]
pub enum UpdateOutcome {
    Updated(UpdateSummary),
    /// Critical files were missing and the operator chose a full reinstall
    Reinstalled(InstallSummary),
}

#[derive(Debug)]
pub struct UpdateSummary {
    pub from: Version,
    pub to: Version,
    pub pid: u32,
    pub backup: Option<PathBuf>,
}

/// Update pipeline: stop, back the database up, pull, reinstall
/// dependencies, migrate, restart. Declining the reinstall offer leaves the
/// host untouched.
pub async fn run(cfg: &OpsConfig, opts: &UpdateOptions) -> Result<UpdateOutcome> {
    let os = host::detect();
    host::check_prerequisites(os, &cfg.python)?;

    let missing = missing_critical_files(cfg);
    if !missing.is_empty() {
        for path in &missing {
            warn!(path = %path.display(), "Critical file missing");
        }
        if confirm_reinstall(opts.assume_yes)? {
            info!("🔄 Falling back to a full reinstall");
            let summary = install::run(
                cfg,
                &InstallOptions {
                    reconfigure: false,
                    register_cron: opts.register_cron,
                },
            )
            .await?;
            return Ok(UpdateOutcome::Reinstalled(summary));
        }
        return Err(OpsError::Other(
            "update aborted: critical files are missing and reinstall was declined".to_string(),
        ));
    }

    if !cfg.install_dir.join(".git").exists() {
        return Err(OpsError::Other(format!(
            "{} is not a git checkout; run hidybot-install first",
            cfg.install_dir.display()
        )));
    }

    let lifecycle = cfg.lifecycle();
    lifecycle.stop().await?;

    let backup = backup::backup_database(cfg).await;
    let from = version::detect(&cfg.python, &cfg.install_dir).await;

    git::pull_with_rebase_fallback(cfg).await?;
    install::install_dependencies(cfg).await?;

    let to = version::detect(&cfg.python, &cfg.install_dir).await;
    run_migration(cfg, &from, &to).await?;

    let pid = lifecycle.start().await?;
    if opts.register_cron {
        cron::register(cfg).await?;
    }

    Ok(UpdateOutcome::Updated(UpdateSummary {
        from,
        to,
        pid,
        backup,
    }))
}

/// Files whose absence means the checkout is too damaged to update in
/// place.
fn missing_critical_files(cfg: &OpsConfig) -> Vec<PathBuf> {
    [
        cfg.install_dir.join(&cfg.bot_entry),
        cfg.bot_config_path(),
        cfg.db_path(),
    ]
    .into_iter()
    .filter(|path| !path.exists())
    .collect()
}

/// The migration script gets both version strings and must exit zero.
async fn run_migration(cfg: &OpsConfig, from: &Version, to: &Version) -> Result<()> {
    info!(%from, %to, "Running the migration step");
    let from = from.to_string();
    let to = to.to_string();
    let args = [
        "update.py",
        "--current-version",
        from.as_str(),
        "--target-version",
        to.as_str(),
    ];
    exec::run_capture(&cfg.python, &args, Some(&cfg.install_dir)).await?;
    Ok(())
}

fn confirm_reinstall(assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("Critical files are missing. Run a full reinstall? [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}
