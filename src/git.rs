use crate::config::OpsConfig;
use crate::error::{OpsError, Result};
use crate::exec;
use tracing::{info, warn};

/// Clone the repository into the install dir, or refresh an existing
/// checkout. Returns `true` when a fresh clone was made.
pub async fn clone_or_pull(cfg: &OpsConfig) -> Result<bool> {
    if cfg.install_dir.join(".git").exists() {
        info!(dir = %cfg.install_dir.display(), "Existing checkout found, pulling");
        pull_with_rebase_fallback(cfg).await?;
        Ok(false)
    } else {
        info!(repo = %cfg.repo_url, dir = %cfg.install_dir.display(), "Cloning repository");
        let dir = cfg.install_dir.display().to_string();
        exec::run_capture(
            "git",
            &["clone", "--branch", &cfg.branch, &cfg.repo_url, &dir],
            None,
        )
        .await
        .map_err(|e| OpsError::SourceUpdate(e.to_string()))?;
        Ok(true)
    }
}

/// A plain pull first; a rebase pull is the one retry. Both failing is
/// fatal to the pipeline.
pub async fn pull_with_rebase_fallback(cfg: &OpsConfig) -> Result<()> {
    let dir = Some(cfg.install_dir.as_path());
    match exec::run_capture("git", &["pull", "origin", &cfg.branch], dir).await {
        Ok(out) => {
            info!("git pull: {}", out.trim());
            Ok(())
        }
        Err(first) => {
            warn!(error = %first, "Plain pull failed, retrying with rebase");
            match exec::run_capture("git", &["pull", "--rebase", "origin", &cfg.branch], dir).await
            {
                Ok(out) => {
                    info!("git pull --rebase: {}", out.trim());
                    Ok(())
                }
                Err(second) => Err(OpsError::SourceUpdate(format!(
                    "pull failed ({first}); rebase pull failed ({second})"
                ))),
            }
        }
    }
}
