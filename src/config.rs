use crate::error::{OpsError, Result};
use crate::process::{BotLifecycle, LaunchSpec, LifecycleTimings, PidFile};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Deployment configuration. Defaults match the standard bot deployment;
/// a YAML file can override any field.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpsConfig {
    /// Where the bot checkout lives
    pub install_dir: PathBuf,
    /// Repository the checkout is cloned from
    pub repo_url: String,
    /// Branch to install and track
    pub branch: String,
    /// Python interpreter used to run the bot and its scripts
    pub python: String,
    /// Entry script of the bot, relative to the install dir
    pub bot_entry: String,
}

impl Default for OpsConfig {
    fn default() -> Self {
        Self {
            install_dir: PathBuf::from("/opt/Hiddify-Telegram-Bot"),
            repo_url: "https://github.com/hiddify/Hiddify-Telegram-Bot.git".to_string(),
            branch: "main".to_string(),
            python: "python3".to_string(),
            bot_entry: "hidyBot.py".to_string(),
        }
    }
}

impl OpsConfig {
    /// Load from a YAML file when one is given, defaults otherwise. An
    /// absent path is fine; a malformed file is not.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                serde_yaml::from_str(&raw).map_err(|e| {
                    OpsError::Other(format!("invalid config {}: {e}", path.display()))
                })
            }
            None => Ok(Self::default()),
        }
    }

    pub fn pid_path(&self) -> PathBuf {
        self.install_dir.join("hidybot.pid")
    }

    pub fn log_path(&self) -> PathBuf {
        self.install_dir.join("Logs").join("bot.log")
    }

    pub fn db_path(&self) -> PathBuf {
        self.install_dir.join("Database").join("hidyBot.db")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.install_dir.join("Backup")
    }

    pub fn requirements_path(&self) -> PathBuf {
        self.install_dir.join("requirements.txt")
    }

    pub fn bot_config_path(&self) -> PathBuf {
        self.install_dir.join("config.json")
    }

    pub fn launch_spec(&self) -> LaunchSpec {
        LaunchSpec {
            program: self.python.clone(),
            args: vec![self.bot_entry.clone()],
            workdir: self.install_dir.clone(),
            log_path: self.log_path(),
        }
    }

    /// Lifecycle controller for this deployment, with the documented
    /// production timings.
    pub fn lifecycle(&self) -> BotLifecycle {
        BotLifecycle::new(
            PidFile::new(self.pid_path()),
            self.launch_spec(),
            LifecycleTimings::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_hang_off_the_install_dir() {
        let cfg = OpsConfig::default();
        assert_eq!(
            cfg.pid_path(),
            PathBuf::from("/opt/Hiddify-Telegram-Bot/hidybot.pid")
        );
        assert_eq!(
            cfg.db_path(),
            PathBuf::from("/opt/Hiddify-Telegram-Bot/Database/hidyBot.db")
        );
        assert_eq!(
            cfg.log_path(),
            PathBuf::from("/opt/Hiddify-Telegram-Bot/Logs/bot.log")
        );
    }

    #[test]
    fn partial_yaml_overrides_keep_defaults() {
        let cfg: OpsConfig = serde_yaml::from_str("install_dir: /srv/bot\n").unwrap();
        assert_eq!(cfg.install_dir, PathBuf::from("/srv/bot"));
        assert_eq!(cfg.python, "python3");
        assert_eq!(cfg.bot_entry, "hidyBot.py");
    }

    #[test]
    fn launch_spec_runs_the_entry_script() {
        let cfg = OpsConfig::default();
        let spec = cfg.launch_spec();
        assert_eq!(spec.program, "python3");
        assert_eq!(spec.args, vec!["hidyBot.py".to_string()]);
        assert_eq!(spec.workdir, cfg.install_dir);
    }
}
