use super::pidfile::PidFile;
use super::query::{self, CommandSignature};
use super::{is_alive, send_sigkill, send_sigterm};
use crate::error::{OpsError, Result};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::sleep;
use tracing::{info, warn};

/// Poll intervals for the stop/start escalation. The defaults give a
/// roughly twelve second worst case for a stop: ten one-second liveness
/// polls, then SIGKILL and a two second settle.
#[derive(Debug, Clone)]
pub struct LifecycleTimings {
    /// Interval between liveness polls after SIGTERM
    pub grace_poll: Duration,
    /// Number of polls before escalating
    pub grace_polls: u32,
    /// Settle time after SIGKILL
    pub kill_settle: Duration,
    /// Delay before confirming a freshly launched process stayed up
    pub start_confirm: Duration,
}

impl Default for LifecycleTimings {
    fn default() -> Self {
        Self {
            grace_poll: Duration::from_secs(1),
            grace_polls: 10,
            kill_settle: Duration::from_secs(2),
            start_confirm: Duration::from_secs(3),
        }
    }
}

/// Outcome of a bounded liveness poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Exited,
    TimedOut,
}

/// How the bot is launched and how to recognise it in the process table.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
    pub workdir: PathBuf,
    pub log_path: PathBuf,
}

impl LaunchSpec {
    pub fn signature(&self) -> CommandSignature {
        CommandSignature::new(&self.program, self.args.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotStatus {
    Running { pid: u32, tracked: bool },
    NotRunning,
}

/// What a stop actually had to do.
#[derive(Debug, Default)]
pub struct StopReport {
    /// PID from the record that was alive and got signalled
    pub recorded: Option<u32>,
    /// PIDs found by the signature sweep
    pub swept: Vec<u32>,
}

/// Deterministically stops and (re)starts exactly one bot process,
/// tolerating crashed, missing and duplicated instances. Owns the PID
/// record; nothing else touches it.
pub struct BotLifecycle {
    pidfile: PidFile,
    launch: LaunchSpec,
    timings: LifecycleTimings,
}

impl BotLifecycle {
    pub fn new(pidfile: PidFile, launch: LaunchSpec, timings: LifecycleTimings) -> Self {
        Self {
            pidfile,
            launch,
            timings,
        }
    }

    pub fn pidfile(&self) -> &PidFile {
        &self.pidfile
    }

    pub fn launch(&self) -> &LaunchSpec {
        &self.launch
    }

    /// Stop the bot. Two independent tiers: the recorded PID first, then a
    /// signature sweep of the process table for instances whose PID was
    /// never recorded. Nothing running is a success, not a failure.
    pub async fn stop(&self) -> Result<StopReport> {
        let mut report = StopReport::default();

        if let Some(pid) = self.pidfile.read()? {
            if is_alive(pid) {
                info!(pid, "🛑 Stopping bot recorded in the PID file");
                self.terminate(pid).await;
                report.recorded = Some(pid);
            } else {
                warn!(pid, "PID record is stale, cleaning it up");
            }
        }
        // The record goes away whether or not a process was found.
        self.pidfile.remove()?;

        let strays = query::find(&self.launch.signature()).await?;
        for handle in &strays {
            warn!(pid = handle.pid, "🧹 Sweeping stray bot instance");
            self.terminate(handle.pid).await;
            report.swept.push(handle.pid);
        }

        if report.recorded.is_none() && report.swept.is_empty() {
            info!("Bot was not running");
        }
        Ok(report)
    }

    /// Launch the bot detached, with stdout and stderr appended to the log
    /// file, and confirm it survives the confirmation window. An early exit
    /// is the one hard failure in the lifecycle.
    pub async fn start(&self) -> Result<u32> {
        if let Some(parent) = self.launch.log_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let log = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.launch.log_path)?;
        let log_err = log.try_clone()?;

        let mut child = Command::new(&self.launch.program)
            .args(&self.launch.args)
            .current_dir(&self.launch.workdir)
            .stdin(Stdio::null())
            .stdout(log)
            .stderr(log_err)
            .spawn()?;

        let Some(pid) = child.id() else {
            return Err(OpsError::StartFailed {
                log: self.launch.log_path.clone(),
            });
        };
        self.pidfile.write(pid)?;
        info!(pid, "🚀 Bot launched, confirming it stays up");

        sleep(self.timings.start_confirm).await;
        match child.try_wait() {
            Ok(None) => {
                info!(pid, "✅ Bot running (PID {pid})");
                Ok(pid)
            }
            Ok(Some(status)) => {
                warn!(pid, %status, "Bot exited during the confirmation window");
                self.pidfile.remove()?;
                Err(OpsError::StartFailed {
                    log: self.launch.log_path.clone(),
                })
            }
            Err(e) => {
                self.pidfile.remove()?;
                Err(e.into())
            }
        }
    }

    pub async fn restart(&self) -> Result<u32> {
        info!("🔄 Restarting bot");
        self.stop().await?;
        self.start().await
    }

    /// Read-only status. The PID record is preferred; a stale record is
    /// cleaned up on the way through, and the signature search catches
    /// instances whose tracking was lost.
    pub async fn status(&self) -> Result<BotStatus> {
        if let Some(pid) = self.pidfile.read()? {
            if is_alive(pid) {
                return Ok(BotStatus::Running { pid, tracked: true });
            }
            warn!(pid, "PID record is stale, cleaning it up");
            self.pidfile.remove()?;
        }

        let strays = query::find(&self.launch.signature()).await?;
        if let Some(handle) = strays.first() {
            warn!(
                pid = handle.pid,
                "Bot is running but lifecycle tracking was lost"
            );
            return Ok(BotStatus::Running {
                pid: handle.pid,
                tracked: false,
            });
        }
        Ok(BotStatus::NotRunning)
    }

    /// Graceful-then-forceful termination of one PID.
    async fn terminate(&self, pid: u32) {
        send_sigterm(pid);
        match self.wait_for_exit(pid).await {
            WaitOutcome::Exited => info!(pid, "✅ Stopped gracefully"),
            WaitOutcome::TimedOut => {
                warn!(pid, "⚠️  Grace period elapsed, sending SIGKILL");
                send_sigkill(pid);
                sleep(self.timings.kill_settle).await;
            }
        }
    }

    /// Bounded liveness poll against `pid`.
    async fn wait_for_exit(&self, pid: u32) -> WaitOutcome {
        for _ in 0..self.timings.grace_polls {
            if !is_alive(pid) {
                return WaitOutcome::Exited;
            }
            sleep(self.timings.grace_poll).await;
        }
        if is_alive(pid) {
            WaitOutcome::TimedOut
        } else {
            WaitOutcome::Exited
        }
    }
}
