//! Process lifecycle management for the bot
//!
//! One long-running bot process per host, tracked through a PID record and
//! recognised in the process table by its command-line signature.

pub mod lifecycle;
pub mod pidfile;
pub mod query;

pub use lifecycle::{BotLifecycle, BotStatus, LaunchSpec, LifecycleTimings, StopReport, WaitOutcome};
pub use pidfile::PidFile;
pub use query::{CommandSignature, ProcessHandle};

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

/// Signal-0 liveness probe. `EPERM` means the process exists but belongs to
/// someone else, which still counts as alive.
pub fn is_alive(pid: u32) -> bool {
    match kill(Pid::from_raw(pid as i32), None) {
        Ok(()) => true,
        Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}

/// Graceful termination request. Delivery failures (already gone) are fine.
pub fn send_sigterm(pid: u32) {
    let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
}

/// Unconditional termination.
pub fn send_sigkill(pid: u32) {
    let _ = kill(Pid::from_raw(pid as i32), Signal::SIGKILL);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_process_is_alive() {
        assert!(is_alive(std::process::id()));
    }

    #[test]
    fn out_of_range_pid_is_dead() {
        assert!(!is_alive(99_999_999));
    }
}
