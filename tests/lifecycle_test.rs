use hidybot_ops::process::{query, BotLifecycle, BotStatus, LaunchSpec, LifecycleTimings, PidFile};
use hidybot_ops::OpsError;
use std::time::Duration;
use tempfile::TempDir;

fn fast_timings() -> LifecycleTimings {
    LifecycleTimings {
        grace_poll: Duration::from_millis(100),
        grace_polls: 20,
        kill_settle: Duration::from_millis(200),
        start_confirm: Duration::from_millis(300),
    }
}

/// A lifecycle around `sleep <duration>`. Each test uses its own duration
/// so the signature searches cannot see each other's processes.
fn sleeper_lifecycle(dir: &TempDir, duration: &str) -> BotLifecycle {
    let launch = LaunchSpec {
        program: "sleep".to_string(),
        args: vec![duration.to_string()],
        workdir: dir.path().to_path_buf(),
        log_path: dir.path().join("bot.log"),
    };
    BotLifecycle::new(PidFile::new(dir.path().join("bot.pid")), launch, fast_timings())
}

#[tokio::test]
async fn stop_with_nothing_running_succeeds() {
    let dir = TempDir::new().unwrap();
    let lifecycle = sleeper_lifecycle(&dir, "311.1");

    let report = lifecycle.stop().await.unwrap();
    assert!(report.recorded.is_none());
    assert!(report.swept.is_empty());
    assert!(!lifecycle.pidfile().exists());
}

#[tokio::test]
async fn stop_removes_stale_record_without_signalling() {
    let dir = TempDir::new().unwrap();
    let lifecycle = sleeper_lifecycle(&dir, "312.2");
    lifecycle.pidfile().write(99_999_999).unwrap();

    let report = lifecycle.stop().await.unwrap();
    assert!(report.recorded.is_none());
    assert!(!lifecycle.pidfile().exists());
}

#[tokio::test]
async fn start_status_stop_roundtrip() {
    let dir = TempDir::new().unwrap();
    let lifecycle = sleeper_lifecycle(&dir, "313.3");

    let pid = lifecycle.start().await.unwrap();
    assert_eq!(lifecycle.pidfile().read().unwrap(), Some(pid));

    // The launched process is visible under its command signature.
    let matches = query::find(&lifecycle.launch().signature()).await.unwrap();
    assert!(matches.iter().any(|h| h.pid == pid));

    assert_eq!(
        lifecycle.status().await.unwrap(),
        BotStatus::Running { pid, tracked: true }
    );

    lifecycle.stop().await.unwrap();
    assert!(!lifecycle.pidfile().exists());
    assert_eq!(lifecycle.status().await.unwrap(), BotStatus::NotRunning);
}

#[tokio::test]
async fn start_failure_is_fatal_and_cleans_the_record() {
    let dir = TempDir::new().unwrap();
    let launch = LaunchSpec {
        program: "true".to_string(),
        args: vec![],
        workdir: dir.path().to_path_buf(),
        log_path: dir.path().join("bot.log"),
    };
    let lifecycle = BotLifecycle::new(
        PidFile::new(dir.path().join("bot.pid")),
        launch,
        fast_timings(),
    );

    let err = lifecycle.start().await.unwrap_err();
    assert!(matches!(err, OpsError::StartFailed { .. }));
    assert!(!lifecycle.pidfile().exists());
}

#[tokio::test]
async fn stop_sweeps_untracked_instance_and_heals_stale_record() {
    let dir = TempDir::new().unwrap();
    let lifecycle = sleeper_lifecycle(&dir, "271.828");

    // An instance launched outside the lifecycle, plus a stale record on
    // top: the exact double fault the two-tier stop exists for.
    let mut stray = tokio::process::Command::new("sleep")
        .arg("271.828")
        .spawn()
        .unwrap();
    let stray_pid = stray.id().unwrap();
    lifecycle.pidfile().write(99_999_999).unwrap();

    // Give the process table a moment to show the stray.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let report = lifecycle.stop().await.unwrap();
    assert!(!lifecycle.pidfile().exists());
    assert!(report.recorded.is_none());
    assert!(report.swept.contains(&stray_pid));

    let status = stray.wait().await.unwrap();
    assert!(!status.success());

    assert!(query::find(&lifecycle.launch().signature())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn status_reports_untracked_instance_when_record_is_lost() {
    let dir = TempDir::new().unwrap();
    let lifecycle = sleeper_lifecycle(&dir, "314.15");

    let mut stray = tokio::process::Command::new("sleep")
        .arg("314.15")
        .spawn()
        .unwrap();
    let stray_pid = stray.id().unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(
        lifecycle.status().await.unwrap(),
        BotStatus::Running {
            pid: stray_pid,
            tracked: false
        }
    );

    stray.kill().await.unwrap();
    stray.wait().await.unwrap();
}
