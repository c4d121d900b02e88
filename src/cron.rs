use crate::config::OpsConfig;
use crate::error::{OpsError, Result};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

/// The job lines this tool owns in the user's crontab: relaunch on reboot
/// and a periodic database backup.
pub fn managed_entries(cfg: &OpsConfig) -> Vec<String> {
    let dir = cfg.install_dir.display();
    vec![
        format!("@reboot hidybot-restart --dir {dir} start"),
        format!("0 */6 * * * hidybot-backup --dir {dir}"),
    ]
}

/// Merge job lines into an existing crontab body. Lines already present
/// (exact match) are left alone, which is what makes registration
/// idempotent. Returns the merged body and how many lines were added.
pub fn merge_entries(existing: &str, entries: &[String]) -> (String, usize) {
    let mut lines: Vec<String> = existing.lines().map(str::to_string).collect();
    let mut added = 0;
    for entry in entries {
        if !lines.iter().any(|line| line == entry) {
            lines.push(entry.clone());
            added += 1;
        }
    }
    let mut body = lines.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }
    (body, added)
}

/// Read the current crontab, upsert our entries and write the table back
/// only when something changed.
pub async fn register(cfg: &OpsConfig) -> Result<usize> {
    let existing = read_crontab().await?;
    let (merged, added) = merge_entries(&existing, &managed_entries(cfg));
    if added == 0 {
        debug!("Cron entries already registered");
        return Ok(0);
    }
    write_crontab(&merged).await?;
    info!(added, "⏰ Cron entries registered");
    Ok(added)
}

async fn read_crontab() -> Result<String> {
    let output = Command::new("crontab")
        .arg("-l")
        .stdin(Stdio::null())
        .output()
        .await?;
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        // `crontab -l` exits non-zero when no crontab exists yet.
        Ok(String::new())
    }
}

async fn write_crontab(body: &str) -> Result<()> {
    let mut child = Command::new("crontab")
        .arg("-")
        .stdin(Stdio::piped())
        .spawn()?;
    let Some(mut stdin) = child.stdin.take() else {
        return Err(OpsError::Cron("crontab stdin unavailable".to_string()));
    };
    stdin.write_all(body.as_bytes()).await?;
    drop(stdin);

    let status = child.wait().await?;
    if status.success() {
        Ok(())
    } else {
        Err(OpsError::Cron(format!("crontab update exited with {status}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<String> {
        vec![
            "@reboot hidybot-restart --dir /opt/bot start".to_string(),
            "0 */6 * * * hidybot-backup --dir /opt/bot".to_string(),
        ]
    }

    #[test]
    fn merge_adds_missing_entries() {
        let (body, added) = merge_entries("", &entries());
        assert_eq!(added, 2);
        assert!(body.ends_with('\n'));
        assert_eq!(body.lines().count(), 2);
    }

    #[test]
    fn merge_is_idempotent() {
        let (once, added) = merge_entries("", &entries());
        assert_eq!(added, 2);
        let (twice, added_again) = merge_entries(&once, &entries());
        assert_eq!(added_again, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn merge_preserves_unrelated_jobs() {
        let existing = "MAILTO=ops@example.com\n15 2 * * * certbot renew\n";
        let (body, added) = merge_entries(existing, &entries());
        assert_eq!(added, 2);
        assert!(body.contains("certbot renew"));
        assert!(body.starts_with("MAILTO=ops@example.com"));
    }

    #[test]
    fn managed_entries_point_at_the_install_dir() {
        let cfg = OpsConfig::default();
        for entry in managed_entries(&cfg) {
            assert!(entry.contains("/opt/Hiddify-Telegram-Bot"));
        }
    }
}
