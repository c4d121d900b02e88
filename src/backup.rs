use crate::config::OpsConfig;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Backup file name with an embedded timestamp:
/// `hidyBot_20260806_143000.db.bak`.
pub fn backup_file_name(db: &Path, at: DateTime<Local>) -> String {
    let stem = db
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "database".to_string());
    let ext = db
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "db".to_string());
    format!("{stem}_{}.{ext}.bak", at.format("%Y%m%d_%H%M%S"))
}

/// Copy the database aside before an update. A missing database is a
/// silent skip and a failed copy is logged; neither stops the pipeline.
/// Retention is unbounded.
pub async fn backup_database(cfg: &OpsConfig) -> Option<PathBuf> {
    let db = cfg.db_path();
    if !db.exists() {
        info!(db = %db.display(), "No database to back up, skipping");
        return None;
    }

    if let Err(e) = tokio::fs::create_dir_all(cfg.backup_dir()).await {
        warn!(error = %e, "Could not create the backup directory, continuing without a backup");
        return None;
    }

    let target = cfg.backup_dir().join(backup_file_name(&db, Local::now()));
    match tokio::fs::copy(&db, &target).await {
        Ok(_) => {
            info!(backup = %target.display(), "💾 Database backed up");
            Some(target)
        }
        Err(e) => {
            warn!(error = %e, "Database backup failed, continuing without one");
            None
        }
    }
}
