use crate::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Owns the on-disk PID record. Every read and write of the record goes
/// through this type. The record is one integer on one line; if the file
/// exists it should name a running process, but a stale record is a cleanup
/// signal, not an error.
#[derive(Debug, Clone)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the recorded PID. A missing file yields `None`; an unparsable
    /// record is treated as stale rather than as an error.
    pub fn read(&self) -> Result<Option<u32>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match raw.trim().parse::<u32>() {
            Ok(pid) => Ok(Some(pid)),
            Err(_) => {
                warn!(
                    path = %self.path.display(),
                    "PID record is not a number, treating it as stale"
                );
                Ok(None)
            }
        }
    }

    /// Persist `pid`, unconditionally overwriting any prior record.
    pub fn write(&self, pid: u32) -> Result<()> {
        fs::write(&self.path, format!("{pid}\n"))?;
        debug!(pid, path = %self.path.display(), "PID record written");
        Ok(())
    }

    /// Remove the record. Removing an absent record is not an error.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "PID record removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}
