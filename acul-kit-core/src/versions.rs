//! Version ledger for the build output directory.
//!
//! `{dist}/.versions` lists every version directory a build created and that
//! has not been pruned yet; `{dist}/.current-version` names the one deploys
//! point at. The pointer is only written by [`VersionLedger::promote`], as the
//! last step of a build.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const LEDGER_FILE: &str = ".versions";
pub const CURRENT_VERSION_FILE: &str = ".current-version";

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> LedgerError + '_ {
    move |source| LedgerError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// `v-` plus 16 hex characters from a random UUID.
pub fn mint_version() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("v-{}", &id[..16])
}

pub struct VersionLedger {
    dist_dir: PathBuf,
}

impl VersionLedger {
    pub fn new(dist_dir: impl Into<PathBuf>) -> Self {
        Self {
            dist_dir: dist_dir.into(),
        }
    }

    pub fn version_dir(&self, version: &str) -> PathBuf {
        self.dist_dir.join(version)
    }

    fn ledger_path(&self) -> PathBuf {
        self.dist_dir.join(LEDGER_FILE)
    }

    fn pointer_path(&self) -> PathBuf {
        self.dist_dir.join(CURRENT_VERSION_FILE)
    }

    /// Recorded versions, oldest first.
    pub fn entries(&self) -> Result<Vec<String>, LedgerError> {
        let path = self.ledger_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&path).map_err(io_err(&path))?;
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Record a freshly created version directory.
    pub fn append(&self, version: &str) -> Result<(), LedgerError> {
        fs::create_dir_all(&self.dist_dir).map_err(io_err(&self.dist_dir))?;
        let mut entries = self.entries()?;
        entries.push(version.to_string());
        self.write_entries(&entries)?;
        debug!(version, "Appended version to ledger");
        Ok(())
    }

    /// Delete every recorded version directory and empty the ledger.
    /// Returns the versions removed.
    pub fn prune(&self) -> Result<Vec<String>, LedgerError> {
        let entries = self.entries()?;
        for version in &entries {
            let dir = self.version_dir(version);
            if dir.exists() {
                fs::remove_dir_all(&dir).map_err(io_err(&dir))?;
                info!(version = %version, "Removed old version");
            } else {
                warn!(version = %version, "Ledger entry has no directory on disk");
            }
        }
        if !entries.is_empty() {
            self.write_entries(&[])?;
        }
        Ok(entries)
    }

    /// Version the pointer names, if a build ever completed.
    pub fn current(&self) -> Result<Option<String>, LedgerError> {
        let path = self.pointer_path();
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).map_err(io_err(&path))?;
        let version = text.trim();
        Ok((!version.is_empty()).then(|| version.to_string()))
    }

    /// Atomically point `.current-version` at `version`.
    pub fn promote(&self, version: &str) -> Result<(), LedgerError> {
        let path = self.pointer_path();
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dist_dir)
            .map_err(io_err(&self.dist_dir))?;
        tmp.write_all(version.as_bytes()).map_err(io_err(&path))?;
        tmp.persist(&path).map_err(|e| LedgerError::Io {
            path: path.clone(),
            source: e.error,
        })?;
        info!(version, "Promoted current version");
        Ok(())
    }

    fn write_entries(&self, entries: &[String]) -> Result<(), LedgerError> {
        let path = self.ledger_path();
        fs::write(&path, entries.join("\n")).map_err(io_err(&path))
    }
}
