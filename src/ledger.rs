//! Durable record of remote file ids already transferred.
//!
//! The ledger is the sole source of truth for "already done". On disk it is
//! a plain UTF-8 file with one remote file id per line, no header and no
//! schema version. It is loaded fully into memory at startup, appended to
//! after each confirmed write, and never rewritten or compacted.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Errors that can occur loading or appending the ledger file.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// File system error reading or appending the ledger.
    #[error("IO error on ledger {path}: {source}")]
    Io {
        /// The ledger file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl LedgerError {
    fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// In-memory snapshot of transferred ids backed by an append-only file.
///
/// An id is recorded if and only if the corresponding content was fully and
/// successfully written to local storage. The struct is owned by the
/// top-level run and passed into the transfer step; there is no process-wide
/// singleton.
#[derive(Debug)]
pub struct TransferLedger {
    path: PathBuf,
    ids: HashSet<String>,
}

impl TransferLedger {
    /// Loads the ledger from `path`. A missing file yields an empty ledger.
    ///
    /// Blank lines are ignored; surrounding whitespace on a line is not part
    /// of the id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Io`] if the file exists but cannot be read.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let ids = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect(),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(error) => return Err(LedgerError::io(&path, error)),
        };
        debug!(path = %path.display(), entries = ids.len(), "ledger loaded");
        Ok(Self { path, ids })
    }

    /// Returns true if `id` has already been transferred.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Records a completed transfer: appends one line to the file, then
    /// updates the in-memory set.
    ///
    /// Call this only after the content has been fully written locally.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Io`] if the append fails; in that case the
    /// in-memory set is left unchanged so the invariant between file and
    /// memory holds.
    pub async fn record(&mut self, id: &str) -> Result<(), LedgerError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| LedgerError::io(&self.path, e))?;
        file.write_all(format!("{id}\n").as_bytes())
            .await
            .map_err(|e| LedgerError::io(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| LedgerError::io(&self.path, e))?;
        self.ids.insert(id.to_string());
        Ok(())
    }

    /// Number of recorded ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if no transfer has ever been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_missing_file_yields_empty_ledger() {
        let temp_dir = TempDir::new().unwrap();
        let ledger = TransferLedger::load(temp_dir.path().join("download_log.txt"))
            .await
            .unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.len(), 0);
    }

    #[tokio::test]
    async fn test_record_appends_one_line_per_id() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("download_log.txt");

        let mut ledger = TransferLedger::load(&path).await.unwrap();
        ledger.record("file-a").await.unwrap();
        ledger.record("file-b").await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "file-a\nfile-b\n");
        assert!(ledger.contains("file-a"));
        assert!(ledger.contains("file-b"));
        assert!(!ledger.contains("file-c"));
    }

    #[tokio::test]
    async fn test_reload_round_trips_recorded_ids() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("download_log.txt");

        let mut ledger = TransferLedger::load(&path).await.unwrap();
        ledger.record("123").await.unwrap();
        drop(ledger);

        let reloaded = TransferLedger::load(&path).await.unwrap();
        assert!(reloaded.contains("123"));
        assert_eq!(reloaded.len(), 1);
    }

    #[tokio::test]
    async fn test_load_ignores_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("download_log.txt");
        std::fs::write(&path, "one\n\ntwo\n  \nthree\n").unwrap();

        let ledger = TransferLedger::load(&path).await.unwrap();
        assert_eq!(ledger.len(), 3);
        assert!(ledger.contains("one"));
        assert!(ledger.contains("two"));
        assert!(ledger.contains("three"));
    }

    #[tokio::test]
    async fn test_record_is_append_only_across_sessions() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("download_log.txt");
        std::fs::write(&path, "existing\n").unwrap();

        let mut ledger = TransferLedger::load(&path).await.unwrap();
        ledger.record("new").await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "existing\nnew\n");
    }
}
