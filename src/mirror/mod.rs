//! Depth-first traversal and per-file transfer engine.
//!
//! [`Mirror`] walks the remote tree from a root folder, reconstructs the
//! folder structure under a local base directory, and hands every file to
//! the transfer step. The transfer step consults the [`TransferLedger`] so
//! that repeated runs are incremental: a file id already recorded is skipped
//! without any remote call.
//!
//! # Failure policy
//!
//! Failures are caught at the narrowest scope that preserves forward
//! progress:
//! - a failure listing the root folder is fatal (nothing useful can happen);
//! - a failure listing any deeper folder skips that branch with a warning;
//! - a failure transferring one file is logged and counted, siblings
//!   continue, and the ledger is left untouched so the next run retries.
//!
//! Nothing is retried within a single run.

mod progress;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::StreamExt;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

use crate::export::{ExportFormat, export_file_name};
use crate::ledger::{LedgerError, TransferLedger};
use crate::remote::{NodeKind, RemoteContent, RemoteError, RemoteNode, RemoteStorage};
use progress::TransferProgress;

/// Fatal errors from a mirror run.
///
/// Per-file and per-branch failures never surface here; they are logged and
/// counted in [`MirrorStats`].
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The root folder could not be listed. Nothing was mirrored.
    #[error("listing root folder {folder_id}: {source}")]
    RootListing {
        /// The root folder id that failed to list.
        folder_id: String,
        /// The underlying remote error.
        #[source]
        source: RemoteError,
    },

    /// File system error creating the local directory structure.
    #[error("IO error at {path}: {source}")]
    Io {
        /// The local path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl MirrorError {
    fn root_listing(folder_id: impl Into<String>, source: RemoteError) -> Self {
        Self::RootListing {
            folder_id: folder_id.into(),
            source,
        }
    }

    fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Per-file failure, recovered locally by the traversal loop.
#[derive(Debug, Error)]
enum TransferError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl TransferError {
    fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// How one file's bytes are obtained, derived from its node kind.
#[derive(Debug, Clone, Copy)]
enum TransferPlan {
    /// Plain media fetch, name kept as-is.
    Raw,
    /// Server-side export, name rewritten with the format's extension.
    Export(ExportFormat),
}

impl TransferPlan {
    /// Returns `None` for folders, which traversal handles itself.
    fn for_kind(kind: NodeKind) -> Option<Self> {
        match kind {
            NodeKind::Folder => None,
            NodeKind::RawFile => Some(Self::Raw),
            NodeKind::Document(doc) => Some(Self::Export(doc.export_format())),
        }
    }
}

/// Outcome of the dedup check for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransferOutcome {
    Transferred,
    Skipped,
}

/// Counters from one mirror run.
#[derive(Debug, Default, Clone, Copy)]
pub struct MirrorStats {
    folders: usize,
    transferred: usize,
    skipped: usize,
    failed: usize,
    branches_skipped: usize,
}

impl MirrorStats {
    /// Folders visited (directories ensured locally), excluding the root.
    #[must_use]
    pub fn folders(&self) -> usize {
        self.folders
    }

    /// Files fetched, written, and recorded in the ledger this run.
    #[must_use]
    pub fn transferred(&self) -> usize {
        self.transferred
    }

    /// Files skipped because their id was already in the ledger.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Files whose transfer failed; their ids are not in the ledger.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Folders whose listing failed and whose subtree was skipped.
    #[must_use]
    pub fn branches_skipped(&self) -> usize {
        self.branches_skipped
    }

    /// Total files encountered (transferred + skipped + failed).
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.transferred + self.skipped + self.failed
    }
}

/// Mirror engine: owns the ledger and a handle to the remote service.
///
/// Execution is fully sequential: one remote call outstanding at a time,
/// traversal driven by an explicit stack rather than recursion so deep
/// nesting cannot exhaust the call stack.
pub struct Mirror {
    remote: Arc<dyn RemoteStorage>,
    ledger: TransferLedger,
    show_progress: bool,
}

impl Mirror {
    /// Creates an engine over a remote service and a loaded ledger.
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteStorage>, ledger: TransferLedger) -> Self {
        Self {
            remote,
            ledger,
            show_progress: false,
        }
    }

    /// Enables or disables progress bars (disabled by default).
    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Read access to the ledger, mainly for reporting after a run.
    #[must_use]
    pub fn ledger(&self) -> &TransferLedger {
        &self.ledger
    }

    /// Mirrors the tree rooted at `root_id` into `base_dir`.
    ///
    /// Ensures `base_dir` exists, lists the root, then walks the tree
    /// depth-first. Children are processed in whatever order the listing
    /// returns them.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::RootListing`] if the root folder cannot be
    /// listed and [`MirrorError::Io`] if the local directory structure
    /// cannot be created. Per-file and per-branch failures are logged,
    /// counted in the returned [`MirrorStats`], and do not fail the run.
    pub async fn run(&mut self, root_id: &str, base_dir: &Path) -> Result<MirrorStats, MirrorError> {
        let mut stats = MirrorStats::default();
        tokio::fs::create_dir_all(base_dir)
            .await
            .map_err(|e| MirrorError::io(base_dir, e))?;

        let children = self
            .remote
            .list_children(root_id)
            .await
            .map_err(|e| MirrorError::root_listing(root_id, e))?;

        // (folder id, mirrored local path) pairs still to be listed. The
        // local directory for an entry is always created before it is pushed,
        // so every ancestor exists before any descendant file is written.
        let mut stack: Vec<(String, PathBuf)> = Vec::new();
        self.process_children(children, base_dir, &mut stack, &mut stats)
            .await?;

        while let Some((folder_id, local_path)) = stack.pop() {
            match self.remote.list_children(&folder_id).await {
                Ok(children) => {
                    self.process_children(children, &local_path, &mut stack, &mut stats)
                        .await?;
                }
                Err(error) => {
                    warn!(
                        folder_id = %folder_id,
                        path = %local_path.display(),
                        error = %error,
                        "listing folder failed; skipping branch"
                    );
                    stats.branches_skipped += 1;
                }
            }
        }

        info!(
            transferred = stats.transferred,
            skipped = stats.skipped,
            failed = stats.failed,
            folders = stats.folders,
            branches_skipped = stats.branches_skipped,
            "mirror run complete"
        );
        Ok(stats)
    }

    /// Handles one folder's listing: creates subdirectories and queues them,
    /// transfers files in place.
    async fn process_children(
        &mut self,
        children: Vec<RemoteNode>,
        local_parent: &Path,
        stack: &mut Vec<(String, PathBuf)>,
        stats: &mut MirrorStats,
    ) -> Result<(), MirrorError> {
        for child in children {
            match TransferPlan::for_kind(child.kind) {
                None => {
                    let folder_path = local_parent.join(&child.name);
                    tokio::fs::create_dir_all(&folder_path)
                        .await
                        .map_err(|e| MirrorError::io(&folder_path, e))?;
                    debug!(id = %child.id, path = %folder_path.display(), "entering folder");
                    stats.folders += 1;
                    stack.push((child.id, folder_path));
                }
                Some(plan) => match self.transfer_if_needed(&child, plan, local_parent).await {
                    Ok(TransferOutcome::Transferred) => stats.transferred += 1,
                    Ok(TransferOutcome::Skipped) => stats.skipped += 1,
                    Err(error) => {
                        warn!(
                            id = %child.id,
                            name = %child.name,
                            error = %error,
                            "transfer failed; continuing with remaining items"
                        );
                        stats.failed += 1;
                    }
                },
            }
        }
        Ok(())
    }

    /// Transfers one file unless its id is already in the ledger.
    ///
    /// The id is appended to the ledger only after the content has been
    /// fully written and flushed. On any failure the partial output file is
    /// removed and the ledger is left untouched, so the next run retries.
    async fn transfer_if_needed(
        &mut self,
        node: &RemoteNode,
        plan: TransferPlan,
        local_parent: &Path,
    ) -> Result<TransferOutcome, TransferError> {
        if self.ledger.contains(&node.id) {
            info!(id = %node.id, name = %node.name, "skipping already downloaded file");
            return Ok(TransferOutcome::Skipped);
        }

        tokio::fs::create_dir_all(local_parent)
            .await
            .map_err(|e| TransferError::io(local_parent, e))?;

        let (content, file_name) = match plan {
            TransferPlan::Raw => (
                self.remote.fetch_content(&node.id).await?,
                node.name.clone(),
            ),
            TransferPlan::Export(format) => (
                self.remote.export_content(&node.id, format.mime_type).await?,
                export_file_name(&node.name, format),
            ),
        };

        let file_path = local_parent.join(&file_name);
        let progress = TransferProgress::start(&file_name, content.len, self.show_progress);
        let result = write_stream(content, &file_path, &progress).await;
        progress.finish();

        match result {
            Ok(bytes) => {
                self.ledger.record(&node.id).await?;
                info!(
                    id = %node.id,
                    path = %file_path.display(),
                    bytes,
                    "download completed"
                );
                Ok(TransferOutcome::Transferred)
            }
            Err(error) => {
                let _ = tokio::fs::remove_file(&file_path).await;
                Err(error)
            }
        }
    }
}

/// Streams content to `path`, creating or truncating the destination
/// (collisions are overwritten without warning). Returns bytes written.
async fn write_stream(
    content: RemoteContent,
    path: &Path,
    progress: &TransferProgress,
) -> Result<u64, TransferError> {
    let file = File::create(path)
        .await
        .map_err(|e| TransferError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let mut stream = content.stream;
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| TransferError::io(path, e))?;
        bytes_written += chunk.len() as u64;
        progress.advance(chunk.len() as u64);
    }

    writer
        .flush()
        .await
        .map_err(|e| TransferError::io(path, e))?;
    Ok(bytes_written)
}
