//! Remote storage capability: node model and the access trait.
//!
//! The mirror engine never talks HTTP directly. It sees the remote service
//! through the [`RemoteStorage`] trait: list the children of a folder, fetch
//! the raw bytes of a file, or export a Google-native document to a portable
//! format. [`drive::DriveClient`] is the production implementation; tests use
//! in-memory fakes.

pub mod drive;
mod error;

pub use error::RemoteError;

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;

use crate::export::ExportFormat;

/// MIME type Drive uses for folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

const DOCUMENT_MIME_TYPE: &str = "application/vnd.google-apps.document";
const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";
const PRESENTATION_MIME_TYPE: &str = "application/vnd.google-apps.presentation";

/// Boxed stream of content chunks from the remote service.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, RemoteError>> + Send>>;

/// Google-native document subtypes that require server-side export.
///
/// These formats have no direct byte representation; the service converts
/// them to an Office format on download. The mapping to export MIME type and
/// file extension lives in [`ExportFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Google Docs text document, exported as docx.
    Document,
    /// Google Sheets spreadsheet, exported as xlsx.
    Spreadsheet,
    /// Google Slides presentation, exported as pptx.
    Presentation,
}

impl DocumentKind {
    /// Returns the export format for this document subtype.
    #[must_use]
    pub fn export_format(self) -> ExportFormat {
        match self {
            Self::Document => ExportFormat::DOCX,
            Self::Spreadsheet => ExportFormat::XLSX,
            Self::Presentation => ExportFormat::PPTX,
        }
    }
}

/// Classification of a remote node, derived from its Drive MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A folder; traversal recurses into it.
    Folder,
    /// A file with a direct byte representation, fetched as-is.
    RawFile,
    /// A Google-native document that must be exported before download.
    Document(DocumentKind),
}

impl NodeKind {
    /// Classifies a Drive MIME type string.
    ///
    /// Anything that is not a folder or a known exportable document is
    /// treated as a raw file and fetched with a plain media request.
    #[must_use]
    pub fn from_mime_type(mime_type: &str) -> Self {
        match mime_type {
            FOLDER_MIME_TYPE => Self::Folder,
            DOCUMENT_MIME_TYPE => Self::Document(DocumentKind::Document),
            SPREADSHEET_MIME_TYPE => Self::Document(DocumentKind::Spreadsheet),
            PRESENTATION_MIME_TYPE => Self::Document(DocumentKind::Presentation),
            _ => Self::RawFile,
        }
    }

    /// Returns true for folder nodes.
    #[must_use]
    pub fn is_folder(self) -> bool {
        matches!(self, Self::Folder)
    }
}

/// Immutable snapshot of one entry in the remote tree.
///
/// Fetched per traversal step and never cached across runs. The parent is
/// implicit in traversal context, so it is not carried here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteNode {
    /// Opaque identifier, unique within the remote service.
    pub id: String,
    /// Display name as shown in the remote service.
    pub name: String,
    /// Folder / raw file / exportable document classification.
    pub kind: NodeKind,
}

impl RemoteNode {
    /// Creates a node from raw listing fields.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

/// Byte content returned by a fetch or export call.
pub struct RemoteContent {
    /// Total size in bytes when the service reports one. Export responses
    /// typically omit it.
    pub len: Option<u64>,
    /// Chunked content stream.
    pub stream: ByteStream,
}

impl std::fmt::Debug for RemoteContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteContent")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

/// Trait abstracting the remote storage service.
///
/// Authentication and session setup are entirely external to this trait;
/// implementations are assumed to hold an established session.
///
/// # Object Safety
///
/// This trait uses `async_trait` to support dynamic dispatch via
/// `Arc<dyn RemoteStorage>`. Rust 2024 native async traits are not
/// object-safe, so `async_trait` is required for the engine seam.
#[async_trait]
pub trait RemoteStorage: Send + Sync {
    /// Lists the non-trashed direct children of a folder.
    async fn list_children(&self, folder_id: &str) -> Result<Vec<RemoteNode>, RemoteError>;

    /// Fetches the raw byte content of a regular file.
    async fn fetch_content(&self, file_id: &str) -> Result<RemoteContent, RemoteError>;

    /// Exports a Google-native document to the given target MIME type.
    async fn export_content(
        &self,
        file_id: &str,
        mime_type: &str,
    ) -> Result<RemoteContent, RemoteError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_folder_mime() {
        assert_eq!(
            NodeKind::from_mime_type("application/vnd.google-apps.folder"),
            NodeKind::Folder
        );
    }

    #[test]
    fn test_node_kind_document_mimes() {
        assert_eq!(
            NodeKind::from_mime_type("application/vnd.google-apps.document"),
            NodeKind::Document(DocumentKind::Document)
        );
        assert_eq!(
            NodeKind::from_mime_type("application/vnd.google-apps.spreadsheet"),
            NodeKind::Document(DocumentKind::Spreadsheet)
        );
        assert_eq!(
            NodeKind::from_mime_type("application/vnd.google-apps.presentation"),
            NodeKind::Document(DocumentKind::Presentation)
        );
    }

    #[test]
    fn test_node_kind_regular_file_mime() {
        assert_eq!(NodeKind::from_mime_type("application/pdf"), NodeKind::RawFile);
        assert_eq!(NodeKind::from_mime_type("image/png"), NodeKind::RawFile);
    }

    #[test]
    fn test_node_kind_unknown_google_type_is_raw_file() {
        // Forms, drawings, etc. have no export mapping here; they go through
        // the plain media path and fail per-file if the service refuses.
        assert_eq!(
            NodeKind::from_mime_type("application/vnd.google-apps.form"),
            NodeKind::RawFile
        );
    }

    #[test]
    fn test_node_kind_is_folder() {
        assert!(NodeKind::Folder.is_folder());
        assert!(!NodeKind::RawFile.is_folder());
        assert!(!NodeKind::Document(DocumentKind::Document).is_folder());
    }

    #[test]
    fn test_remote_node_new() {
        let node = RemoteNode::new("abc123", "Budget", NodeKind::RawFile);
        assert_eq!(node.id, "abc123");
        assert_eq!(node.name, "Budget");
        assert_eq!(node.kind, NodeKind::RawFile);
    }
}
