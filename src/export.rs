//! Export format mapping for Google-native document types.
//!
//! Google Docs, Sheets, and Slides have no direct byte representation; the
//! service converts them server-side on download. This module carries the
//! fixed subtype-to-format table and the output filename rewrite that goes
//! with it.

/// Target format for a server-side document export.
///
/// Pairs the MIME type requested from the export endpoint with the file
/// extension the local copy receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportFormat {
    /// MIME type passed to the export endpoint.
    pub mime_type: &'static str,
    /// Extension (without the dot) for the local file name.
    pub extension: &'static str,
}

impl ExportFormat {
    /// Office Open XML word processing document.
    pub const DOCX: Self = Self {
        mime_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        extension: "docx",
    };

    /// Office Open XML spreadsheet.
    pub const XLSX: Self = Self {
        mime_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        extension: "xlsx",
    };

    /// Office Open XML presentation.
    pub const PPTX: Self = Self {
        mime_type: "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        extension: "pptx",
    };
}

/// Rewrites a remote display name for an exported document.
///
/// Any existing extension is stripped before the export extension is
/// appended: `Q1.gdoc` exported as docx becomes `Q1.docx`, `Budget`
/// exported as xlsx becomes `Budget.xlsx`. A leading-dot-only name such
/// as `.drafts` has no extension to strip and keeps its full stem.
#[must_use]
pub fn export_file_name(name: &str, format: ExportFormat) -> String {
    let stem = match name.rfind('.') {
        Some(index) if index > 0 => &name[..index],
        _ => name,
    };
    format!("{stem}.{}", format.extension)
}
