//! Drive Mirror Core Library
//!
//! This library provides the core functionality for the drive-mirror tool,
//! which walks a remote Google Drive folder tree and reconstructs it on the
//! local filesystem, skipping files already downloaded in a prior run.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`auth`] - Access token bootstrapping from env or stored token file
//! - [`export`] - Google-native document type to export format mapping
//! - [`ledger`] - Append-only record of completed transfers
//! - [`mirror`] - Depth-first traversal and per-file transfer engine
//! - [`remote`] - Remote storage capability trait and the Drive client

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod export;
pub mod ledger;
pub mod mirror;
pub mod remote;

// Re-export commonly used types
pub use auth::{AuthError, load_access_token};
pub use export::{ExportFormat, export_file_name};
pub use ledger::{LedgerError, TransferLedger};
pub use mirror::{Mirror, MirrorError, MirrorStats};
pub use remote::{
    ByteStream, DocumentKind, NodeKind, RemoteContent, RemoteError, RemoteNode, RemoteStorage,
    drive::DriveClient,
};
