//! Google Drive v3 REST client.
//!
//! Production implementation of [`RemoteStorage`] over `reqwest`. The client
//! holds an established bearer token; obtaining one is the `auth` module's
//! job. The base URL is overridable so tests can point the client at a mock
//! server.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use super::error::RemoteError;
use super::{NodeKind, RemoteContent, RemoteNode, RemoteStorage};

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

/// Connection timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Read timeout in seconds, sized for large media downloads.
const READ_TIMEOUT_SECS: u64 = 300;

/// Listing fields requested from the service; everything the mirror needs
/// and nothing else.
const LIST_FIELDS: &str = "nextPageToken, files(id, name, mimeType)";

/// One page of a `files.list` response.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

/// One entry of a `files.list` response.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    mime_type: String,
}

impl From<DriveFile> for RemoteNode {
    fn from(file: DriveFile) -> Self {
        let kind = NodeKind::from_mime_type(&file.mime_type);
        Self::new(file.id, file.name, kind)
    }
}

/// HTTP client for the Drive v3 API.
///
/// Designed to be created once and reused for the whole run, taking
/// advantage of connection pooling.
#[derive(Debug, Clone)]
pub struct DriveClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl DriveClient {
    /// Creates a client against the production API host.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static configuration
    /// or the built-in base URL does not parse. Neither should happen in
    /// practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new(token: impl Into<String>) -> Self {
        let base_url = Url::parse(DEFAULT_BASE_URL).expect("default base URL must parse");
        Self::with_base_url(token, base_url)
    }

    /// Creates a client against an explicit base URL. Used by tests to
    /// target a mock server.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_base_url(token: impl Into<String>, base_url: Url) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .gzip(true)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self {
            client,
            base_url,
            token: token.into(),
        }
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, RemoteError> {
        // Url::join only fails on degenerate bases (cannot-be-a-base URLs),
        // which the constructors rule out; map it anyway instead of panicking.
        self.base_url
            .join(endpoint)
            .map_err(|_| RemoteError::HttpStatus {
                endpoint: endpoint.to_string(),
                status: 0,
            })
    }

    async fn get_content(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<RemoteContent, RemoteError> {
        let url = self.endpoint_url(endpoint)?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(|e| RemoteError::transport(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::http_status(endpoint, status.as_u16()));
        }

        let len = response.content_length();
        let owned_endpoint = endpoint.to_string();
        let stream = response
            .bytes_stream()
            .map(move |chunk| chunk.map_err(|e| RemoteError::transport(owned_endpoint.clone(), e)));
        Ok(RemoteContent {
            len,
            stream: Box::pin(stream),
        })
    }
}

#[async_trait]
impl RemoteStorage for DriveClient {
    /// Lists non-trashed direct children, following `nextPageToken` until
    /// the listing is exhausted.
    #[instrument(level = "debug", skip(self))]
    async fn list_children(&self, folder_id: &str) -> Result<Vec<RemoteNode>, RemoteError> {
        let endpoint = "/drive/v3/files";
        let query = format!("'{folder_id}' in parents and trashed = false");

        let mut nodes = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let url = self.endpoint_url(endpoint)?;
            let mut request = self
                .client
                .get(url)
                .bearer_auth(&self.token)
                .query(&[("q", query.as_str()), ("fields", LIST_FIELDS)]);
            if let Some(token) = page_token.as_deref() {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| RemoteError::transport(endpoint, e))?;
            let status = response.status();
            if !status.is_success() {
                return Err(RemoteError::http_status(endpoint, status.as_u16()));
            }

            let page: FileList = response
                .json()
                .await
                .map_err(|e| RemoteError::invalid_response(endpoint, e))?;
            nodes.extend(page.files.into_iter().map(RemoteNode::from));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(folder_id, children = nodes.len(), "listed folder");
        Ok(nodes)
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_content(&self, file_id: &str) -> Result<RemoteContent, RemoteError> {
        let endpoint = format!("/drive/v3/files/{file_id}");
        self.get_content(&endpoint, &[("alt", "media")]).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn export_content(
        &self,
        file_id: &str,
        mime_type: &str,
    ) -> Result<RemoteContent, RemoteError> {
        let endpoint = format!("/drive/v3/files/{file_id}/export");
        self.get_content(&endpoint, &[("mimeType", mime_type)]).await
    }
}
