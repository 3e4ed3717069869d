//! Error types for remote storage access.

use thiserror::Error;

/// Errors that can occur while talking to the remote storage service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error calling {endpoint}: {source}")]
    Network {
        /// The endpoint that failed.
        endpoint: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout calling {endpoint}")]
    Timeout {
        /// The endpoint that timed out.
        endpoint: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} calling {endpoint}")]
    HttpStatus {
        /// The endpoint that returned an error status.
        endpoint: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The session token was rejected (401) or access was denied (403).
    #[error("access denied (HTTP {status}) calling {endpoint}")]
    Auth {
        /// The endpoint that rejected the request.
        endpoint: String,
        /// The HTTP status code (401 or 403).
        status: u16,
    },

    /// The service returned a body that could not be decoded.
    #[error("invalid response from {endpoint}: {source}")]
    InvalidResponse {
        /// The endpoint that returned the undecodable body.
        endpoint: String,
        /// The underlying decode error.
        #[source]
        source: reqwest::Error,
    },
}

impl RemoteError {
    /// Creates a network error from a reqwest error, promoting timeouts.
    pub fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        let endpoint = endpoint.into();
        if source.is_timeout() {
            Self::Timeout { endpoint }
        } else {
            Self::Network { endpoint, source }
        }
    }

    /// Creates an HTTP status error, promoting 401/403 to [`RemoteError::Auth`].
    pub fn http_status(endpoint: impl Into<String>, status: u16) -> Self {
        let endpoint = endpoint.into();
        if matches!(status, 401 | 403) {
            Self::Auth { endpoint, status }
        } else {
            Self::HttpStatus { endpoint, status }
        }
    }

    /// Creates an invalid-response error.
    pub fn invalid_response(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self::InvalidResponse {
            endpoint: endpoint.into(),
            source,
        }
    }
}
