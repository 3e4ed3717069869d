//! Access token bootstrapping.
//!
//! The interactive OAuth authorization flow is external to this tool: by the
//! time drive-mirror runs, a session is assumed to exist. This module only
//! locates it, either in the `DRIVE_ACCESS_TOKEN` environment variable or in
//! a stored token file written by whatever performed the authorization.
//! Failure here is fatal and aborts before any traversal.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Environment variable that overrides the stored token file.
pub const ACCESS_TOKEN_ENV: &str = "DRIVE_ACCESS_TOKEN";

/// Errors locating or reading the stored credential.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Neither the environment variable nor the token file is available.
    #[error(
        "no credential found: set {ACCESS_TOKEN_ENV} or provide a token file at {path} \
         (run your authorization flow first)"
    )]
    Missing {
        /// The token file path that was checked.
        path: PathBuf,
    },

    /// The token file exists but could not be read.
    #[error("IO error reading token file {path}: {source}")]
    Io {
        /// The token file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The token file is not valid JSON or lacks an access token.
    #[error("malformed token file {path}: {source}")]
    Malformed {
        /// The token file path.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The credential was found but is empty.
    #[error("empty access token in {source_name}")]
    Empty {
        /// Where the empty token came from (env var name or file path).
        source_name: String,
    },
}

/// Stored token file shape. Extra fields (refresh token, expiry, scopes)
/// are ignored; only the access token matters to this process.
#[derive(Debug, Deserialize)]
struct StoredToken {
    access_token: String,
}

/// Loads the bearer access token for the remote session.
///
/// The `DRIVE_ACCESS_TOKEN` environment variable wins when set; otherwise
/// the token file is read and parsed.
///
/// # Errors
///
/// Returns [`AuthError`] when no usable credential can be found. Callers
/// treat this as fatal.
pub fn load_access_token(token_file: &Path) -> Result<String, AuthError> {
    let env_token = std::env::var(ACCESS_TOKEN_ENV).ok();
    resolve_token(env_token, token_file)
}

fn resolve_token(env_token: Option<String>, token_file: &Path) -> Result<String, AuthError> {
    if let Some(token) = env_token {
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(AuthError::Empty {
                source_name: ACCESS_TOKEN_ENV.to_string(),
            });
        }
        debug!("using access token from environment");
        return Ok(token);
    }

    let contents = match std::fs::read_to_string(token_file) {
        Ok(contents) => contents,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Err(AuthError::Missing {
                path: token_file.to_path_buf(),
            });
        }
        Err(error) => {
            return Err(AuthError::Io {
                path: token_file.to_path_buf(),
                source: error,
            });
        }
    };

    let stored: StoredToken = serde_json::from_str(&contents).map_err(|e| AuthError::Malformed {
        path: token_file.to_path_buf(),
        source: e,
    })?;

    let token = stored.access_token.trim().to_string();
    if token.is_empty() {
        return Err(AuthError::Empty {
            source_name: token_file.display().to_string(),
        });
    }
    debug!(path = %token_file.display(), "using access token from token file");
    Ok(token)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_env_token_wins_over_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("token.json");
        std::fs::write(&path, r#"{"access_token": "from-file"}"#).unwrap();

        let token = resolve_token(Some("from-env".to_string()), &path).unwrap();
        assert_eq!(token, "from-env");
    }

    #[test]
    fn test_file_token_used_without_env() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("token.json");
        std::fs::write(
            &path,
            r#"{"access_token": "ya29.stored", "refresh_token": "1//extra", "expiry": "2026-01-01"}"#,
        )
        .unwrap();

        let token = resolve_token(None, &path).unwrap();
        assert_eq!(token, "ya29.stored");
    }

    #[test]
    fn test_missing_everything_is_missing_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("token.json");

        let result = resolve_token(None, &path);
        assert!(matches!(result, Err(AuthError::Missing { .. })));
    }

    #[test]
    fn test_malformed_token_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("token.json");
        std::fs::write(&path, "not json at all").unwrap();

        let result = resolve_token(None, &path);
        assert!(matches!(result, Err(AuthError::Malformed { .. })));
    }

    #[test]
    fn test_empty_env_token_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("token.json");

        let result = resolve_token(Some("   ".to_string()), &path);
        assert!(matches!(result, Err(AuthError::Empty { .. })));
    }

    #[test]
    fn test_empty_file_token_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("token.json");
        std::fs::write(&path, r#"{"access_token": ""}"#).unwrap();

        let result = resolve_token(None, &path);
        assert!(matches!(result, Err(AuthError::Empty { .. })));
    }

    #[test]
    fn test_missing_error_mentions_env_var() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("token.json");
        let error = resolve_token(None, &path).unwrap_err();
        let msg = error.to_string();
        assert!(msg.contains("DRIVE_ACCESS_TOKEN"), "Expected env hint in: {msg}");
    }
}
