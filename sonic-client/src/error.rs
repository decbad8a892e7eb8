//! Error types for the object storage client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to object storage
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connection, TLS, body read)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Storage answered with a non-success status
    #[error("storage error on {bucket}/{key} (status {status}): {message}")]
    StorageError {
        bucket: String,
        /// Object key, or the listing prefix for list requests
        key: String,
        status: u16,
        /// Error body returned by the storage service
        message: String,
    },

    /// A bucket listing could not be read
    #[error("invalid listing for bucket {bucket}: {reason}")]
    InvalidListing { bucket: String, reason: String },

    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },
}

impl ClientError {
    /// Create a storage error for a request against `bucket`/`key`
    pub fn storage_error(
        bucket: &str,
        key: &str,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        Self::StorageError {
            bucket: bucket.to_string(),
            key: key.to_string(),
            status,
            message: message.into(),
        }
    }

    pub fn not_found(bucket: &str, key: &str) -> Self {
        Self::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_message() {
        let err = ClientError::storage_error("audit", "logs/a.json", 500, "InternalError");
        assert_eq!(
            err.to_string(),
            "storage error on audit/logs/a.json (status 500): InternalError"
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = ClientError::not_found("audit", "logs/a.json");
        assert_eq!(err.to_string(), "object not found: audit/logs/a.json");
    }
}
