//! Error types for Semaphore API operations.

use thiserror::Error;

/// Errors that can occur during Semaphore API operations.
#[derive(Debug, Error)]
pub enum SemaphoreError {
    /// Configuration is missing or incomplete.
    #[error("Semaphore configuration required: {0}")]
    ConfigMissing(String),

    /// The auth token was rejected or missing.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The requested resource does not exist.
    #[error("Resource '{url}' not found")]
    NotFound { url: String },

    /// A lookup by name or number found nothing in a fetched collection.
    #[error("{entity_type} '{id}' not found")]
    EntityNotFound { entity_type: String, id: String },

    /// The request body was rejected by the API.
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// API request failed with an unclassified status.
    #[error("Semaphore API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error (connect, TLS, timeout).
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Response body does not match the expected shape.
    #[error("Failed to decode response: {0}")]
    DecodeError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },
}

impl SemaphoreError {
    /// A mutation succeeded but the API returned no entity.
    pub(crate) fn empty_response(url: &str) -> Self {
        Self::ApiError {
            message: format!("empty response body from {url}"),
            status_code: None,
        }
    }

    /// A named entity is absent from a fetched collection.
    pub fn entity_not_found(entity_type: &str, id: impl ToString) -> Self {
        Self::EntityNotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    /// Returns true if the resource is missing, remotely or locally.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::EntityNotFound { .. })
    }
}

/// Result type alias for Semaphore operations.
pub type Result<T> = core::result::Result<T, SemaphoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_not_found_message() {
        let err = SemaphoreError::entity_not_found("project", "missing");
        assert_eq!(err.to_string(), "project 'missing' not found");
        assert!(err.is_not_found());

        let err = SemaphoreError::entity_not_found("build", 35);
        assert_eq!(err.to_string(), "build '35' not found");
    }

    #[test]
    fn test_remote_not_found_message() {
        let err = SemaphoreError::NotFound {
            url: "https://semaphoreci.com/api/v1/projects/x/hooks".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Resource 'https://semaphoreci.com/api/v1/projects/x/hooks' not found"
        );
        assert!(err.is_not_found());
    }
}
