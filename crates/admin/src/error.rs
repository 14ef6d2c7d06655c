//! Unified error handling for back-office consumers.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::draft::DraftError;
use crate::storage::StorageError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Client storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Backend call failed. Displays the backend message as is.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Draft operation failed.
    #[error("{0}")]
    Draft(#[from] DraftError),

    /// No session token is stored.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid operator input.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether the failure comes from a missing or rejected session.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized(_)
                | Self::Api(ApiError::MissingToken | ApiError::Api { status: 401, .. })
                | Self::Draft(DraftError::MissingToken | DraftError::Rejected { status: 401, .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("quantity must be at least 1".to_string());
        assert_eq!(err.to_string(), "Bad request: quantity must be at least 1");

        let err = AppError::from(ApiError::Api {
            status: 400,
            message: "bad order".to_string(),
        });
        assert_eq!(err.to_string(), "bad order");

        let err = AppError::from(DraftError::InvalidArgument { index: 3, len: 1 });
        assert_eq!(
            err.to_string(),
            "Line index 3 is out of range (draft has 1 lines)"
        );
    }

    #[test]
    fn test_auth_failures() {
        assert!(AppError::Unauthorized("login first".to_string()).is_auth_failure());
        assert!(AppError::from(ApiError::MissingToken).is_auth_failure());
        assert!(
            AppError::from(ApiError::Api {
                status: 401,
                message: "expired".to_string()
            })
            .is_auth_failure()
        );
        assert!(AppError::from(DraftError::MissingToken).is_auth_failure());
        assert!(!AppError::BadRequest("x".to_string()).is_auth_failure());
    }
}
