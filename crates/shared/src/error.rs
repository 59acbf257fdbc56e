//! Application-wide error types.

use thiserror::Error;

/// Application error types.
///
/// Domain errors from the core and persistence crates convert into this
/// type so outer layers see one transport-neutral taxonomy.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or out-of-range input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// State-machine transition or business-rule violation.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unique document code already in use.
    #[error("Duplicate code: {0}")]
    DuplicateCode(String),

    /// Storage layer failure.
    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    ///
    /// Conflicts and duplicate codes are reported as bad requests.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Conflict(_) | Self::DuplicateCode(_) => 400,
            Self::NotFound(_) => 404,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}
