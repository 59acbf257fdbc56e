//! Error classification shared by every domain error.

use std::fmt;

use soquy_shared::AppError;

/// The four business failure classes plus storage/internal failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range input.
    Validation,
    /// Referenced entity is absent.
    NotFound,
    /// Wrong state for the requested transition or another rule violation.
    Conflict,
    /// Unique document code collision.
    DuplicateCode,
    /// Storage or other internal failure, passed through unmodified.
    Internal,
}

impl ErrorKind {
    /// Returns the HTTP status code for this class of error.
    #[must_use]
    pub const fn http_status_code(self) -> u16 {
        match self {
            Self::Validation | Self::Conflict | Self::DuplicateCode => 400,
            Self::NotFound => 404,
            Self::Internal => 500,
        }
    }

    /// Wraps a rendered message into the matching `AppError` variant.
    #[must_use]
    pub fn into_app_error(self, message: String) -> AppError {
        match self {
            Self::Validation => AppError::Validation(message),
            Self::NotFound => AppError::NotFound(message),
            Self::Conflict => AppError::Conflict(message),
            Self::DuplicateCode => AppError::DuplicateCode(message),
            Self::Internal => AppError::Database(message),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::DuplicateCode => "duplicate_code",
            Self::Internal => "internal",
        };
        f.write_str(name)
    }
}
