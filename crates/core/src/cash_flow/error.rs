//! Cash flow error types.

use rust_decimal::Decimal;
use soquy_shared::AppError;
use soquy_shared::types::{DisbursementId, ReceiptId};
use thiserror::Error;

use crate::error::ErrorKind;

/// Errors that can occur while recording cash movements.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CashFlowError {
    /// Amount is zero or negative.
    #[error("Cash flow amount must be greater than zero, got {0}")]
    InvalidAmount(Decimal),

    /// Description is blank.
    #[error("Cash flow description is required")]
    EmptyDescription,

    /// Receipt not found.
    #[error("Receipt {0} not found")]
    ReceiptNotFound(ReceiptId),

    /// Disbursement not found.
    #[error("Disbursement {0} not found")]
    DisbursementNotFound(DisbursementId),

    /// Storage failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CashFlowError {
    /// Returns the failure class of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAmount(_) | Self::EmptyDescription => ErrorKind::Validation,
            Self::ReceiptNotFound(_) | Self::DisbursementNotFound(_) => ErrorKind::NotFound,
            Self::Storage(_) => ErrorKind::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        self.kind().http_status_code()
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::EmptyDescription => "EMPTY_DESCRIPTION",
            Self::ReceiptNotFound(_) => "RECEIPT_NOT_FOUND",
            Self::DisbursementNotFound(_) => "DISBURSEMENT_NOT_FOUND",
            Self::Storage(_) => "DATABASE_ERROR",
        }
    }
}

impl From<CashFlowError> for AppError {
    fn from(err: CashFlowError) -> Self {
        err.kind().into_app_error(err.to_string())
    }
}
