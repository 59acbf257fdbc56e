//! Debt ledger error types.

use rust_decimal::Decimal;
use soquy_shared::AppError;
use soquy_shared::types::DebtId;
use thiserror::Error;

use super::types::{DebtStatus, DebtType};
use crate::cash_flow::CashFlowError;
use crate::error::ErrorKind;

/// Errors that can occur during debt ledger operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DebtError {
    /// Principal is zero or negative.
    #[error("Principal must be greater than zero, got {0}")]
    InvalidPrincipal(Decimal),

    /// No due date supplied.
    #[error("Due date is required")]
    DueDateRequired,

    /// The counterparty required by the debt type is missing.
    #[error("A {debt_type} debt requires a {expected}")]
    CounterpartyRequired {
        /// The debt type.
        debt_type: DebtType,
        /// The required counterparty kind.
        expected: &'static str,
    },

    /// The counterparty kind does not match the debt type.
    #[error("A {debt_type} debt cannot reference a {found}")]
    CounterpartyMismatch {
        /// The debt type.
        debt_type: DebtType,
        /// The counterparty kind supplied.
        found: &'static str,
    },

    /// Payment amount is zero or negative.
    #[error("Payment amount must be greater than zero, got {0}")]
    InvalidPaymentAmount(Decimal),

    /// Payment amount is larger than what is still owed.
    #[error("Payment amount {amount} exceeds remaining balance {remaining}")]
    PaymentExceedsRemaining {
        /// The requested amount.
        amount: Decimal,
        /// The remaining balance.
        remaining: Decimal,
    },

    /// New principal is below what has already been paid.
    #[error("Principal {principal} cannot be below the amount already paid {paid}")]
    PrincipalBelowPaid {
        /// The requested principal.
        principal: Decimal,
        /// The amount already paid.
        paid: Decimal,
    },

    /// Debt type cannot change after creation.
    #[error("Debt type cannot be changed from {from} to {to}")]
    DebtTypeChangeNotAllowed {
        /// The current type.
        from: DebtType,
        /// The requested type.
        to: DebtType,
    },

    /// The debt is closed and accepts no further changes.
    #[error("Debt {code} is {status} and can no longer be changed")]
    DebtClosed {
        /// The debt code.
        code: String,
        /// The current status.
        status: DebtStatus,
    },

    /// Blank debt code.
    #[error("Debt code cannot be empty")]
    EmptyCode,

    /// Debt not found.
    #[error("Debt {0} not found")]
    NotFound(DebtId),

    /// Debt code already in use.
    #[error("Debt code {0} already exists")]
    DuplicateCode(String),

    /// Debt originates from an invoice and cannot be deleted on its own.
    #[error("Debt {0} is linked to an invoice and cannot be deleted")]
    LinkedToInvoice(String),

    /// Failure recording the mirrored cash movement.
    #[error(transparent)]
    CashFlow(#[from] CashFlowError),

    /// Storage failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DebtError {
    /// Returns the failure class of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPrincipal(_)
            | Self::DueDateRequired
            | Self::CounterpartyRequired { .. }
            | Self::CounterpartyMismatch { .. }
            | Self::InvalidPaymentAmount(_)
            | Self::PaymentExceedsRemaining { .. }
            | Self::PrincipalBelowPaid { .. }
            | Self::DebtTypeChangeNotAllowed { .. }
            | Self::EmptyCode => ErrorKind::Validation,
            Self::DebtClosed { .. } | Self::LinkedToInvoice(_) => ErrorKind::Conflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::DuplicateCode(_) => ErrorKind::DuplicateCode,
            Self::CashFlow(e) => e.kind(),
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
            Self::InvalidPrincipal(_) => "INVALID_PRINCIPAL",
            Self::DueDateRequired => "DUE_DATE_REQUIRED",
            Self::CounterpartyRequired { .. } => "COUNTERPARTY_REQUIRED",
            Self::CounterpartyMismatch { .. } => "COUNTERPARTY_MISMATCH",
            Self::InvalidPaymentAmount(_) => "INVALID_PAYMENT_AMOUNT",
            Self::PaymentExceedsRemaining { .. } => "PAYMENT_EXCEEDS_REMAINING",
            Self::PrincipalBelowPaid { .. } => "PRINCIPAL_BELOW_PAID",
            Self::DebtTypeChangeNotAllowed { .. } => "DEBT_TYPE_CHANGE_NOT_ALLOWED",
            Self::DebtClosed { .. } => "DEBT_CLOSED",
            Self::EmptyCode => "EMPTY_CODE",
            Self::NotFound(_) => "DEBT_NOT_FOUND",
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::LinkedToInvoice(_) => "DEBT_LINKED_TO_INVOICE",
            Self::CashFlow(e) => e.error_code(),
            Self::Storage(_) => "DATABASE_ERROR",
        }
    }
}

impl From<DebtError> for AppError {
    fn from(err: DebtError) -> Self {
        err.kind().into_app_error(err.to_string())
    }
}
