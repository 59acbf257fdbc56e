//! Invoice engine error types.

use rust_decimal::Decimal;
use soquy_shared::AppError;
use soquy_shared::types::InvoiceId;
use thiserror::Error;

use super::types::InvoiceStatus;
use crate::cash_flow::CashFlowError;
use crate::debt::DebtError;
use crate::error::ErrorKind;

/// Errors that can occur during invoice operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvoiceError {
    /// A line item has no product name.
    #[error("Line {line}: product name is required")]
    EmptyProductName {
        /// 1-based line number.
        line: usize,
    },

    /// A line item quantity is zero or negative.
    #[error("Line {line}: quantity must be greater than zero, got {quantity}")]
    InvalidQuantity {
        /// 1-based line number.
        line: usize,
        /// The submitted quantity.
        quantity: Decimal,
    },

    /// A line item unit price is negative.
    #[error("Line {line}: unit price cannot be negative, got {unit_price}")]
    NegativeUnitPrice {
        /// 1-based line number.
        line: usize,
        /// The submitted unit price.
        unit_price: Decimal,
    },

    /// Discount percentage outside 0..=100.
    #[error("Discount percent must be between 0 and 100, got {0}")]
    InvalidDiscountPercent(Decimal),

    /// Tax amount is negative.
    #[error("Tax amount cannot be negative, got {0}")]
    NegativeTax(Decimal),

    /// Payment amount is zero or negative.
    #[error("Payment amount must be greater than zero, got {0}")]
    InvalidPaymentAmount(Decimal),

    /// The default due date cannot be represented.
    #[error("Due date is out of range")]
    DueDateOutOfRange,

    /// Blank invoice code.
    #[error("Invoice code cannot be empty")]
    EmptyCode,

    /// Attempted an invalid status transition.
    #[error("Invalid invoice status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: InvoiceStatus,
        /// The attempted target status.
        to: InvoiceStatus,
    },

    /// Only draft invoices can be edited.
    #[error("Invoice is {0} and can no longer be edited")]
    NotEditable(InvoiceStatus),

    /// Only draft or cancelled invoices can be deleted.
    #[error("Invoice is {0} and cannot be deleted")]
    NotDeletable(InvoiceStatus),

    /// The linked debt has recorded payments.
    #[error("Invoice has {0} in recorded payments and cannot be deleted")]
    HasPayments(Decimal),

    /// Invoice not found.
    #[error("Invoice {0} not found")]
    NotFound(InvoiceId),

    /// Invoice code already in use.
    #[error("Invoice code {0} already exists")]
    DuplicateCode(String),

    /// Failure in the linked debt.
    #[error(transparent)]
    Debt(#[from] DebtError),

    /// Failure recording the cash movement.
    #[error(transparent)]
    CashFlow(#[from] CashFlowError),

    /// Storage failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl InvoiceError {
    /// Returns the failure class of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyProductName { .. }
            | Self::InvalidQuantity { .. }
            | Self::NegativeUnitPrice { .. }
            | Self::InvalidDiscountPercent(_)
            | Self::NegativeTax(_)
            | Self::InvalidPaymentAmount(_)
            | Self::DueDateOutOfRange
            | Self::EmptyCode => ErrorKind::Validation,
            Self::InvalidTransition { .. }
            | Self::NotEditable(_)
            | Self::NotDeletable(_)
            | Self::HasPayments(_) => ErrorKind::Conflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::DuplicateCode(_) => ErrorKind::DuplicateCode,
            Self::Debt(e) => e.kind(),
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
            Self::EmptyProductName { .. } => "EMPTY_PRODUCT_NAME",
            Self::InvalidQuantity { .. } => "INVALID_QUANTITY",
            Self::NegativeUnitPrice { .. } => "NEGATIVE_UNIT_PRICE",
            Self::InvalidDiscountPercent(_) => "INVALID_DISCOUNT_PERCENT",
            Self::NegativeTax(_) => "NEGATIVE_TAX",
            Self::InvalidPaymentAmount(_) => "INVALID_PAYMENT_AMOUNT",
            Self::DueDateOutOfRange => "DUE_DATE_OUT_OF_RANGE",
            Self::EmptyCode => "EMPTY_CODE",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotEditable(_) => "INVOICE_NOT_EDITABLE",
            Self::NotDeletable(_) => "INVOICE_NOT_DELETABLE",
            Self::HasPayments(_) => "INVOICE_HAS_PAYMENTS",
            Self::NotFound(_) => "INVOICE_NOT_FOUND",
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::Debt(e) => e.error_code(),
            Self::CashFlow(e) => e.error_code(),
            Self::Storage(_) => "DATABASE_ERROR",
        }
    }
}

impl From<InvoiceError> for AppError {
    fn from(err: InvoiceError) -> Self {
        err.kind().into_app_error(err.to_string())
    }
}
