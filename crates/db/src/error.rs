//! Mapping of storage failures onto domain errors.
//!
//! Unique-code clashes keep their meaning; everything else is reported as
//! a storage error with the backend message.

use soquy_core::cash_flow::CashFlowError;
use soquy_core::debt::{Debt, DebtError};
use soquy_core::invoice::InvoiceError;

use crate::store::{Record, StoreError};

impl From<StoreError> for DebtError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateCode { code, .. } => Self::DuplicateCode(code),
            other => Self::Storage(other.to_string()),
        }
    }
}

impl From<StoreError> for InvoiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateCode { collection, code } if collection == Debt::COLLECTION => {
                Self::Debt(DebtError::DuplicateCode(code))
            }
            StoreError::DuplicateCode { code, .. } => Self::DuplicateCode(code),
            other => Self::Storage(other.to_string()),
        }
    }
}

impl From<StoreError> for CashFlowError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err.to_string())
    }
}
