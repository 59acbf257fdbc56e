//! Debt ledger rules (công nợ).
//!
//! A debt is a receivable owed by a customer or a payable owed to a
//! supplier. Its status is never edited directly: it is derived from the
//! principal, the payment history and the due date every time one of them
//! changes.

pub mod error;
pub mod service;
pub mod status;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::DebtError;
pub use service::DebtService;
pub use status::derive_status;
pub use types::{
    CreateDebtInput, Debt, DebtStatus, DebtType, PaymentInput, PaymentRecord, UpdateDebtInput,
};
