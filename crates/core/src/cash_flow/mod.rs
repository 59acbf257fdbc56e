//! Cash flow recorder rules (thu / chi).
//!
//! Receipts record money coming in, disbursements money going out. Entries
//! are append-only: once built they are never edited by the core.

pub mod error;
pub mod service;
pub mod types;

pub use error::CashFlowError;
pub use service::CashFlowService;
pub use types::{
    CashFlowDetails, CashFlowEntry, CashFlowKind, Disbursement, DisbursementCategory,
    NewCashFlow, Receipt, ReceiptCategory,
};
