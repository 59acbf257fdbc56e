//! Persistence layer with the storage gateway and transactional repositories.
//!
//! This crate provides:
//! - The `Store`/`StoreTx` gateway and an in-memory document backend
//! - `Record` bindings for the domain entities
//! - Repositories that run each ledger, invoice and cash-flow operation
//!   inside a single storage transaction

mod error;
pub mod records;
pub mod repositories;
pub mod store;

pub use repositories::{
    CancelledInvoice, CashFlowRepository, DebtFilter, DebtPaymentResult, DebtRepository,
    DisbursementFilter, InvoiceFilter, InvoiceRepository, IssuedInvoice, PaidInvoice,
    ReceiptFilter,
};
pub use store::{MemoryStore, Store, StoreError, StoreTx};
