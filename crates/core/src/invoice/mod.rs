//! Sales invoice engine (hóa đơn).
//!
//! Invoices carry embedded line items whose totals are always recomputed
//! here, never taken from the caller. The lifecycle is a small state
//! machine:
//!
//! ```text
//! draft ──issue──▶ issued ──pay──▶ paid
//!   │                │
//!   └────cancel──────┴──cancel──▶ cancelled
//! ```
//!
//! Issuing creates the linked receivable debt, paying mirrors into that
//! debt and the cash book. Those side effects are described by this module
//! and carried out atomically by the persistence layer.

pub mod error;
pub mod service;
pub mod totals;
pub mod types;

#[cfg(test)]
mod totals_props;

pub use error::InvoiceError;
pub use service::InvoiceService;
pub use totals::compute_invoice_totals;
pub use types::{
    CreateInvoiceInput, Invoice, InvoiceKind, InvoiceStatus, InvoiceTotals, IssueInvoiceInput,
    LineItem, LineItemInput, PayInvoiceInput, UpdateInvoiceInput,
};
