//! Repository layer.
//!
//! Each repository method opens one storage transaction, applies the pure
//! rules from `soquy-core`, writes every affected record and commits once.
//! The `*_in` helpers operate on a caller's open transaction so that
//! operations spanning several entities stay atomic.

pub mod cash_flow;
pub mod debt;
pub mod invoice;

pub use cash_flow::{CashFlowRepository, DisbursementFilter, ReceiptFilter};
pub use debt::{DebtFilter, DebtPaymentResult, DebtRepository};
pub use invoice::{CancelledInvoice, InvoiceFilter, InvoiceRepository, IssuedInvoice, PaidInvoice};

use chrono::{DateTime, Utc};
use soquy_core::code::{candidate_code, normalize_code};
use tracing::warn;

use crate::store::{Record, StoreError, StoreTx};

/// Picks the code for a new record.
///
/// A supplied code is used as is and must be unused. Otherwise candidates
/// are generated and checked until a free one is found or `attempts` run
/// out.
pub(crate) async fn resolve_code<R: Record, T: StoreTx>(
    tx: &mut T,
    supplied: Option<String>,
    prefix: &str,
    now: DateTime<Utc>,
    attempts: u32,
) -> Result<String, StoreError> {
    if let Some(code) = normalize_code(supplied) {
        if tx.code_exists::<R>(&code).await? {
            return Err(StoreError::DuplicateCode {
                collection: R::COLLECTION,
                code,
            });
        }
        return Ok(code);
    }

    let mut candidate = String::new();
    for attempt in 0..attempts.max(1) {
        candidate = candidate_code(prefix, now, attempt);
        if !tx.code_exists::<R>(&candidate).await? {
            return Ok(candidate);
        }
        warn!(
            collection = R::COLLECTION,
            code = %candidate,
            attempt,
            "Generated code already in use"
        );
    }

    Err(StoreError::DuplicateCode {
        collection: R::COLLECTION,
        code: candidate,
    })
}
