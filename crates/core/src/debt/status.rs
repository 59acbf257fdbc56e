//! Debt status derivation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use soquy_shared::types::date::is_past;

use super::types::{DebtStatus, PaymentRecord};

/// Derives a debt's status from its inputs.
///
/// Evaluated in order:
/// 1. nothing remains → `Paid`
/// 2. something paid → `PartiallyPaid`
/// 3. due date before `today` → `Overdue`
/// 4. otherwise → `Unpaid`
///
/// Pure: the same inputs always give the same status.
#[must_use]
pub fn derive_status(
    principal: Decimal,
    payments: &[PaymentRecord],
    due_date: NaiveDate,
    today: NaiveDate,
) -> DebtStatus {
    let paid: Decimal = payments.iter().map(|p| p.amount).sum();
    let remaining = principal - paid;

    if remaining <= Decimal::ZERO {
        DebtStatus::Paid
    } else if paid > Decimal::ZERO {
        DebtStatus::PartiallyPaid
    } else if is_past(due_date, today) {
        DebtStatus::Overdue
    } else {
        DebtStatus::Unpaid
    }
}
