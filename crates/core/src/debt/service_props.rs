//! Property-based tests for the debt ledger.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use soquy_shared::types::{CustomerId, UserId};

use crate::common::{Counterparty, PaymentMethod};
use crate::debt::error::DebtError;
use crate::debt::service::DebtService;
use crate::debt::status::derive_status;
use crate::debt::types::{CreateDebtInput, Debt, DebtStatus, DebtType, PaymentInput};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// Whole-đồng amounts from 1 to 10 billion.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000_000_000i64).prop_map(Decimal::from)
}

fn arb_payments() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(arb_amount(), 0..12)
}

fn arb_day_offset() -> impl Strategy<Value = i64> {
    -60i64..60i64
}

fn new_debt(principal: Decimal, due_offset: i64) -> Debt {
    let input = CreateDebtInput {
        code: None,
        debt_type: DebtType::Receivable,
        principal,
        created_on: None,
        due_date: Some(base_date() + chrono::Duration::days(due_offset)),
        note: None,
        counterparty: Some(Counterparty::Customer(CustomerId::new())),
        invoice_id: None,
        created_by: UserId::new(),
    };
    DebtService::create(input, "PT202406000001".into(), base_date(), Utc::now()).unwrap()
}

fn pay(amount: Decimal) -> PaymentInput {
    PaymentInput {
        amount,
        method: PaymentMethod::BankTransfer,
        paid_on: None,
        note: None,
        recorded_by: UserId::new(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Paid plus remaining always equals the principal, and paid never
    /// exceeds it, whatever sequence of payments is attempted.
    #[test]
    fn prop_paid_plus_remaining_is_principal(
        principal in arb_amount(),
        attempts in arb_payments(),
        due_offset in arb_day_offset(),
    ) {
        let mut debt = new_debt(principal, due_offset);

        for amount in attempts {
            let before = debt.payments.len();
            match DebtService::apply_payment(&mut debt, pay(amount), base_date(), Utc::now()) {
                Ok(_) => prop_assert_eq!(debt.payments.len(), before + 1),
                Err(DebtError::PaymentExceedsRemaining { remaining, .. }) => {
                    prop_assert!(amount > remaining);
                    prop_assert_eq!(debt.payments.len(), before);
                }
                Err(DebtError::DebtClosed { .. }) => prop_assert_eq!(debt.status, DebtStatus::Paid),
                Err(other) => prop_assert!(false, "unexpected error {other:?}"),
            }

            prop_assert_eq!(debt.amount_paid() + debt.amount_remaining(), debt.principal);
            prop_assert!(debt.amount_paid() <= debt.principal);
        }
    }

    /// Amount paid never decreases as payments are appended.
    #[test]
    fn prop_amount_paid_is_monotone(
        principal in arb_amount(),
        attempts in arb_payments(),
    ) {
        let mut debt = new_debt(principal, 30);
        let mut last_paid = Decimal::ZERO;

        for amount in attempts {
            let _ = DebtService::apply_payment(&mut debt, pay(amount), base_date(), Utc::now());
            prop_assert!(debt.amount_paid() >= last_paid);
            last_paid = debt.amount_paid();
        }
    }

    /// The stored status always matches a fresh derivation.
    #[test]
    fn prop_status_matches_derivation(
        principal in arb_amount(),
        attempts in arb_payments(),
        due_offset in arb_day_offset(),
    ) {
        let mut debt = new_debt(principal, due_offset);

        for amount in attempts {
            let _ = DebtService::apply_payment(&mut debt, pay(amount), base_date(), Utc::now());
            let derived = derive_status(debt.principal, &debt.payments, debt.due_date, base_date());
            prop_assert_eq!(debt.status, derived);
        }
    }

    /// Derivation is deterministic and `paid` exactly when nothing remains.
    #[test]
    fn prop_derivation_is_deterministic(
        principal in arb_amount(),
        due_offset in arb_day_offset(),
        today_offset in arb_day_offset(),
    ) {
        let due = base_date() + chrono::Duration::days(due_offset);
        let today = base_date() + chrono::Duration::days(today_offset);

        let first = derive_status(principal, &[], due, today);
        let second = derive_status(principal, &[], due, today);
        prop_assert_eq!(first, second);

        let expected = if due < today { DebtStatus::Overdue } else { DebtStatus::Unpaid };
        prop_assert_eq!(first, expected);
    }

    /// A rejected overpayment leaves the debt exactly as it was.
    #[test]
    fn prop_overpayment_leaves_debt_untouched(
        principal in arb_amount(),
        excess in arb_amount(),
    ) {
        let mut debt = new_debt(principal, 30);
        let snapshot = debt.clone();

        let result = DebtService::apply_payment(
            &mut debt,
            pay(principal + excess),
            base_date(),
            Utc::now(),
        );

        prop_assert!(result.is_err());
        prop_assert_eq!(debt, snapshot);
    }
}
