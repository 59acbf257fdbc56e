//! Property-based tests for payment sequences through the repositories.
//!
//! Each case runs against a fresh store on its own runtime.

mod common;

use proptest::prelude::*;
use rust_decimal::Decimal;

use soquy_core::debt::{DebtError, DebtStatus};
use soquy_db::{DebtRepository, MemoryStore, ReceiptFilter};
use soquy_shared::types::{DebtId, PageRequest};

use common::{Ledger, payment, receivable};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

/// Whole-đồng amounts up to 5 million.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=5_000_000i64).prop_map(Decimal::from)
}

fn arb_principal() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000_000i64).prop_map(Decimal::from)
}

async fn paid_total(debts: &DebtRepository<MemoryStore>, id: DebtId) -> Decimal {
    debts.get(id).await.unwrap().amount_paid()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Accepted payments add up to the debt's paid amount, rejected ones
    /// change nothing, and every accepted payment leaves exactly one receipt.
    #[test]
    fn prop_payment_sequence_keeps_ledger_balanced(
        principal in arb_principal(),
        amounts in prop::collection::vec(arb_amount(), 1..15),
    ) {
        runtime().block_on(async {
            let ledger = Ledger::new();
            let debt = ledger
                .debts
                .create(receivable(principal, ledger.user))
                .await
                .unwrap();

            let mut accepted = Decimal::ZERO;
            let mut accepted_count = 0u64;
            for amount in amounts {
                let remaining = principal - accepted;
                match ledger.debts.record_payment(debt.id, payment(amount, ledger.user)).await {
                    Ok(result) => {
                        prop_assert!(amount <= remaining);
                        accepted += amount;
                        accepted_count += 1;
                        prop_assert_eq!(result.debt.amount_paid(), accepted);
                        prop_assert_eq!(
                            result.debt.amount_paid() + result.debt.amount_remaining(),
                            principal
                        );
                    }
                    Err(DebtError::PaymentExceedsRemaining { remaining: reported, .. }) => {
                        prop_assert!(amount > remaining);
                        prop_assert_eq!(reported, remaining);
                        prop_assert_eq!(paid_total(&ledger.debts, debt.id).await, accepted);
                    }
                    Err(e) => prop_assert!(false, "unexpected error: {e}"),
                }
            }

            let stored = ledger.debts.get(debt.id).await.unwrap();
            prop_assert!(stored.amount_paid() <= principal);
            let expected = if accepted == principal {
                DebtStatus::Paid
            } else if accepted > Decimal::ZERO {
                DebtStatus::PartiallyPaid
            } else {
                DebtStatus::Unpaid
            };
            prop_assert_eq!(stored.status, expected);

            let receipts = ledger
                .cash_flows
                .list_receipts(&ReceiptFilter::default(), PageRequest::new(1, 100))
                .await
                .unwrap();
            prop_assert_eq!(receipts.meta.total, accepted_count);
            let receipted: Decimal = receipts.data.iter().map(|r| r.amount).sum();
            prop_assert_eq!(receipted, accepted);
            Ok(())
        })?;
    }
}
