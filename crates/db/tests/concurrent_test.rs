//! Concurrent access tests for the debt ledger.
//!
//! Concurrent payments against the same debt must never overshoot the
//! principal, and every accepted payment must leave exactly one cash entry.

#![allow(clippy::uninlined_format_args)]

mod common;

use std::sync::Arc;

use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::Barrier;

use soquy_core::debt::{DebtError, DebtStatus};
use soquy_db::ReceiptFilter;
use soquy_shared::types::{CustomerId, PageRequest};

use common::{Ledger, invoice_input, issue_input, item, pay_input, payment, receivable};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_payments_never_exceed_principal() {
    let ledger = Arc::new(Ledger::new());
    let debt = ledger
        .debts
        .create(receivable(dec!(100000), ledger.user))
        .await
        .unwrap();

    let debt_id = debt.id;

    const NUM_PAYMENTS: usize = 10;
    let amount = dec!(30000);
    let barrier = Arc::new(Barrier::new(NUM_PAYMENTS));

    let mut handles = Vec::with_capacity(NUM_PAYMENTS);
    for _ in 0..NUM_PAYMENTS {
        let ledger = Arc::clone(&ledger);
        let barrier = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            ledger
                .debts
                .record_payment(debt_id, payment(amount, ledger.user))
                .await
        }));
    }

    let results = join_all(handles).await;

    let mut success_count = 0;
    for result in results {
        match result.expect("task panicked") {
            Ok(_) => success_count += 1,
            Err(e) => assert!(
                matches!(e, DebtError::PaymentExceedsRemaining { .. }),
                "unexpected error: {}",
                e
            ),
        }
    }
    assert_eq!(success_count, 3);

    let debt = ledger.debts.get(debt.id).await.unwrap();
    assert_eq!(debt.payments.len(), 3);
    assert_eq!(debt.amount_paid(), dec!(90000));
    assert_eq!(debt.amount_remaining(), dec!(10000));
    assert_eq!(debt.status, DebtStatus::PartiallyPaid);

    let receipts = ledger
        .cash_flows
        .list_receipts(&ReceiptFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(receipts.meta.total, 3);
    let total: Decimal = receipts.data.iter().map(|r| r.amount).sum();
    assert_eq!(total, debt.amount_paid());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_invoice_payments_pay_once() {
    let ledger = Arc::new(Ledger::new());
    let invoice = ledger
        .invoices
        .create(invoice_input(
            CustomerId::new(),
            ledger.user,
            vec![item("Thép", dec!(4), dec!(25000))],
        ))
        .await
        .unwrap();
    let issued = ledger
        .invoices
        .issue(invoice.id, issue_input(ledger.user))
        .await
        .unwrap();

    let invoice_id = invoice.id;

    const NUM_PAYMENTS: usize = 8;
    let barrier = Arc::new(Barrier::new(NUM_PAYMENTS));

    let mut handles = Vec::with_capacity(NUM_PAYMENTS);
    for _ in 0..NUM_PAYMENTS {
        let ledger = Arc::clone(&ledger);
        let barrier = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            ledger
                .invoices
                .pay(invoice_id, pay_input(None, ledger.user))
                .await
        }));
    }

    let successes = join_all(handles)
        .await
        .into_iter()
        .map(|r| r.expect("task panicked"))
        .filter(Result::is_ok)
        .count();
    assert_eq!(successes, 1);

    let debt = ledger.debts.get(issued.debt.id).await.unwrap();
    assert_eq!(debt.payments.len(), 1);
    assert_eq!(debt.status, DebtStatus::Paid);

    let receipts = ledger
        .cash_flows
        .list_receipts(
            &ReceiptFilter {
                invoice_id: Some(invoice.id),
                ..ReceiptFilter::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(receipts.meta.total, 1);
    assert_eq!(receipts.data[0].amount, dec!(100000));
}
