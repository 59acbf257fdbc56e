//! Property-based tests for invoice totals and lifecycle.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use soquy_shared::types::{CustomerId, UserId};

use crate::invoice::service::InvoiceService;
use crate::invoice::totals::compute_invoice_totals;
use crate::invoice::types::{
    CreateInvoiceInput, InvoiceKind, InvoiceStatus, LineItemInput, UpdateInvoiceInput,
};

fn arb_line() -> impl Strategy<Value = LineItemInput> {
    ("[a-zA-Z]{1,20}", 1i64..=1_000i64, 0i64..=50_000_000i64).prop_map(|(name, qty, price)| {
        LineItemInput {
            product_name: name,
            unit: None,
            quantity: Decimal::from(qty),
            unit_price: Decimal::from(price),
        }
    })
}

fn arb_lines() -> impl Strategy<Value = Vec<LineItemInput>> {
    prop::collection::vec(arb_line(), 0..8)
}

/// Discount percentages with up to two decimals, 0 to 100.
fn arb_discount() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|basis| Decimal::new(basis, 2))
}

fn arb_tax() -> impl Strategy<Value = Decimal> {
    (0i64..=100_000_000i64).prop_map(Decimal::from)
}

fn arb_status() -> impl Strategy<Value = InvoiceStatus> {
    prop_oneof![
        Just(InvoiceStatus::Draft),
        Just(InvoiceStatus::Issued),
        Just(InvoiceStatus::Paid),
        Just(InvoiceStatus::Cancelled),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Totals follow the formulas exactly and never go negative.
    #[test]
    fn prop_totals_follow_formulas(
        lines in arb_lines(),
        tax in arb_tax(),
        discount in arb_discount(),
    ) {
        let (items, totals) = compute_invoice_totals(&lines, tax, discount).unwrap();

        let subtotal: Decimal = lines.iter().map(|l| l.quantity * l.unit_price).sum();
        prop_assert_eq!(totals.subtotal, subtotal);
        prop_assert_eq!(items.len(), lines.len());
        prop_assert!(totals.discount_amount >= Decimal::ZERO);
        prop_assert!(totals.discount_amount <= totals.subtotal);
        prop_assert_eq!(
            totals.grand_total,
            totals.subtotal + totals.tax_amount - totals.discount_amount
        );
        prop_assert!(totals.grand_total >= Decimal::ZERO);
    }

    /// Updating with unchanged line items yields identical totals.
    #[test]
    fn prop_update_is_idempotent(
        lines in arb_lines(),
        tax in arb_tax(),
        discount in arb_discount(),
    ) {
        let input = CreateInvoiceInput {
            code: None,
            issue_date: None,
            kind: InvoiceKind::Sale,
            customer_id: CustomerId::new(),
            line_items: lines.clone(),
            tax_amount: tax,
            discount_percent: discount,
            note: None,
            created_by: UserId::new(),
        };
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut invoice = InvoiceService::create(input, "HD202406000001".into(), today, Utc::now()).unwrap();
        let original = invoice.totals;

        let update = UpdateInvoiceInput {
            line_items: Some(lines),
            ..UpdateInvoiceInput::default()
        };
        InvoiceService::apply_update(&mut invoice, update, Utc::now()).unwrap();
        prop_assert_eq!(invoice.totals, original);

        InvoiceService::apply_update(&mut invoice, UpdateInvoiceInput::default(), Utc::now()).unwrap();
        prop_assert_eq!(invoice.totals, original);
    }

    /// Nothing leaves a terminal status, and nothing re-enters draft.
    #[test]
    fn prop_terminal_states_are_final(from in arb_status(), to in arb_status()) {
        let valid = InvoiceService::is_valid_transition(from, to);
        if from.is_terminal() || to == InvoiceStatus::Draft || from == to {
            prop_assert!(!valid);
        }
    }
}
