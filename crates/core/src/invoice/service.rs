//! Invoice service: creation, edits and lifecycle transitions.
//!
//! All methods are associated functions. Side effects on debts and the
//! cash book are returned as inputs for the caller to apply inside the
//! same storage transaction.

use chrono::{DateTime, NaiveDate, Utc};
use soquy_shared::types::InvoiceId;
use soquy_shared::types::date::add_days;
use soquy_shared::types::money::is_positive;

use super::error::InvoiceError;
use super::totals::compute_invoice_totals;
use super::types::{
    CreateInvoiceInput, Invoice, InvoiceStatus, IssueInvoiceInput, LineItemInput,
    PayInvoiceInput, UpdateInvoiceInput,
};
use crate::code::debt_code_for_invoice;
use crate::common::Counterparty;
use crate::debt::{CreateDebtInput, Debt, DebtType, PaymentInput};

/// Stateless service for the invoice lifecycle.
pub struct InvoiceService;

impl InvoiceService {
    /// Builds a new draft invoice with freshly computed totals.
    ///
    /// `code` is the final code, either supplied by the client or generated.
    pub fn create(
        input: CreateInvoiceInput,
        code: String,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Invoice, InvoiceError> {
        let code = code.trim().to_string();
        if code.is_empty() {
            return Err(InvoiceError::EmptyCode);
        }

        let (line_items, totals) =
            compute_invoice_totals(&input.line_items, input.tax_amount, input.discount_percent)?;

        Ok(Invoice {
            id: InvoiceId::new(),
            code,
            issue_date: input.issue_date.unwrap_or(today),
            kind: input.kind,
            customer_id: input.customer_id,
            line_items,
            totals,
            note: input.note,
            status: InvoiceStatus::Draft,
            debt_id: None,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies an edit to a draft invoice and recomputes its totals.
    ///
    /// Totals are recomputed even when no amount field changed.
    ///
    /// # Errors
    ///
    /// * `NotEditable` unless the invoice is a draft
    /// * line item, tax and discount validation errors
    pub fn apply_update(
        invoice: &mut Invoice,
        input: UpdateInvoiceInput,
        now: DateTime<Utc>,
    ) -> Result<(), InvoiceError> {
        if !invoice.status.is_editable() {
            return Err(InvoiceError::NotEditable(invoice.status));
        }

        let tax_amount = input.tax_amount.unwrap_or(invoice.totals.tax_amount);
        let discount_percent = input
            .discount_percent
            .unwrap_or(invoice.totals.discount_percent);

        let (line_items, totals) = match &input.line_items {
            Some(items) => compute_invoice_totals(items, tax_amount, discount_percent)?,
            None => {
                let items: Vec<LineItemInput> =
                    invoice.line_items.iter().map(LineItemInput::from).collect();
                compute_invoice_totals(&items, tax_amount, discount_percent)?
            }
        };

        invoice.line_items = line_items;
        invoice.totals = totals;

        if let Some(issue_date) = input.issue_date {
            invoice.issue_date = issue_date;
        }
        if let Some(kind) = input.kind {
            invoice.kind = kind;
        }
        if let Some(customer_id) = input.customer_id {
            invoice.customer_id = customer_id;
        }
        if let Some(note) = input.note {
            invoice.note = note;
        }
        invoice.updated_at = now;

        Ok(())
    }

    /// Returns true if `from → to` is a legal lifecycle transition.
    #[must_use]
    pub fn is_valid_transition(from: InvoiceStatus, to: InvoiceStatus) -> bool {
        matches!(
            (from, to),
            (InvoiceStatus::Draft, InvoiceStatus::Issued | InvoiceStatus::Cancelled)
                | (InvoiceStatus::Issued, InvoiceStatus::Paid | InvoiceStatus::Cancelled)
        )
    }

    /// Validates a transition and returns the new status.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` for any transition not in the lifecycle.
    pub fn transition(
        from: InvoiceStatus,
        to: InvoiceStatus,
    ) -> Result<InvoiceStatus, InvoiceError> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(InvoiceError::InvalidTransition { from, to })
        }
    }

    /// Checks that the invoice, and its linked debt if any, may be deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The invoice is neither a draft nor cancelled (`NotDeletable`)
    /// - The linked debt has payment history (`HasPayments`)
    pub fn validate_can_delete(
        invoice: &Invoice,
        linked_debt: Option<&Debt>,
    ) -> Result<(), InvoiceError> {
        if !invoice.status.is_deletable() {
            return Err(InvoiceError::NotDeletable(invoice.status));
        }
        match linked_debt {
            Some(debt) if !debt.payments.is_empty() => {
                Err(InvoiceError::HasPayments(debt.amount_paid()))
            }
            _ => Ok(()),
        }
    }

    /// Builds the receivable debt created when the invoice is issued.
    ///
    /// The debt takes the invoice's grand total as principal, its issue date
    /// as creation date, and a due date of `default_due_days` after the issue
    /// date unless one is supplied. Its code is derived from the invoice code.
    ///
    /// # Errors
    ///
    /// Returns `DueDateOutOfRange` if the default due date overflows.
    pub fn debt_input(
        invoice: &Invoice,
        input: &IssueInvoiceInput,
        default_due_days: u32,
    ) -> Result<CreateDebtInput, InvoiceError> {
        let due_date = match input.due_date {
            Some(date) => date,
            None => add_days(invoice.issue_date, default_due_days)
                .ok_or(InvoiceError::DueDateOutOfRange)?,
        };

        Ok(CreateDebtInput {
            code: Some(debt_code_for_invoice(&invoice.code)),
            debt_type: DebtType::Receivable,
            principal: invoice.totals.grand_total,
            created_on: Some(invoice.issue_date),
            due_date: Some(due_date),
            note: Some(format!("Debt from invoice {}", invoice.code)),
            counterparty: Some(Counterparty::Customer(invoice.customer_id)),
            invoice_id: Some(invoice.id),
            created_by: input.issued_by,
        })
    }

    /// Resolves the payment recorded against an issued invoice.
    ///
    /// The amount defaults to the grand total and the note to a reference
    /// to the invoice code.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPaymentAmount` if the amount is not positive.
    pub fn payment_input(
        invoice: &Invoice,
        input: PayInvoiceInput,
    ) -> Result<PaymentInput, InvoiceError> {
        let amount = input.amount.unwrap_or(invoice.totals.grand_total);
        if !is_positive(amount) {
            return Err(InvoiceError::InvalidPaymentAmount(amount));
        }

        Ok(PaymentInput {
            amount,
            method: input.method,
            paid_on: input.paid_on,
            note: Some(
                input
                    .note
                    .unwrap_or_else(|| format!("Payment for invoice {}", invoice.code)),
            ),
            recorded_by: input.paid_by,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PaymentMethod;
    use crate::debt::DebtService;
    use crate::invoice::types::InvoiceKind;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use soquy_shared::types::{CustomerId, UserId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(name: &str, quantity: Decimal, unit_price: Decimal) -> LineItemInput {
        LineItemInput {
            product_name: name.into(),
            unit: None,
            quantity,
            unit_price,
        }
    }

    fn create_input() -> CreateInvoiceInput {
        CreateInvoiceInput {
            code: None,
            issue_date: Some(date(2024, 6, 1)),
            kind: InvoiceKind::Sale,
            customer_id: CustomerId::new(),
            line_items: vec![
                item("Áo thun", dec!(2), dec!(100000)),
                item("Nón", dec!(1), dec!(50000)),
            ],
            tax_amount: dec!(0),
            discount_percent: dec!(0),
            note: None,
            created_by: UserId::new(),
        }
    }

    fn draft() -> Invoice {
        InvoiceService::create(create_input(), "HD202406000123".into(), date(2024, 6, 1), Utc::now())
            .unwrap()
    }

    #[test]
    fn test_create_computes_totals() {
        let invoice = draft();
        assert_eq!(invoice.status, InvoiceStatus::Draft);
        assert_eq!(invoice.totals.subtotal, dec!(250000));
        assert_eq!(invoice.totals.grand_total, dec!(250000));
        assert!(invoice.debt_id.is_none());
    }

    #[test]
    fn test_create_defaults_issue_date() {
        let mut input = create_input();
        input.issue_date = None;
        let invoice =
            InvoiceService::create(input, "HD1".into(), date(2024, 6, 9), Utc::now()).unwrap();
        assert_eq!(invoice.issue_date, date(2024, 6, 9));
    }

    #[rstest]
    #[case(InvoiceStatus::Draft, InvoiceStatus::Issued, true)]
    #[case(InvoiceStatus::Draft, InvoiceStatus::Cancelled, true)]
    #[case(InvoiceStatus::Issued, InvoiceStatus::Paid, true)]
    #[case(InvoiceStatus::Issued, InvoiceStatus::Cancelled, true)]
    #[case(InvoiceStatus::Draft, InvoiceStatus::Paid, false)]
    #[case(InvoiceStatus::Issued, InvoiceStatus::Issued, false)]
    #[case(InvoiceStatus::Paid, InvoiceStatus::Cancelled, false)]
    #[case(InvoiceStatus::Paid, InvoiceStatus::Draft, false)]
    #[case(InvoiceStatus::Cancelled, InvoiceStatus::Issued, false)]
    #[case(InvoiceStatus::Cancelled, InvoiceStatus::Cancelled, false)]
    fn test_transitions(
        #[case] from: InvoiceStatus,
        #[case] to: InvoiceStatus,
        #[case] valid: bool,
    ) {
        assert_eq!(InvoiceService::is_valid_transition(from, to), valid);
        assert_eq!(InvoiceService::transition(from, to).is_ok(), valid);
    }

    #[test]
    fn test_update_recomputes_totals() {
        let mut invoice = draft();
        let input = UpdateInvoiceInput {
            discount_percent: Some(dec!(10)),
            ..UpdateInvoiceInput::default()
        };
        InvoiceService::apply_update(&mut invoice, input, Utc::now()).unwrap();
        assert_eq!(invoice.totals.discount_amount, dec!(25000));
        assert_eq!(invoice.totals.grand_total, dec!(225000));
        assert_eq!(invoice.line_items.len(), 2);
    }

    #[test]
    fn test_update_replaces_line_items() {
        let mut invoice = draft();
        let input = UpdateInvoiceInput {
            line_items: Some(vec![item("Bàn", dec!(1), dec!(900000))]),
            note: Some(Some("giao tận nơi".into())),
            ..UpdateInvoiceInput::default()
        };
        InvoiceService::apply_update(&mut invoice, input, Utc::now()).unwrap();
        assert_eq!(invoice.totals.grand_total, dec!(900000));
        assert_eq!(invoice.note.as_deref(), Some("giao tận nơi"));
    }

    #[test]
    fn test_update_rejected_after_issue() {
        let mut invoice = draft();
        invoice.status = InvoiceStatus::Issued;
        let err = InvoiceService::apply_update(&mut invoice, UpdateInvoiceInput::default(), Utc::now())
            .unwrap_err();
        assert_eq!(err, InvoiceError::NotEditable(InvoiceStatus::Issued));
    }

    #[test]
    fn test_failed_update_leaves_invoice_untouched() {
        let mut invoice = draft();
        let snapshot = invoice.clone();
        let input = UpdateInvoiceInput {
            line_items: Some(vec![item("X", dec!(-1), dec!(1))]),
            note: Some(None),
            ..UpdateInvoiceInput::default()
        };
        assert!(InvoiceService::apply_update(&mut invoice, input, Utc::now()).is_err());
        assert_eq!(invoice, snapshot);
    }

    #[rstest]
    #[case(InvoiceStatus::Draft, true)]
    #[case(InvoiceStatus::Cancelled, true)]
    #[case(InvoiceStatus::Issued, false)]
    #[case(InvoiceStatus::Paid, false)]
    fn test_delete_rules(#[case] status: InvoiceStatus, #[case] allowed: bool) {
        let mut invoice = draft();
        invoice.status = status;
        assert_eq!(
            InvoiceService::validate_can_delete(&invoice, None).is_ok(),
            allowed
        );
    }

    #[test]
    fn test_delete_refused_once_linked_debt_has_payments() {
        let mut invoice = draft();
        let issue = IssueInvoiceInput {
            due_date: None,
            issued_by: UserId::new(),
        };
        let input = InvoiceService::debt_input(&invoice, &issue, 30).unwrap();
        let mut debt =
            DebtService::create(input, "PT202406000123".into(), date(2024, 6, 1), Utc::now())
                .unwrap();
        invoice.status = InvoiceStatus::Cancelled;
        assert!(InvoiceService::validate_can_delete(&invoice, Some(&debt)).is_ok());

        let pay = PayInvoiceInput {
            amount: Some(dec!(100000)),
            method: PaymentMethod::Cash,
            paid_on: None,
            note: None,
            paid_by: UserId::new(),
        };
        let payment = InvoiceService::payment_input(&invoice, pay).unwrap();
        DebtService::apply_payment(&mut debt, payment, date(2024, 6, 2), Utc::now()).unwrap();

        assert_eq!(
            InvoiceService::validate_can_delete(&invoice, Some(&debt)),
            Err(InvoiceError::HasPayments(dec!(100000)))
        );
    }

    #[test]
    fn test_debt_input_defaults_due_date() {
        let invoice = draft();
        let issue = IssueInvoiceInput {
            due_date: None,
            issued_by: UserId::new(),
        };
        let debt = InvoiceService::debt_input(&invoice, &issue, 30).unwrap();

        assert_eq!(debt.code.as_deref(), Some("PT202406000123"));
        assert_eq!(debt.debt_type, DebtType::Receivable);
        assert_eq!(debt.principal, dec!(250000));
        assert_eq!(debt.created_on, Some(date(2024, 6, 1)));
        assert_eq!(debt.due_date, Some(date(2024, 7, 1)));
        assert_eq!(debt.counterparty, Some(Counterparty::Customer(invoice.customer_id)));
        assert_eq!(debt.invoice_id, Some(invoice.id));
        assert_eq!(debt.created_by, issue.issued_by);
    }

    #[test]
    fn test_debt_input_keeps_supplied_due_date() {
        let invoice = draft();
        let issue = IssueInvoiceInput {
            due_date: Some(date(2024, 6, 15)),
            issued_by: UserId::new(),
        };
        let debt = InvoiceService::debt_input(&invoice, &issue, 30).unwrap();
        assert_eq!(debt.due_date, Some(date(2024, 6, 15)));
    }

    #[test]
    fn test_payment_input_defaults() {
        let invoice = draft();
        let pay = PayInvoiceInput {
            amount: None,
            method: PaymentMethod::default(),
            paid_on: None,
            note: None,
            paid_by: UserId::new(),
        };
        let payment = InvoiceService::payment_input(&invoice, pay).unwrap();
        assert_eq!(payment.amount, dec!(250000));
        assert_eq!(payment.method, PaymentMethod::Cash);
        assert_eq!(payment.note.as_deref(), Some("Payment for invoice HD202406000123"));
    }

    #[test]
    fn test_payment_input_rejects_zero() {
        let invoice = draft();
        let pay = PayInvoiceInput {
            amount: Some(dec!(0)),
            method: PaymentMethod::Cash,
            paid_on: None,
            note: None,
            paid_by: UserId::new(),
        };
        assert_eq!(
            InvoiceService::payment_input(&invoice, pay).unwrap_err(),
            InvoiceError::InvalidPaymentAmount(dec!(0))
        );
    }
}
