//! Debt ledger service.
//!
//! Stateless rules for creating debts, appending payments and keeping the
//! derived status current. Persistence and the cash-flow side effect of a
//! payment are handled by the caller.

use chrono::{DateTime, NaiveDate, Utc};
use soquy_shared::types::DebtId;
use soquy_shared::types::money::is_positive;

use super::error::DebtError;
use super::status::derive_status;
use super::types::{
    CreateDebtInput, Debt, DebtStatus, PaymentInput, PaymentRecord, UpdateDebtInput,
};
use crate::common::Counterparty;

/// Stateless service for debt ledger rules.
pub struct DebtService;

impl DebtService {
    /// Validates creation input and returns the counterparty and due date.
    ///
    /// # Errors
    ///
    /// * `InvalidPrincipal` if the principal is not positive
    /// * `DueDateRequired` if no due date was supplied
    /// * `CounterpartyRequired` / `CounterpartyMismatch` if the counterparty
    ///   does not fit the debt type
    pub fn validate_create(
        input: &CreateDebtInput,
    ) -> Result<(Counterparty, NaiveDate), DebtError> {
        if !is_positive(input.principal) {
            return Err(DebtError::InvalidPrincipal(input.principal));
        }

        let due_date = input.due_date.ok_or(DebtError::DueDateRequired)?;

        let counterparty = input
            .counterparty
            .ok_or(DebtError::CounterpartyRequired {
                debt_type: input.debt_type,
                expected: input.debt_type.counterparty_kind(),
            })?;

        if !input.debt_type.accepts(&counterparty) {
            return Err(DebtError::CounterpartyMismatch {
                debt_type: input.debt_type,
                found: counterparty.kind_str(),
            });
        }

        Ok((counterparty, due_date))
    }

    /// Builds a new debt with its initial status.
    ///
    /// `code` is the final code, either supplied by the client or generated.
    pub fn create(
        input: CreateDebtInput,
        code: String,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Debt, DebtError> {
        let (counterparty, due_date) = Self::validate_create(&input)?;

        let code = code.trim().to_string();
        if code.is_empty() {
            return Err(DebtError::EmptyCode);
        }

        let status = derive_status(input.principal, &[], due_date, today);

        Ok(Debt {
            id: DebtId::new(),
            code,
            debt_type: input.debt_type,
            principal: input.principal,
            created_on: input.created_on.unwrap_or(today),
            due_date,
            note: input.note,
            status,
            counterparty,
            invoice_id: input.invoice_id,
            payments: Vec::new(),
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Appends a payment to the debt and re-derives its status.
    ///
    /// The amount must be positive and no larger than the remaining balance
    /// computed from the history as it is now.
    ///
    /// # Errors
    ///
    /// * `InvalidPaymentAmount` if the amount is not positive
    /// * `PaymentExceedsRemaining` if the amount is above the remaining balance
    /// * `DebtClosed` if the debt was closed without being paid off
    pub fn apply_payment(
        debt: &mut Debt,
        input: PaymentInput,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<PaymentRecord, DebtError> {
        if !is_positive(input.amount) {
            return Err(DebtError::InvalidPaymentAmount(input.amount));
        }

        let remaining = debt.amount_remaining();
        if input.amount > remaining {
            return Err(DebtError::PaymentExceedsRemaining {
                amount: input.amount,
                remaining,
            });
        }

        Self::ensure_open(debt)?;

        let record = input.into_record(today);
        debt.payments.push(record.clone());
        debt.status = derive_status(debt.principal, &debt.payments, debt.due_date, today);
        debt.updated_at = now;

        Ok(record)
    }

    /// Applies an edit and re-derives the status.
    ///
    /// # Errors
    ///
    /// * `DebtTypeChangeNotAllowed` if a different type is requested
    /// * `DebtClosed` if the debt is already paid
    /// * `InvalidPrincipal` / `PrincipalBelowPaid` for an unusable principal
    pub fn apply_update(
        debt: &mut Debt,
        input: UpdateDebtInput,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<(), DebtError> {
        if let Some(requested) = input.debt_type
            && requested != debt.debt_type
        {
            return Err(DebtError::DebtTypeChangeNotAllowed {
                from: debt.debt_type,
                to: requested,
            });
        }

        Self::ensure_open(debt)?;

        if let Some(principal) = input.principal {
            if !is_positive(principal) {
                return Err(DebtError::InvalidPrincipal(principal));
            }
            let paid = debt.amount_paid();
            if principal < paid {
                return Err(DebtError::PrincipalBelowPaid { principal, paid });
            }
            debt.principal = principal;
        }

        if let Some(due_date) = input.due_date {
            debt.due_date = due_date;
        }

        if let Some(note) = input.note {
            debt.note = note;
        }

        debt.status = derive_status(debt.principal, &debt.payments, debt.due_date, today);
        debt.updated_at = now;

        Ok(())
    }

    /// Re-derives the status without other changes.
    ///
    /// A paid debt stays paid. Returns true if the status changed.
    pub fn refresh_status(debt: &mut Debt, today: NaiveDate, now: DateTime<Utc>) -> bool {
        if debt.status == DebtStatus::Paid {
            return false;
        }

        let status = derive_status(debt.principal, &debt.payments, debt.due_date, today);
        if status == debt.status {
            return false;
        }

        debt.status = status;
        debt.updated_at = now;
        true
    }

    /// Closes the debt as paid without recording a payment.
    ///
    /// Used when the originating invoice is cancelled. The payment history
    /// is left untouched, so the remaining balance may stay above zero.
    pub fn settle(debt: &mut Debt, now: DateTime<Utc>) {
        debt.status = DebtStatus::Paid;
        debt.updated_at = now;
    }

    /// Checks that the debt may be deleted on its own.
    ///
    /// # Errors
    ///
    /// Returns `LinkedToInvoice` if the debt originates from an invoice.
    pub fn validate_can_delete(debt: &Debt) -> Result<(), DebtError> {
        if debt.is_invoice_linked() {
            return Err(DebtError::LinkedToInvoice(debt.code.clone()));
        }
        Ok(())
    }

    fn ensure_open(debt: &Debt) -> Result<(), DebtError> {
        if debt.status == DebtStatus::Paid {
            return Err(DebtError::DebtClosed {
                code: debt.code.clone(),
                status: debt.status,
            });
        }
        Ok(())
    }
}
