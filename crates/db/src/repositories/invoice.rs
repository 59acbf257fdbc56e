//! Invoice engine repository.
//!
//! Issue, pay and cancel touch the invoice, its receivable debt and the
//! cash book. Each of them runs in one storage transaction, so a failure
//! at any step leaves every record as it was.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use soquy_core::cash_flow::{CashFlowEntry, CashFlowService};
use soquy_core::code::INVOICE_PREFIX;
use soquy_core::debt::{Debt, DebtService};
use soquy_core::invoice::{
    CreateInvoiceInput, Invoice, InvoiceError, InvoiceKind, InvoiceService, InvoiceStatus,
    IssueInvoiceInput, PayInvoiceInput, UpdateInvoiceInput,
};
use soquy_shared::LedgerConfig;
use soquy_shared::types::date::today;
use soquy_shared::types::{CustomerId, InvoiceId, PageRequest, PageResponse};

use super::cash_flow::record_in;
use super::debt::{create_in, record_payment_in};
use super::resolve_code;
use crate::store::{Patch, Query, Store, StoreError, StoreTx};

/// Filter for listing invoices.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    /// Filter by status.
    pub status: Option<InvoiceStatus>,
    /// Filter by kind.
    pub kind: Option<InvoiceKind>,
    /// Filter by customer.
    pub customer_id: Option<CustomerId>,
    /// Issued on or after this date.
    pub issued_from: Option<NaiveDate>,
    /// Issued on or before this date.
    pub issued_to: Option<NaiveDate>,
}

impl InvoiceFilter {
    fn to_query(&self, page: PageRequest) -> Result<Query, StoreError> {
        Ok(Query::new()
            .eq_opt("status", self.status)?
            .eq_opt("kind", self.kind)?
            .eq_opt("customer_id", self.customer_id)?
            .gte_opt("issue_date", self.issued_from)?
            .lte_opt("issue_date", self.issued_to)?
            .sort_desc("created_at")
            .page(page))
    }
}

/// Result of issuing an invoice.
#[derive(Debug, Clone)]
pub struct IssuedInvoice {
    /// The invoice, now issued and linked to the debt.
    pub invoice: Invoice,
    /// The receivable created for it.
    pub debt: Debt,
}

/// Result of paying an invoice.
#[derive(Debug, Clone)]
pub struct PaidInvoice {
    /// The invoice, now paid.
    pub invoice: Invoice,
    /// The sales receipt recorded for the payment.
    pub cash_flow: CashFlowEntry,
    /// The linked debt with the payment mirrored into its history.
    pub debt: Option<Debt>,
}

/// Result of cancelling an invoice.
#[derive(Debug, Clone)]
pub struct CancelledInvoice {
    /// The invoice, now cancelled.
    pub invoice: Invoice,
    /// The linked debt, now closed.
    pub debt: Option<Debt>,
}

/// Invoice engine repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository<S> {
    store: S,
    config: LedgerConfig,
}

impl<S: Store> InvoiceRepository<S> {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(store: S, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// Creates a draft invoice with computed totals.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A line item, the tax or the discount is invalid
    /// - The supplied or every generated code is already in use
    /// - Storage fails
    pub async fn create(&self, input: CreateInvoiceInput) -> Result<Invoice, InvoiceError> {
        let now = Utc::now();
        let mut tx = self.store.begin().await?;

        let code = resolve_code::<Invoice, _>(
            &mut tx,
            input.code.clone(),
            INVOICE_PREFIX,
            now,
            self.config.code_generation_attempts,
        )
        .await?;

        let invoice = InvoiceService::create(input, code, today(), now)?;
        tx.insert(&invoice).await?;
        tx.commit().await?;

        info!(
            invoice_id = %invoice.id,
            code = %invoice.code,
            grand_total = %invoice.totals.grand_total,
            "Invoice created"
        );
        Ok(invoice)
    }

    /// Fetches an invoice.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the invoice does not exist.
    pub async fn get(&self, id: InvoiceId) -> Result<Invoice, InvoiceError> {
        let mut tx = self.store.begin().await?;
        load(&mut tx, id).await
    }

    /// Lists invoices, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub async fn list(
        &self,
        filter: &InvoiceFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Invoice>, InvoiceError> {
        let query = filter.to_query(page)?;
        let mut tx = self.store.begin().await?;
        Ok(tx.find::<Invoice>(&query).await?)
    }

    /// Edits a draft invoice and recomputes its totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice does not exist, is not a draft, or
    /// the new contents are invalid.
    pub async fn update(
        &self,
        id: InvoiceId,
        input: UpdateInvoiceInput,
    ) -> Result<Invoice, InvoiceError> {
        let mut tx = self.store.begin().await?;
        let mut invoice = load(&mut tx, id).await?;

        if let Err(e) = InvoiceService::apply_update(&mut invoice, input, Utc::now()) {
            warn!(invoice_id = %id, status = %invoice.status, error = %e, "Invoice update rejected");
            return Err(e);
        }

        tx.replace(&invoice).await?;
        tx.commit().await?;

        info!(
            invoice_id = %id,
            grand_total = %invoice.totals.grand_total,
            "Invoice updated"
        );
        Ok(invoice)
    }

    /// Issues a draft invoice and creates its receivable debt.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The invoice does not exist or is not a draft
    /// - The debt cannot be created (zero total, code clash)
    /// - Storage fails
    pub async fn issue(
        &self,
        id: InvoiceId,
        input: IssueInvoiceInput,
    ) -> Result<IssuedInvoice, InvoiceError> {
        let now = Utc::now();
        let mut tx = self.store.begin().await?;
        let invoice = load(&mut tx, id).await?;

        let status = transition(&invoice, InvoiceStatus::Issued)?;
        let debt_input =
            InvoiceService::debt_input(&invoice, &input, self.config.default_due_days)?;

        let debt = create_in(
            &mut tx,
            debt_input,
            today(),
            now,
            self.config.code_generation_attempts,
        )
        .await?;

        let patch = Patch::new()
            .set("status", status)?
            .set("debt_id", debt.id)?
            .set("updated_at", now)?;
        let invoice = tx.update::<Invoice>(&id, patch).await?;
        tx.commit().await?;

        info!(
            invoice_id = %id,
            code = %invoice.code,
            debt_id = %debt.id,
            debt_code = %debt.code,
            principal = %debt.principal,
            due_date = %debt.due_date,
            "Invoice issued"
        );
        Ok(IssuedInvoice { invoice, debt })
    }

    /// Records a payment against an issued invoice.
    ///
    /// Writes one sales receipt and, when a debt is linked, mirrors the
    /// payment into the debt's history without a second cash entry. The
    /// invoice becomes paid on any successful payment, even a partial one.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The invoice does not exist or is not issued
    /// - The amount is not positive or exceeds the debt's remaining balance
    /// - The linked debt is missing
    pub async fn pay(
        &self,
        id: InvoiceId,
        input: PayInvoiceInput,
    ) -> Result<PaidInvoice, InvoiceError> {
        let now = Utc::now();
        let today = today();
        let mut tx = self.store.begin().await?;
        let invoice = load(&mut tx, id).await?;

        let status = transition(&invoice, InvoiceStatus::Paid)?;
        let payment_input = InvoiceService::payment_input(&invoice, input)?;

        let (debt, payment) = match invoice.debt_id {
            Some(debt_id) => {
                let (debt, payment) =
                    record_payment_in(&mut tx, debt_id, payment_input, today, now).await?;
                (Some(debt), payment)
            }
            None => (None, payment_input.into_record(today)),
        };

        let cash_flow = record_in(
            &mut tx,
            CashFlowService::for_invoice_payment(&invoice, &payment),
            now,
        )
        .await?;

        let patch = Patch::new()
            .set("status", status)?
            .set("updated_at", now)?;
        let invoice = tx.update::<Invoice>(&id, patch).await?;
        tx.commit().await?;

        if let Some(debt) = &debt
            && debt.amount_remaining() > Decimal::ZERO
        {
            warn!(
                invoice_id = %id,
                debt_id = %debt.id,
                remaining = %debt.amount_remaining(),
                "Invoice marked paid while its debt is only partially paid"
            );
        }
        info!(
            invoice_id = %id,
            code = %invoice.code,
            amount = %payment.amount,
            "Invoice paid"
        );
        Ok(PaidInvoice {
            invoice,
            cash_flow,
            debt,
        })
    }

    /// Cancels a draft or issued invoice.
    ///
    /// A linked debt is closed as paid rather than deleted; its payment
    /// history is left as it is.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice does not exist, is already paid or
    /// cancelled, or its linked debt is missing.
    pub async fn cancel(&self, id: InvoiceId) -> Result<CancelledInvoice, InvoiceError> {
        let now = Utc::now();
        let mut tx = self.store.begin().await?;
        let invoice = load(&mut tx, id).await?;

        let status = transition(&invoice, InvoiceStatus::Cancelled)?;

        let debt = match invoice.debt_id {
            Some(debt_id) => {
                let mut debt = super::debt::load(&mut tx, debt_id).await?;
                DebtService::settle(&mut debt, now);
                tx.replace(&debt).await?;
                Some(debt)
            }
            None => None,
        };

        let patch = Patch::new()
            .set("status", status)?
            .set("updated_at", now)?;
        let invoice = tx.update::<Invoice>(&id, patch).await?;
        tx.commit().await?;

        info!(
            invoice_id = %id,
            code = %invoice.code,
            debt_closed = debt.is_some(),
            "Invoice cancelled"
        );
        Ok(CancelledInvoice { invoice, debt })
    }

    /// Deletes a draft or cancelled invoice together with its linked debt.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The invoice is neither a draft nor cancelled (`NotDeletable`)
    /// - The linked debt has recorded payments (`HasPayments`)
    pub async fn delete(&self, id: InvoiceId) -> Result<(), InvoiceError> {
        let mut tx = self.store.begin().await?;
        let invoice = load(&mut tx, id).await?;

        let debt = match invoice.debt_id {
            Some(debt_id) => {
                let debt = tx.get::<Debt>(&debt_id).await?;
                if debt.is_none() {
                    warn!(invoice_id = %id, debt_id = %debt_id, "Linked debt already gone");
                }
                debt
            }
            None => None,
        };

        if let Err(e) = InvoiceService::validate_can_delete(&invoice, debt.as_ref()) {
            warn!(invoice_id = %id, status = %invoice.status, error = %e, "Invoice delete rejected");
            return Err(e);
        }

        if let Some(debt) = &debt {
            tx.delete::<Debt>(&debt.id).await?;
        }
        tx.delete::<Invoice>(&id).await?;
        tx.commit().await?;

        info!(invoice_id = %id, code = %invoice.code, "Invoice deleted");
        Ok(())
    }
}

/// Marks an issued invoice paid inside an open transaction.
///
/// Returns the updated invoice, or `None` when the invoice is missing or
/// its status does not allow the move.
pub(crate) async fn mark_paid_in<T: StoreTx>(
    tx: &mut T,
    id: InvoiceId,
    now: DateTime<Utc>,
) -> Result<Option<Invoice>, StoreError> {
    let Some(invoice) = tx.get::<Invoice>(&id).await? else {
        warn!(invoice_id = %id, "Linked invoice not found");
        return Ok(None);
    };
    if !InvoiceService::is_valid_transition(invoice.status, InvoiceStatus::Paid) {
        return Ok(None);
    }

    let patch = Patch::new()
        .set("status", InvoiceStatus::Paid)?
        .set("updated_at", now)?;
    tx.update::<Invoice>(&id, patch).await.map(Some)
}

async fn load<T: StoreTx>(tx: &mut T, id: InvoiceId) -> Result<Invoice, InvoiceError> {
    tx.get::<Invoice>(&id)
        .await?
        .ok_or(InvoiceError::NotFound(id))
}

fn transition(invoice: &Invoice, to: InvoiceStatus) -> Result<InvoiceStatus, InvoiceError> {
    InvoiceService::transition(invoice.status, to).inspect_err(|e| {
        warn!(
            invoice_id = %invoice.id,
            code = %invoice.code,
            error = %e,
            "Invoice transition rejected"
        );
    })
}
