//! Debt ledger repository.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

use soquy_core::cash_flow::{CashFlowEntry, CashFlowService};
use soquy_core::debt::{
    CreateDebtInput, Debt, DebtError, DebtService, DebtStatus, DebtType, PaymentInput,
    PaymentRecord, UpdateDebtInput,
};
use soquy_core::invoice::Invoice;
use soquy_shared::LedgerConfig;
use soquy_shared::types::date::today;
use soquy_shared::types::{CustomerId, DebtId, PageRequest, PageResponse, SupplierId};

use super::cash_flow::record_in;
use super::invoice::mark_paid_in;
use super::resolve_code;
use crate::store::{Query, Store, StoreError, StoreTx};

/// Filter for listing debts.
#[derive(Debug, Clone, Default)]
pub struct DebtFilter {
    /// Filter by debt type.
    pub debt_type: Option<DebtType>,
    /// Filter by status.
    pub status: Option<DebtStatus>,
    /// Filter by customer.
    pub customer_id: Option<CustomerId>,
    /// Filter by supplier.
    pub supplier_id: Option<SupplierId>,
    /// Created on or after this date.
    pub created_from: Option<NaiveDate>,
    /// Created on or before this date.
    pub created_to: Option<NaiveDate>,
}

impl DebtFilter {
    fn to_query(&self, page: PageRequest) -> Result<Query, StoreError> {
        let mut query = Query::new()
            .eq_opt("debt_type", self.debt_type)?
            .eq_opt("status", self.status)?
            .gte_opt("created_on", self.created_from)?
            .lte_opt("created_on", self.created_to)?;

        if let Some(customer_id) = self.customer_id {
            query = query
                .eq("counterparty.kind", "customer")?
                .eq("counterparty.id", customer_id)?;
        }
        if let Some(supplier_id) = self.supplier_id {
            query = query
                .eq("counterparty.kind", "supplier")?
                .eq("counterparty.id", supplier_id)?;
        }

        Ok(query.sort_desc("created_at").page(page))
    }
}

/// Result of recording a debt payment.
#[derive(Debug, Clone)]
pub struct DebtPaymentResult {
    /// The debt with the new payment appended.
    pub debt: Debt,
    /// The appended history entry.
    pub payment: PaymentRecord,
    /// The mirrored receipt or disbursement.
    pub cash_flow: CashFlowEntry,
    /// The originating invoice, when this payment moved it to paid.
    pub invoice: Option<Invoice>,
}

/// Debt ledger repository.
#[derive(Debug, Clone)]
pub struct DebtRepository<S> {
    store: S,
    config: LedgerConfig,
}

impl<S: Store> DebtRepository<S> {
    /// Creates a new debt repository.
    #[must_use]
    pub const fn new(store: S, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// Creates a debt, generating a code when none is supplied.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The principal, due date or counterparty is invalid
    /// - The supplied or every generated code is already in use
    /// - Storage fails
    pub async fn create(&self, input: CreateDebtInput) -> Result<Debt, DebtError> {
        DebtService::validate_create(&input)?;

        let mut tx = self.store.begin().await?;
        let debt = create_in(
            &mut tx,
            input,
            today(),
            Utc::now(),
            self.config.code_generation_attempts,
        )
        .await?;
        tx.commit().await?;

        info!(
            debt_id = %debt.id,
            code = %debt.code,
            debt_type = %debt.debt_type,
            principal = %debt.principal,
            status = %debt.status,
            "Debt created"
        );
        Ok(debt)
    }

    /// Fetches a debt.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the debt does not exist.
    pub async fn get(&self, id: DebtId) -> Result<Debt, DebtError> {
        let mut tx = self.store.begin().await?;
        load(&mut tx, id).await
    }

    /// Lists debts, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub async fn list(
        &self,
        filter: &DebtFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Debt>, DebtError> {
        let query = filter.to_query(page)?;
        let mut tx = self.store.begin().await?;
        Ok(tx.find::<Debt>(&query).await?)
    }

    /// Edits principal, due date or note and re-derives the status.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The debt does not exist
    /// - A different debt type is requested
    /// - The debt is already paid
    /// - The new principal is not positive or is below the amount paid
    pub async fn update(&self, id: DebtId, input: UpdateDebtInput) -> Result<Debt, DebtError> {
        let mut tx = self.store.begin().await?;
        let mut debt = load(&mut tx, id).await?;

        if let Err(e) = DebtService::apply_update(&mut debt, input, today(), Utc::now()) {
            warn!(debt_id = %id, error = %e, "Debt update rejected");
            return Err(e);
        }

        tx.replace(&debt).await?;
        tx.commit().await?;

        info!(debt_id = %id, status = %debt.status, "Debt updated");
        Ok(debt)
    }

    /// Records a payment and the matching cash movement.
    ///
    /// Receivables produce a receipt, payables a disbursement. When the debt
    /// came from an issued invoice, that invoice is marked paid as well. All
    /// writes commit together or not at all.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The debt does not exist
    /// - The amount is not positive or exceeds the remaining balance
    /// - The debt was closed without being paid off
    pub async fn record_payment(
        &self,
        id: DebtId,
        input: PaymentInput,
    ) -> Result<DebtPaymentResult, DebtError> {
        let now = Utc::now();
        let mut tx = self.store.begin().await?;

        let (debt, payment) = record_payment_in(&mut tx, id, input, today(), now).await?;
        let cash_flow = record_in(&mut tx, CashFlowService::for_debt_payment(&debt, &payment), now)
            .await?;
        let invoice = match debt.invoice_id {
            Some(invoice_id) => mark_paid_in(&mut tx, invoice_id, now).await?,
            None => None,
        };
        tx.commit().await?;

        if let Some(invoice) = &invoice {
            info!(invoice_id = %invoice.id, code = %invoice.code, "Invoice paid through its debt");
        }
        info!(
            debt_id = %id,
            code = %debt.code,
            amount = %payment.amount,
            remaining = %debt.amount_remaining(),
            status = %debt.status,
            cash_flow = %cash_flow.kind(),
            "Debt payment recorded"
        );
        Ok(DebtPaymentResult {
            debt,
            payment,
            cash_flow,
            invoice,
        })
    }

    /// Re-derives and persists the status without adding a payment.
    ///
    /// Calling it again without intervening changes is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the debt does not exist.
    pub async fn recompute(&self, id: DebtId) -> Result<Debt, DebtError> {
        let mut tx = self.store.begin().await?;
        let mut debt = load(&mut tx, id).await?;

        if DebtService::refresh_status(&mut debt, today(), Utc::now()) {
            tx.replace(&debt).await?;
            tx.commit().await?;
            info!(debt_id = %id, status = %debt.status, "Debt status recomputed");
        }

        Ok(debt)
    }

    /// Deletes a standalone debt.
    ///
    /// # Errors
    ///
    /// Returns `LinkedToInvoice` if the debt originates from an invoice.
    pub async fn delete(&self, id: DebtId) -> Result<(), DebtError> {
        let mut tx = self.store.begin().await?;
        let debt = load(&mut tx, id).await?;

        if let Err(e) = DebtService::validate_can_delete(&debt) {
            warn!(debt_id = %id, error = %e, "Debt delete rejected");
            return Err(e);
        }

        tx.delete::<Debt>(&id).await?;
        tx.commit().await?;

        info!(debt_id = %id, code = %debt.code, "Debt deleted");
        Ok(())
    }
}

/// Loads a debt inside an open transaction.
pub(crate) async fn load<T: StoreTx>(tx: &mut T, id: DebtId) -> Result<Debt, DebtError> {
    tx.get::<Debt>(&id).await?.ok_or(DebtError::NotFound(id))
}

/// Creates a debt inside an open transaction.
pub(crate) async fn create_in<T: StoreTx>(
    tx: &mut T,
    input: CreateDebtInput,
    today: NaiveDate,
    now: DateTime<Utc>,
    attempts: u32,
) -> Result<Debt, DebtError> {
    DebtService::validate_create(&input)?;

    let code = resolve_code::<Debt, T>(
        tx,
        input.code.clone(),
        input.debt_type.code_prefix(),
        now,
        attempts,
    )
    .await?;

    let debt = DebtService::create(input, code, today, now)?;
    tx.insert(&debt).await?;
    Ok(debt)
}

/// Appends a payment to a debt inside an open transaction.
///
/// Emits no cash movement; callers record the one that fits their context.
pub(crate) async fn record_payment_in<T: StoreTx>(
    tx: &mut T,
    id: DebtId,
    input: PaymentInput,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<(Debt, PaymentRecord), DebtError> {
    let mut debt = load(tx, id).await?;

    let payment = match DebtService::apply_payment(&mut debt, input, today, now) {
        Ok(payment) => payment,
        Err(e) => {
            warn!(debt_id = %id, code = %debt.code, error = %e, "Debt payment rejected");
            return Err(e);
        }
    };

    tx.replace(&debt).await?;
    Ok((debt, payment))
}
