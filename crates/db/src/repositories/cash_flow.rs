//! Cash flow repository.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use soquy_core::cash_flow::{
    CashFlowEntry, CashFlowError, CashFlowService, Disbursement, DisbursementCategory,
    NewCashFlow, Receipt, ReceiptCategory,
};
use soquy_shared::types::{
    CustomerId, DisbursementId, InvoiceId, PageRequest, PageResponse, ReceiptId, SupplierId,
};

use crate::store::{Query, Store, StoreError, StoreTx};

/// Filter for listing receipts.
#[derive(Debug, Clone, Default)]
pub struct ReceiptFilter {
    /// Filter by category.
    pub category: Option<ReceiptCategory>,
    /// Filter by paying customer.
    pub customer_id: Option<CustomerId>,
    /// Filter by originating invoice.
    pub invoice_id: Option<InvoiceId>,
    /// On or after this date.
    pub date_from: Option<NaiveDate>,
    /// On or before this date.
    pub date_to: Option<NaiveDate>,
}

impl ReceiptFilter {
    fn to_query(&self, page: PageRequest) -> Result<Query, StoreError> {
        Ok(Query::new()
            .eq_opt("category", self.category)?
            .eq_opt("customer_id", self.customer_id)?
            .eq_opt("invoice_id", self.invoice_id)?
            .gte_opt("date", self.date_from)?
            .lte_opt("date", self.date_to)?
            .sort_desc("date")
            .page(page))
    }
}

/// Filter for listing disbursements.
#[derive(Debug, Clone, Default)]
pub struct DisbursementFilter {
    /// Filter by category.
    pub category: Option<DisbursementCategory>,
    /// Filter by receiving supplier.
    pub supplier_id: Option<SupplierId>,
    /// On or after this date.
    pub date_from: Option<NaiveDate>,
    /// On or before this date.
    pub date_to: Option<NaiveDate>,
}

impl DisbursementFilter {
    fn to_query(&self, page: PageRequest) -> Result<Query, StoreError> {
        Ok(Query::new()
            .eq_opt("category", self.category)?
            .eq_opt("supplier_id", self.supplier_id)?
            .gte_opt("date", self.date_from)?
            .lte_opt("date", self.date_to)?
            .sort_desc("date")
            .page(page))
    }
}

/// Cash flow repository.
#[derive(Debug, Clone)]
pub struct CashFlowRepository<S> {
    store: S,
}

impl<S: Store> CashFlowRepository<S> {
    /// Creates a new cash flow repository.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Records a receipt or disbursement.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not positive, the description is
    /// blank, or storage fails.
    pub async fn record(&self, new: NewCashFlow) -> Result<CashFlowEntry, CashFlowError> {
        let mut tx = self.store.begin().await?;
        let entry = record_in(&mut tx, new, Utc::now()).await?;
        tx.commit().await?;

        info!(
            kind = %entry.kind(),
            amount = %entry.amount(),
            date = %entry.date(),
            "Cash flow recorded"
        );
        Ok(entry)
    }

    /// Fetches a receipt.
    ///
    /// # Errors
    ///
    /// Returns `ReceiptNotFound` if the receipt does not exist.
    pub async fn get_receipt(&self, id: ReceiptId) -> Result<Receipt, CashFlowError> {
        let mut tx = self.store.begin().await?;
        tx.get::<Receipt>(&id)
            .await?
            .ok_or(CashFlowError::ReceiptNotFound(id))
    }

    /// Fetches a disbursement.
    ///
    /// # Errors
    ///
    /// Returns `DisbursementNotFound` if the disbursement does not exist.
    pub async fn get_disbursement(
        &self,
        id: DisbursementId,
    ) -> Result<Disbursement, CashFlowError> {
        let mut tx = self.store.begin().await?;
        tx.get::<Disbursement>(&id)
            .await?
            .ok_or(CashFlowError::DisbursementNotFound(id))
    }

    /// Lists receipts, most recent date first.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub async fn list_receipts(
        &self,
        filter: &ReceiptFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Receipt>, CashFlowError> {
        let query = filter.to_query(page)?;
        let mut tx = self.store.begin().await?;
        Ok(tx.find::<Receipt>(&query).await?)
    }

    /// Lists disbursements, most recent date first.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub async fn list_disbursements(
        &self,
        filter: &DisbursementFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Disbursement>, CashFlowError> {
        let query = filter.to_query(page)?;
        let mut tx = self.store.begin().await?;
        Ok(tx.find::<Disbursement>(&query).await?)
    }
}

/// Validates and stores a cash movement inside an open transaction.
pub(crate) async fn record_in<T: StoreTx>(
    tx: &mut T,
    new: NewCashFlow,
    now: DateTime<Utc>,
) -> Result<CashFlowEntry, CashFlowError> {
    let entry = CashFlowService::build(new, now)?;
    match &entry {
        CashFlowEntry::Receipt(receipt) => tx.insert(receipt).await?,
        CashFlowEntry::Disbursement(disbursement) => tx.insert(disbursement).await?,
    }
    Ok(entry)
}
