//! Cash flow service.

use chrono::{DateTime, Utc};
use soquy_shared::types::money::is_positive;
use soquy_shared::types::{DisbursementId, ReceiptId};

use super::error::CashFlowError;
use super::types::{
    CashFlowDetails, CashFlowEntry, Disbursement, DisbursementCategory, NewCashFlow, Receipt,
    ReceiptCategory,
};
use crate::common::Counterparty;
use crate::debt::{Debt, PaymentRecord};
use crate::invoice::Invoice;

/// Stateless service for building cash-flow entries.
pub struct CashFlowService;

impl CashFlowService {
    /// Validates a new movement and turns it into a recorded entry.
    ///
    /// # Errors
    ///
    /// * `InvalidAmount` if the amount is not positive
    /// * `EmptyDescription` if the description is blank
    pub fn build(new: NewCashFlow, now: DateTime<Utc>) -> Result<CashFlowEntry, CashFlowError> {
        let details = new.details();
        if !is_positive(details.amount) {
            return Err(CashFlowError::InvalidAmount(details.amount));
        }
        if details.description.trim().is_empty() {
            return Err(CashFlowError::EmptyDescription);
        }

        let entry = match new {
            NewCashFlow::Receipt {
                category,
                customer_id,
                details,
            } => CashFlowEntry::Receipt(Receipt {
                id: ReceiptId::new(),
                date: details.date,
                amount: details.amount,
                category,
                description: details.description.trim().to_string(),
                counterparty_name: details.counterparty_name,
                method: details.method,
                note: details.note,
                customer_id,
                invoice_id: details.invoice_id,
                created_by: details.created_by,
                created_at: now,
                updated_at: now,
            }),
            NewCashFlow::Disbursement {
                category,
                supplier_id,
                details,
            } => CashFlowEntry::Disbursement(Disbursement {
                id: DisbursementId::new(),
                date: details.date,
                amount: details.amount,
                category,
                description: details.description.trim().to_string(),
                counterparty_name: details.counterparty_name,
                method: details.method,
                note: details.note,
                supplier_id,
                invoice_id: details.invoice_id,
                created_by: details.created_by,
                created_at: now,
                updated_at: now,
            }),
        };

        Ok(entry)
    }

    /// Mirrors a debt payment as a cash movement.
    ///
    /// Receivables produce a debt-collection receipt, payables a
    /// disbursement. Amount, date, method and note are copied from the
    /// payment.
    #[must_use]
    pub fn for_debt_payment(debt: &Debt, payment: &PaymentRecord) -> NewCashFlow {
        let details = CashFlowDetails {
            date: payment.paid_on,
            amount: payment.amount,
            method: payment.method,
            description: format!("Payment for debt {}", debt.code),
            counterparty_name: debt.counterparty.display_name().to_string(),
            note: payment.note.clone(),
            invoice_id: debt.invoice_id,
            created_by: payment.recorded_by,
        };

        match debt.counterparty {
            Counterparty::Customer(customer_id) => NewCashFlow::Receipt {
                category: ReceiptCategory::DebtCollection,
                customer_id: Some(customer_id),
                details,
            },
            Counterparty::Supplier(supplier_id) => NewCashFlow::Disbursement {
                category: DisbursementCategory::Other,
                supplier_id: Some(supplier_id),
                details,
            },
        }
    }

    /// Records an invoice payment as a sales-revenue receipt.
    #[must_use]
    pub fn for_invoice_payment(invoice: &Invoice, payment: &PaymentRecord) -> NewCashFlow {
        NewCashFlow::Receipt {
            category: ReceiptCategory::SalesRevenue,
            customer_id: Some(invoice.customer_id),
            details: CashFlowDetails {
                date: payment.paid_on,
                amount: payment.amount,
                method: payment.method,
                description: format!("Payment for invoice {}", invoice.code),
                counterparty_name: String::new(),
                note: payment.note.clone(),
                invoice_id: Some(invoice.id),
                created_by: payment.recorded_by,
            },
        }
    }
}
