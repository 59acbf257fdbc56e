//! Cash flow domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use soquy_shared::types::{CustomerId, DisbursementId, InvoiceId, ReceiptId, SupplierId, UserId};
use std::fmt;

use crate::common::PaymentMethod;

/// Direction of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowKind {
    /// Money in (thu).
    Receipt,
    /// Money out (chi).
    Disbursement,
}

impl fmt::Display for CashFlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Receipt => f.write_str("receipt"),
            Self::Disbursement => f.write_str("disbursement"),
        }
    }
}

/// Receipt category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptCategory {
    /// Revenue from selling goods.
    SalesRevenue,
    /// Revenue from services.
    ServiceRevenue,
    /// Collection of a receivable.
    DebtCollection,
    /// Anything else.
    Other,
}

impl ReceiptCategory {
    /// Returns the string representation of the category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SalesRevenue => "sales_revenue",
            Self::ServiceRevenue => "service_revenue",
            Self::DebtCollection => "debt_collection",
            Self::Other => "other",
        }
    }
}

/// Disbursement category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisbursementCategory {
    /// Raw materials.
    Materials,
    /// Labour.
    Labor,
    /// Operating expenses.
    Operations,
    /// Anything else, including supplier debt payments.
    Other,
}

impl DisbursementCategory {
    /// Returns the string representation of the category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Materials => "materials",
            Self::Labor => "labor",
            Self::Operations => "operations",
            Self::Other => "other",
        }
    }
}

/// Fields common to receipts and disbursements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashFlowDetails {
    /// Date of the movement.
    pub date: NaiveDate,
    /// Amount (must be positive).
    pub amount: Decimal,
    /// Payment method.
    pub method: PaymentMethod,
    /// Free-text description (required).
    pub description: String,
    /// Counterparty display name; may be empty.
    pub counterparty_name: String,
    /// Optional note carried over from the originating payment.
    pub note: Option<String>,
    /// Originating invoice, if any.
    pub invoice_id: Option<InvoiceId>,
    /// The acting user.
    pub created_by: UserId,
}

/// A cash movement to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewCashFlow {
    /// Money in.
    Receipt {
        /// Receipt category.
        category: ReceiptCategory,
        /// Paying customer, if known.
        customer_id: Option<CustomerId>,
        /// Common fields.
        details: CashFlowDetails,
    },
    /// Money out.
    Disbursement {
        /// Disbursement category.
        category: DisbursementCategory,
        /// Receiving supplier, if known.
        supplier_id: Option<SupplierId>,
        /// Common fields.
        details: CashFlowDetails,
    },
}

impl NewCashFlow {
    /// Returns the direction of the movement.
    #[must_use]
    pub fn kind(&self) -> CashFlowKind {
        match self {
            Self::Receipt { .. } => CashFlowKind::Receipt,
            Self::Disbursement { .. } => CashFlowKind::Disbursement,
        }
    }

    /// Returns the common fields.
    #[must_use]
    pub fn details(&self) -> &CashFlowDetails {
        match self {
            Self::Receipt { details, .. } | Self::Disbursement { details, .. } => details,
        }
    }
}

/// A recorded cash receipt (phiếu thu).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Unique identifier.
    pub id: ReceiptId,
    /// Date of the receipt.
    pub date: NaiveDate,
    /// Amount received.
    pub amount: Decimal,
    /// Category.
    pub category: ReceiptCategory,
    /// Description.
    pub description: String,
    /// Counterparty display name.
    pub counterparty_name: String,
    /// Payment method.
    pub method: PaymentMethod,
    /// Optional note.
    pub note: Option<String>,
    /// Paying customer, if known.
    pub customer_id: Option<CustomerId>,
    /// Originating invoice, if any.
    pub invoice_id: Option<InvoiceId>,
    /// User who recorded the receipt.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A recorded cash disbursement (phiếu chi).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disbursement {
    /// Unique identifier.
    pub id: DisbursementId,
    /// Date of the disbursement.
    pub date: NaiveDate,
    /// Amount paid out.
    pub amount: Decimal,
    /// Category.
    pub category: DisbursementCategory,
    /// Description.
    pub description: String,
    /// Counterparty display name.
    pub counterparty_name: String,
    /// Payment method.
    pub method: PaymentMethod,
    /// Optional note.
    pub note: Option<String>,
    /// Receiving supplier, if known.
    pub supplier_id: Option<SupplierId>,
    /// Originating invoice, if any.
    pub invoice_id: Option<InvoiceId>,
    /// User who recorded the disbursement.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A recorded cash movement of either direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CashFlowEntry {
    /// Money in.
    Receipt(Receipt),
    /// Money out.
    Disbursement(Disbursement),
}

impl CashFlowEntry {
    /// Returns the direction of the movement.
    #[must_use]
    pub fn kind(&self) -> CashFlowKind {
        match self {
            Self::Receipt(_) => CashFlowKind::Receipt,
            Self::Disbursement(_) => CashFlowKind::Disbursement,
        }
    }

    /// Returns the amount moved.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        match self {
            Self::Receipt(r) => r.amount,
            Self::Disbursement(d) => d.amount,
        }
    }

    /// Returns the date of the movement.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Receipt(r) => r.date,
            Self::Disbursement(d) => d.date,
        }
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Receipt(r) => &r.description,
            Self::Disbursement(d) => &d.description,
        }
    }

    /// Returns the receipt, if this is one.
    #[must_use]
    pub fn as_receipt(&self) -> Option<&Receipt> {
        match self {
            Self::Receipt(r) => Some(r),
            Self::Disbursement(_) => None,
        }
    }

    /// Returns the disbursement, if this is one.
    #[must_use]
    pub fn as_disbursement(&self) -> Option<&Disbursement> {
        match self {
            Self::Disbursement(d) => Some(d),
            Self::Receipt(_) => None,
        }
    }
}
