//! Invoice domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use soquy_shared::types::{CustomerId, DebtId, InvoiceId, UserId};
use std::fmt;

use crate::common::PaymentMethod;

/// What the invoice bills for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceKind {
    /// Sale of goods.
    #[default]
    Sale,
    /// Services rendered.
    Service,
    /// Anything else.
    Other,
}

impl InvoiceKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Service => "service",
            Self::Other => "other",
        }
    }
}

/// Invoice lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Editable, not yet billed.
    #[default]
    Draft,
    /// Billed; a receivable debt exists.
    Issued,
    /// A payment has been recorded.
    Paid,
    /// Voided.
    Cancelled,
}

impl InvoiceStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Issued => "issued",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "issued" => Some(Self::Issued),
            "paid" => Some(Self::Paid),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if the invoice contents can be edited.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if no transition leaves this status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled)
    }

    /// Returns true if an invoice in this status may be deleted.
    #[must_use]
    pub fn is_deletable(&self) -> bool {
        matches!(self, Self::Draft | Self::Cancelled)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line item as submitted by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItemInput {
    /// Product name (required).
    pub product_name: String,
    /// Unit of measure (cái, kg, giờ...).
    pub unit: Option<String>,
    /// Quantity (must be positive).
    pub quantity: Decimal,
    /// Unit price (must not be negative).
    pub unit_price: Decimal,
}

/// A validated line item with its computed total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product name.
    pub product_name: String,
    /// Unit of measure.
    pub unit: Option<String>,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
    /// `quantity × unit_price`.
    pub line_total: Decimal,
}

impl From<&LineItem> for LineItemInput {
    fn from(line: &LineItem) -> Self {
        Self {
            product_name: line.product_name.clone(),
            unit: line.unit.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }
}

/// Aggregate invoice amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Tax (VAT) amount.
    pub tax_amount: Decimal,
    /// Discount percentage, 0 to 100.
    pub discount_percent: Decimal,
    /// `subtotal × discount_percent / 100`, rounded to whole đồng.
    pub discount_amount: Decimal,
    /// `subtotal + tax_amount − discount_amount`.
    pub grand_total: Decimal,
}

/// A sales invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier.
    pub id: InvoiceId,
    /// Unique human-readable code (`HD…`).
    pub code: String,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Sale, service or other.
    pub kind: InvoiceKind,
    /// Billed customer.
    pub customer_id: CustomerId,
    /// Line items in entry order.
    pub line_items: Vec<LineItem>,
    /// Computed amounts.
    pub totals: InvoiceTotals,
    /// Free-text note.
    pub note: Option<String>,
    /// Lifecycle status.
    pub status: InvoiceStatus,
    /// Receivable created when the invoice was issued.
    pub debt_id: Option<DebtId>,
    /// User who created the invoice.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    /// Client-supplied code; generated when absent.
    pub code: Option<String>,
    /// Issue date; defaults to today.
    pub issue_date: Option<NaiveDate>,
    /// Invoice kind.
    pub kind: InvoiceKind,
    /// Billed customer.
    pub customer_id: CustomerId,
    /// Line items.
    pub line_items: Vec<LineItemInput>,
    /// Tax amount.
    pub tax_amount: Decimal,
    /// Discount percentage.
    pub discount_percent: Decimal,
    /// Free-text note.
    pub note: Option<String>,
    /// The acting user.
    pub created_by: UserId,
}

/// Input for editing a draft invoice. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateInvoiceInput {
    /// New issue date.
    pub issue_date: Option<NaiveDate>,
    /// New kind.
    pub kind: Option<InvoiceKind>,
    /// New customer.
    pub customer_id: Option<CustomerId>,
    /// Replacement line items.
    pub line_items: Option<Vec<LineItemInput>>,
    /// New tax amount.
    pub tax_amount: Option<Decimal>,
    /// New discount percentage.
    pub discount_percent: Option<Decimal>,
    /// New note (`Some(None)` clears it).
    pub note: Option<Option<String>>,
}

/// Input for issuing an invoice.
#[derive(Debug, Clone)]
pub struct IssueInvoiceInput {
    /// Due date of the receivable; defaults to the issue date plus the
    /// configured number of days.
    pub due_date: Option<NaiveDate>,
    /// The acting user.
    pub issued_by: UserId,
}

/// Input for paying an issued invoice.
#[derive(Debug, Clone)]
pub struct PayInvoiceInput {
    /// Amount paid; defaults to the grand total.
    pub amount: Option<Decimal>,
    /// Payment method.
    pub method: PaymentMethod,
    /// Payment date; defaults to today.
    pub paid_on: Option<NaiveDate>,
    /// Payment note; defaults to a reference to the invoice code.
    pub note: Option<String>,
    /// The acting user.
    pub paid_by: UserId,
}
