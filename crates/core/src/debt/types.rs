//! Debt domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use soquy_shared::types::{DebtId, InvoiceId, UserId};
use std::fmt;

use crate::code::{PAYABLE_PREFIX, RECEIVABLE_PREFIX};
use crate::common::{Counterparty, PaymentMethod};

/// Debt direction. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtType {
    /// Money a customer owes us (phải thu).
    Receivable,
    /// Money we owe a supplier (phải trả).
    Payable,
}

impl DebtType {
    /// Returns the string representation of the type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receivable => "receivable",
            Self::Payable => "payable",
        }
    }

    /// Parses a type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "receivable" => Some(Self::Receivable),
            "payable" => Some(Self::Payable),
            _ => None,
        }
    }

    /// Prefix for generated debt codes.
    #[must_use]
    pub fn code_prefix(&self) -> &'static str {
        match self {
            Self::Receivable => RECEIVABLE_PREFIX,
            Self::Payable => PAYABLE_PREFIX,
        }
    }

    /// The counterparty kind this debt type requires.
    #[must_use]
    pub fn counterparty_kind(&self) -> &'static str {
        match self {
            Self::Receivable => "customer",
            Self::Payable => "supplier",
        }
    }

    /// Returns true if `counterparty` is the kind this type requires.
    #[must_use]
    pub fn accepts(&self, counterparty: &Counterparty) -> bool {
        matches!(
            (self, counterparty),
            (Self::Receivable, Counterparty::Customer(_))
                | (Self::Payable, Counterparty::Supplier(_))
        )
    }
}

impl fmt::Display for DebtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived debt status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtStatus {
    /// Nothing paid, not yet due.
    Unpaid,
    /// Some but not all of the principal has been paid.
    PartiallyPaid,
    /// Nothing remains, or the debt was closed with its invoice.
    Paid,
    /// Nothing paid and the due date has passed.
    Overdue,
}

impl DebtStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::PartiallyPaid => "partially_paid",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unpaid" => Some(Self::Unpaid),
            "partially_paid" => Some(Self::PartiallyPaid),
            "paid" => Some(Self::Paid),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }
}

impl fmt::Display for DebtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a debt's payment history. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Date the payment was made.
    pub paid_on: NaiveDate,
    /// Amount paid (always positive).
    pub amount: Decimal,
    /// Payment method.
    pub method: PaymentMethod,
    /// Optional note.
    pub note: Option<String>,
    /// User who recorded the payment.
    pub recorded_by: UserId,
}

/// A debt ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    /// Unique identifier.
    pub id: DebtId,
    /// Unique human-readable code (`PT…` / `PN…`).
    pub code: String,
    /// Receivable or payable.
    pub debt_type: DebtType,
    /// Amount originally owed.
    pub principal: Decimal,
    /// Date the debt arose.
    pub created_on: NaiveDate,
    /// Date payment is due.
    pub due_date: NaiveDate,
    /// Free-text note.
    pub note: Option<String>,
    /// Status as of the last mutation.
    pub status: DebtStatus,
    /// Customer (receivable) or supplier (payable).
    pub counterparty: Counterparty,
    /// Invoice this debt was issued from, if any.
    pub invoice_id: Option<InvoiceId>,
    /// Payment history in the order payments were recorded.
    pub payments: Vec<PaymentRecord>,
    /// User who created the debt.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Debt {
    /// Sum of all recorded payments.
    #[must_use]
    pub fn amount_paid(&self) -> Decimal {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// Principal minus the amount paid.
    #[must_use]
    pub fn amount_remaining(&self) -> Decimal {
        self.principal - self.amount_paid()
    }

    /// Returns true if the debt originates from an invoice.
    #[must_use]
    pub fn is_invoice_linked(&self) -> bool {
        self.invoice_id.is_some()
    }
}

/// Input for creating a debt.
#[derive(Debug, Clone)]
pub struct CreateDebtInput {
    /// Client-supplied code; generated when absent.
    pub code: Option<String>,
    /// Receivable or payable.
    pub debt_type: DebtType,
    /// Amount owed (must be positive).
    pub principal: Decimal,
    /// Date the debt arose; defaults to today.
    pub created_on: Option<NaiveDate>,
    /// Due date (required).
    pub due_date: Option<NaiveDate>,
    /// Free-text note.
    pub note: Option<String>,
    /// Customer or supplier, matching `debt_type`.
    pub counterparty: Option<Counterparty>,
    /// Originating invoice, if any.
    pub invoice_id: Option<InvoiceId>,
    /// The acting user.
    pub created_by: UserId,
}

/// Input for editing a debt. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateDebtInput {
    /// Requested debt type; any change is rejected.
    pub debt_type: Option<DebtType>,
    /// New principal.
    pub principal: Option<Decimal>,
    /// New due date.
    pub due_date: Option<NaiveDate>,
    /// New note (`Some(None)` clears it).
    pub note: Option<Option<String>>,
}

/// Input for recording a payment against a debt.
#[derive(Debug, Clone)]
pub struct PaymentInput {
    /// Amount paid (must be positive and within the remaining balance).
    pub amount: Decimal,
    /// Payment method.
    pub method: PaymentMethod,
    /// Payment date; defaults to today.
    pub paid_on: Option<NaiveDate>,
    /// Optional note.
    pub note: Option<String>,
    /// The acting user.
    pub recorded_by: UserId,
}

impl PaymentInput {
    /// Turns the input into a history entry, dating it `today` when no
    /// payment date was given.
    #[must_use]
    pub fn into_record(self, today: NaiveDate) -> PaymentRecord {
        PaymentRecord {
            paid_on: self.paid_on.unwrap_or(today),
            amount: self.amount,
            method: self.method,
            note: self.note,
            recorded_by: self.recorded_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soquy_shared::types::{CustomerId, SupplierId};

    #[test]
    fn test_debt_type_accepts_matching_counterparty() {
        let customer = Counterparty::Customer(CustomerId::new());
        let supplier = Counterparty::Supplier(SupplierId::new());

        assert!(DebtType::Receivable.accepts(&customer));
        assert!(!DebtType::Receivable.accepts(&supplier));
        assert!(DebtType::Payable.accepts(&supplier));
        assert!(!DebtType::Payable.accepts(&customer));
    }

    #[test]
    fn test_debt_type_prefix() {
        assert_eq!(DebtType::Receivable.code_prefix(), "PT");
        assert_eq!(DebtType::Payable.code_prefix(), "PN");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(DebtStatus::parse("partially_paid"), Some(DebtStatus::PartiallyPaid));
        assert_eq!(DebtStatus::parse("OVERDUE"), Some(DebtStatus::Overdue));
        assert_eq!(DebtStatus::parse("settled"), None);
        assert_eq!(DebtType::parse("Payable"), Some(DebtType::Payable));
    }
}
