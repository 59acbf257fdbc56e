//! Types shared by debts and cash-flow entries.

use serde::{Deserialize, Serialize};
use soquy_shared::types::{CustomerId, SupplierId};
use std::fmt;

/// How money changed hands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash.
    #[default]
    Cash,
    /// Bank transfer.
    BankTransfer,
    /// Card payment.
    Card,
    /// Anything else.
    Other,
}

impl PaymentMethod {
    /// Returns the string representation of the method.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::BankTransfer => "bank_transfer",
            Self::Card => "card",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The other party of a debt or cash movement.
///
/// Receivables are owed by customers, payables are owed to suppliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Counterparty {
    /// A customer.
    Customer(CustomerId),
    /// A supplier.
    Supplier(SupplierId),
}

impl Counterparty {
    /// Returns the customer ID, if this is a customer.
    #[must_use]
    pub fn customer_id(&self) -> Option<CustomerId> {
        match self {
            Self::Customer(id) => Some(*id),
            Self::Supplier(_) => None,
        }
    }

    /// Returns the supplier ID, if this is a supplier.
    #[must_use]
    pub fn supplier_id(&self) -> Option<SupplierId> {
        match self {
            Self::Supplier(id) => Some(*id),
            Self::Customer(_) => None,
        }
    }

    /// Returns the generic display name used on cash-flow entries.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Customer(_) => "Customer",
            Self::Supplier(_) => "Supplier",
        }
    }

    /// Returns the lowercase kind name.
    #[must_use]
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::Customer(_) => "customer",
            Self::Supplier(_) => "supplier",
        }
    }
}
