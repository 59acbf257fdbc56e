//! Shared fixtures for the repository integration tests.

#![allow(dead_code)]

use rust_decimal::Decimal;
use soquy_core::common::{Counterparty, PaymentMethod};
use soquy_core::debt::{CreateDebtInput, DebtType, PaymentInput};
use soquy_core::invoice::{
    CreateInvoiceInput, InvoiceKind, IssueInvoiceInput, LineItemInput, PayInvoiceInput,
};
use soquy_db::{CashFlowRepository, DebtRepository, InvoiceRepository, MemoryStore, Store};
use soquy_shared::types::{CustomerId, SupplierId, UserId};
use soquy_shared::{LedgerConfig, LogConfig};

/// The three repositories sharing one store.
pub struct Ledger<S> {
    pub invoices: InvoiceRepository<S>,
    pub debts: DebtRepository<S>,
    pub cash_flows: CashFlowRepository<S>,
    pub user: UserId,
}

impl<S: Store + Clone> Ledger<S> {
    pub fn with_store(store: S) -> Self {
        let _ = soquy_shared::telemetry::init_tracing(&LogConfig::default());
        let config = LedgerConfig::default();
        Self {
            invoices: InvoiceRepository::new(store.clone(), config.clone()),
            debts: DebtRepository::new(store.clone(), config),
            cash_flows: CashFlowRepository::new(store),
            user: UserId::new(),
        }
    }
}

impl Ledger<MemoryStore> {
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }
}

pub fn item(name: &str, quantity: Decimal, unit_price: Decimal) -> LineItemInput {
    LineItemInput {
        product_name: name.to_string(),
        unit: Some("cái".to_string()),
        quantity,
        unit_price,
    }
}

pub fn invoice_input(
    customer_id: CustomerId,
    user: UserId,
    line_items: Vec<LineItemInput>,
) -> CreateInvoiceInput {
    CreateInvoiceInput {
        code: None,
        issue_date: None,
        kind: InvoiceKind::Sale,
        customer_id,
        line_items,
        tax_amount: Decimal::ZERO,
        discount_percent: Decimal::ZERO,
        note: None,
        created_by: user,
    }
}

pub fn issue_input(user: UserId) -> IssueInvoiceInput {
    IssueInvoiceInput {
        due_date: None,
        issued_by: user,
    }
}

pub fn pay_input(amount: Option<Decimal>, user: UserId) -> PayInvoiceInput {
    PayInvoiceInput {
        amount,
        method: PaymentMethod::Cash,
        paid_on: None,
        note: None,
        paid_by: user,
    }
}

pub fn receivable(principal: Decimal, user: UserId) -> CreateDebtInput {
    CreateDebtInput {
        code: None,
        debt_type: DebtType::Receivable,
        principal,
        created_on: None,
        due_date: Some(soquy_shared::types::date::today() + chrono::Duration::days(30)),
        note: None,
        counterparty: Some(Counterparty::Customer(CustomerId::new())),
        invoice_id: None,
        created_by: user,
    }
}

pub fn payable(principal: Decimal, user: UserId) -> CreateDebtInput {
    CreateDebtInput {
        debt_type: DebtType::Payable,
        counterparty: Some(Counterparty::Supplier(SupplierId::new())),
        ..receivable(principal, user)
    }
}

pub fn payment(amount: Decimal, user: UserId) -> PaymentInput {
    PaymentInput {
        amount,
        method: PaymentMethod::BankTransfer,
        paid_on: None,
        note: None,
        recorded_by: user,
    }
}
