//! Storage bindings for the domain entities.

use soquy_core::cash_flow::{Disbursement, Receipt};
use soquy_core::debt::Debt;
use soquy_core::invoice::Invoice;
use soquy_shared::types::{DebtId, DisbursementId, InvoiceId, ReceiptId};

use crate::store::Record;

impl Record for Invoice {
    type Id = InvoiceId;
    const COLLECTION: &'static str = "invoices";
    const CODE_FIELD: Option<&'static str> = Some("code");

    fn id(&self) -> InvoiceId {
        self.id
    }
}

impl Record for Debt {
    type Id = DebtId;
    const COLLECTION: &'static str = "debts";
    const CODE_FIELD: Option<&'static str> = Some("code");

    fn id(&self) -> DebtId {
        self.id
    }
}

impl Record for Receipt {
    type Id = ReceiptId;
    const COLLECTION: &'static str = "receipts";

    fn id(&self) -> ReceiptId {
        self.id
    }
}

impl Record for Disbursement {
    type Id = DisbursementId;
    const COLLECTION: &'static str = "disbursements";

    fn id(&self) -> DisbursementId {
        self.id
    }
}
