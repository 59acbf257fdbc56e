//! Line item and invoice total calculation.

use rust_decimal::Decimal;
use soquy_shared::types::money::percent_of;

use super::error::InvoiceError;
use super::types::{InvoiceTotals, LineItem, LineItemInput};

/// Validates line items and computes every derived amount.
///
/// Line totals are exact; only the discount amount is rounded to whole
/// đồng. An invoice without line items is allowed and totals to the tax.
pub fn compute_invoice_totals(
    items: &[LineItemInput],
    tax_amount: Decimal,
    discount_percent: Decimal,
) -> Result<(Vec<LineItem>, InvoiceTotals), InvoiceError> {
    if tax_amount < Decimal::ZERO {
        return Err(InvoiceError::NegativeTax(tax_amount));
    }
    if discount_percent < Decimal::ZERO || discount_percent > Decimal::ONE_HUNDRED {
        return Err(InvoiceError::InvalidDiscountPercent(discount_percent));
    }

    let line_items = items
        .iter()
        .enumerate()
        .map(|(index, item)| compute_line(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    let subtotal: Decimal = line_items.iter().map(|l| l.line_total).sum();
    let discount_amount = percent_of(subtotal, discount_percent);
    let grand_total = subtotal + tax_amount - discount_amount;

    let totals = InvoiceTotals {
        subtotal,
        tax_amount,
        discount_percent,
        discount_amount,
        grand_total,
    };

    Ok((line_items, totals))
}

fn compute_line(index: usize, item: &LineItemInput) -> Result<LineItem, InvoiceError> {
    let product_name = item.product_name.trim();
    if product_name.is_empty() {
        return Err(InvoiceError::EmptyProductName { line: index + 1 });
    }
    if item.quantity <= Decimal::ZERO {
        return Err(InvoiceError::InvalidQuantity {
            line: index + 1,
            quantity: item.quantity,
        });
    }
    if item.unit_price < Decimal::ZERO {
        return Err(InvoiceError::NegativeUnitPrice {
            line: index + 1,
            unit_price: item.unit_price,
        });
    }

    Ok(LineItem {
        product_name: product_name.to_string(),
        unit: item.unit.clone(),
        quantity: item.quantity,
        unit_price: item.unit_price,
        line_total: item.quantity * item.unit_price,
    })
}
