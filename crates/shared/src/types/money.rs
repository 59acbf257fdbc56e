//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal` in Vietnamese đồng, which has no
//! minor unit, so rounded amounts carry zero decimal places.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept for rounded currency amounts.
pub const CURRENCY_DECIMAL_PLACES: u32 = 0;

/// Rounds an amount to whole đồng.
///
/// Uses banker's rounding (round half to even) to minimize cumulative errors.
#[must_use]
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(
        CURRENCY_DECIMAL_PLACES,
        RoundingStrategy::MidpointNearestEven,
    )
}

/// Returns `percent`% of `base`, rounded to whole đồng.
#[must_use]
pub fn percent_of(base: Decimal, percent: Decimal) -> Decimal {
    round_amount(base * percent / Decimal::ONE_HUNDRED)
}

/// Returns true if the amount is strictly greater than zero.
#[must_use]
pub fn is_positive(amount: Decimal) -> bool {
    amount > Decimal::ZERO
}
