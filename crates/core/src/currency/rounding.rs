//! Decimal rounding and rate application.
//!
//! CRITICAL: Rounding strategy for multi-currency:
//! - Always round to the target's decimal places
//! - Use banker's rounding (round half to even)
//! - Keep exact values around until the last possible moment

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a value to the given number of decimal places.
///
/// Uses banker's rounding (round half to even) to minimize cumulative errors.
#[must_use]
pub fn round_half_even(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}

/// Converts an amount using the given exchange rate, rounded to the target
/// currency's decimal places.
#[must_use]
pub fn convert(amount: Decimal, rate: Decimal, decimal_places: u32) -> Decimal {
    round_half_even(amount * rate, decimal_places)
}

/// One minimal unit at the given precision (e.g. `0.01` for two places).
#[must_use]
pub fn unit(decimal_places: u32) -> Decimal {
    Decimal::new(1, decimal_places)
}

/// Number of fractional digits a value actually carries.
///
/// Trailing zeros do not count: `0.91000000` carries two digits.
#[must_use]
pub fn fractional_digits(value: Decimal) -> u32 {
    value.normalize().scale()
}
