//! Residual allocation.
//!
//! Whatever sub-unit error the backend's precision introduces for one
//! sub-transaction is booked as a single line on the designated rounding
//! difference account. A residual above the configured cap is refused: it
//! means the input data is more precise than the backend can represent and
//! must be fixed upstream, not papered over.

use rust_decimal::Decimal;

use crate::currency::round_half_even;
use crate::journal::{LineItem, RESIDUAL_DESCRIPTION, SubTransaction};

use super::config::PrecisionConfig;
use super::error::DecomposeError;

/// Appends the residual line to a sub-transaction, if one is needed.
///
/// A residual that rounds to zero at reporting precision is a no-op, which
/// makes the call idempotent: re-allocating an already-adjusted
/// sub-transaction with zero residual changes nothing.
pub fn allocate(
    sub: &mut SubTransaction,
    residual: Decimal,
    config: &PrecisionConfig,
) -> Result<(), DecomposeError> {
    let places = config.reporting_precision()?;
    let rounded = round_half_even(residual, places);
    if rounded.is_zero() {
        return Ok(());
    }

    let limit = residual_limit(config, sub.items.len())?;
    if rounded.abs() > limit {
        return Err(DecomposeError::ResidualTooLarge {
            currency: sub.source.currency,
            residual: rounded,
            limit,
        });
    }

    sub.items.push(
        LineItem::new(
            config.residual_account,
            config.reporting_currency,
            rounded,
            Decimal::ONE,
        )
        .with_description(RESIDUAL_DESCRIPTION),
    );
    Ok(())
}

/// The residual cap for a sub-transaction with `line_count` items.
pub fn residual_limit(
    config: &PrecisionConfig,
    line_count: usize,
) -> Result<Decimal, DecomposeError> {
    let count = u32::try_from(line_count).unwrap_or(u32::MAX).max(1);
    Ok(config.reporting_unit()? * Decimal::from(config.max_residual_units) * Decimal::from(count))
}
