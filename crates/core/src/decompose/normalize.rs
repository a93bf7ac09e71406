//! Precision normalization for rates and amounts.
//!
//! The backend stores FX rates with a bounded number of fractional digits and
//! amounts at each currency's canonical decimal places. Normalization rounds
//! both (banker's rounding) and reports the reporting-currency error this
//! introduces, so the planner can account for every sub-unit lost.

use ledgerbridge_shared::CurrencyCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::{convert, round_half_even};

use super::config::PrecisionConfig;
use super::error::DecomposeError;

/// The backend-precision view of one line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Normalized {
    /// Rate rounded to the backend's maximum fractional digits.
    pub rate: Decimal,
    /// Amount rounded to the currency's canonical decimal places.
    pub amount: Decimal,
    /// Reporting-currency value the backend will compute (`amount × rate`,
    /// rounded to reporting precision).
    pub backend_value: Decimal,
    /// Exact reporting-currency value minus `backend_value`, signed.
    pub residual: Decimal,
}

impl Normalized {
    /// The exact (pre-rounding) reporting-currency value.
    #[must_use]
    pub fn exact_value(&self) -> Decimal {
        self.backend_value + self.residual
    }
}

/// Normalizes one line's rate and amount to backend precision.
///
/// Reporting-currency lines are a special case: their rate is 1 by
/// definition, whatever the input says, and their backend value is the
/// rounded amount itself.
pub fn normalize(
    rate: Decimal,
    amount: Decimal,
    currency: CurrencyCode,
    config: &PrecisionConfig,
) -> Result<Normalized, DecomposeError> {
    if rate <= Decimal::ZERO {
        return Err(DecomposeError::InvalidRate { currency, rate });
    }

    let reporting_places = config.reporting_precision()?;
    if config.is_reporting(currency) {
        let rounded = round_half_even(amount, reporting_places);
        return Ok(Normalized {
            rate: Decimal::ONE,
            amount: rounded,
            backend_value: rounded,
            residual: amount - rounded,
        });
    }

    let rounded_rate = round_half_even(rate, config.max_rate_digits);
    let rounded_amount = round_half_even(amount, config.precision(currency)?);
    let backend_value = convert(rounded_amount, rounded_rate, reporting_places);
    Ok(Normalized {
        rate: rounded_rate,
        amount: rounded_amount,
        backend_value,
        residual: amount * rate - backend_value,
    })
}
