//! Precision configuration for the decomposition pipeline.

use std::collections::BTreeMap;

use ledgerbridge_shared::{AccountId, CurrencyCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::unit;

use super::error::DecomposeError;

/// Default number of fractional digits the backend accepts for FX rates.
pub const DEFAULT_MAX_RATE_DIGITS: u32 = 8;

/// Default residual cap, in minimal currency units per line item.
pub const DEFAULT_MAX_RESIDUAL_UNITS: u32 = 1;

/// Read-only precision metadata shared by every stage of the pipeline.
///
/// Construction is explicit: the engine does not load configuration from the
/// environment. The reporting currency and the residual account have no
/// sensible defaults, so both are constructor arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecisionConfig {
    /// The currency the books are kept in.
    pub reporting_currency: CurrencyCode,
    /// The account that absorbs compensating and rounding-difference lines.
    pub residual_account: AccountId,
    /// Maximum fractional digits for FX rates.
    pub max_rate_digits: u32,
    /// Canonical decimal places per currency.
    pub currency_precision: BTreeMap<CurrencyCode, u32>,
    /// Residual cap in minimal units per line item of a sub-transaction.
    pub max_residual_units: u32,
}

impl PrecisionConfig {
    /// Creates a configuration with default rate digits and residual cap.
    #[must_use]
    pub fn new(reporting_currency: CurrencyCode, residual_account: AccountId) -> Self {
        Self {
            reporting_currency,
            residual_account,
            max_rate_digits: DEFAULT_MAX_RATE_DIGITS,
            currency_precision: BTreeMap::new(),
            max_residual_units: DEFAULT_MAX_RESIDUAL_UNITS,
        }
    }

    /// Registers the canonical decimal places for a currency.
    #[must_use]
    pub fn with_precision(mut self, currency: CurrencyCode, decimal_places: u32) -> Self {
        self.currency_precision.insert(currency, decimal_places);
        self
    }

    /// Overrides the maximum FX-rate digits.
    #[must_use]
    pub fn with_max_rate_digits(mut self, digits: u32) -> Self {
        self.max_rate_digits = digits;
        self
    }

    /// Overrides the residual cap.
    #[must_use]
    pub fn with_max_residual_units(mut self, units: u32) -> Self {
        self.max_residual_units = units;
        self
    }

    /// Returns true if the currency is the reporting currency.
    #[must_use]
    pub fn is_reporting(&self, currency: CurrencyCode) -> bool {
        currency == self.reporting_currency
    }

    /// Looks up the canonical decimal places for a currency.
    pub fn precision(&self, currency: CurrencyCode) -> Result<u32, DecomposeError> {
        self.currency_precision
            .get(&currency)
            .copied()
            .ok_or(DecomposeError::MissingPrecision { currency })
    }

    /// Decimal places of the reporting currency.
    pub fn reporting_precision(&self) -> Result<u32, DecomposeError> {
        self.precision(self.reporting_currency)
    }

    /// One minimal unit of the reporting currency.
    pub fn reporting_unit(&self) -> Result<Decimal, DecomposeError> {
        Ok(unit(self.reporting_precision()?))
    }
}
