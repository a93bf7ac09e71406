//! Journal line items.

use ledgerbridge_shared::{AccountId, CurrencyCode, TaxCodeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single line of a journal transaction.
///
/// Amounts are signed (positive = debit, negative = credit), carried in the
/// line's own transaction currency together with an FX rate to the reporting
/// currency. The rate may be arbitrarily precise here; only the decomposition
/// pipeline narrows it to what the backend accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// The account to post to.
    pub account: AccountId,
    /// The transaction currency of this line.
    pub currency: CurrencyCode,
    /// The signed amount in the transaction currency.
    pub amount: Decimal,
    /// FX rate from the transaction currency to the reporting currency.
    pub rate: Decimal,
    /// Optional tax code applied to this line.
    pub tax_code: Option<TaxCodeId>,
    /// Optional line-level description.
    pub description: Option<String>,
}

impl LineItem {
    /// Creates a line item without tax code or description.
    #[must_use]
    pub const fn new(
        account: AccountId,
        currency: CurrencyCode,
        amount: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            account,
            currency,
            amount,
            rate,
            tax_code: None,
            description: None,
        }
    }

    /// Attaches a tax code.
    #[must_use]
    pub fn with_tax_code(mut self, tax_code: TaxCodeId) -> Self {
        self.tax_code = Some(tax_code);
        self
    }

    /// Attaches a line description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The exact reporting-currency value of this line (`amount × rate`).
    ///
    /// No rounding is applied; this is the value the backend representation
    /// must approximate.
    #[must_use]
    pub fn reporting_value(&self) -> Decimal {
        self.amount * self.rate
    }
}
