//! Backend-representable sub-transactions produced by decomposition.

use chrono::NaiveDate;
use ledgerbridge_shared::{AccountId, CurrencyCode, Money, TransactionId};
use serde::{Deserialize, Serialize};

use crate::currency::convert;

use super::item::LineItem;

/// Description carried by synthesized compensating lines.
pub const COMPENSATING_DESCRIPTION: &str = "Balancing entry for multi-currency split";

/// Description carried by residual lines.
pub const RESIDUAL_DESCRIPTION: &str = "Rounding difference from FX rate precision";

/// Back-reference from a sub-transaction to the journal transaction it was
/// carved out of.
///
/// Renders as `"<id>:<CUR>"`, which doubles as the idempotency key the sync
/// layer hands to the backend when creating the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// The originating transaction.
    pub transaction: TransactionId,
    /// The currency group this sub-transaction was emitted for.
    pub currency: CurrencyCode,
}

impl SourceRef {
    /// Creates a back-reference for one currency group.
    #[must_use]
    pub const fn new(transaction: TransactionId, currency: CurrencyCode) -> Self {
        Self {
            transaction,
            currency,
        }
    }

    /// The stable `"<id>:<CUR>"` key for this sub-transaction.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}:{}", self.transaction, self.currency)
    }
}

impl std::fmt::Display for SourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.transaction, self.currency)
    }
}

/// One backend-compliant transaction emitted by the decomposition pipeline.
///
/// Same shape as a journal transaction, but guaranteed by construction to
/// carry at most one non-reporting currency and rates at the backend's
/// precision. Holds a back-reference, never ownership, to its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTransaction {
    /// Where this sub-transaction came from.
    pub source: SourceRef,
    /// The booking date, copied from the original.
    pub date: NaiveDate,
    /// The description, copied from the original.
    pub description: String,
    /// The ordered line items, including any compensating and residual lines.
    pub items: Vec<LineItem>,
}

impl SubTransaction {
    /// Counts the distinct non-reporting currencies among the line items.
    #[must_use]
    pub fn foreign_currency_count(&self, reporting: CurrencyCode) -> usize {
        let mut seen: Vec<CurrencyCode> = Vec::new();
        for item in &self.items {
            if item.currency != reporting && !seen.contains(&item.currency) {
                seen.push(item.currency);
            }
        }
        seen.len()
    }

    /// Returns the residual line, if one was allocated.
    ///
    /// Compensating lines share the residual account; the fixed description
    /// tells the two kinds of synthetic line apart.
    #[must_use]
    pub fn residual_line(&self, residual_account: AccountId) -> Option<&LineItem> {
        self.items.iter().find(|item| {
            item.account == residual_account
                && item.description.as_deref() == Some(RESIDUAL_DESCRIPTION)
        })
    }

    /// Balance of this entry as the backend will record it.
    ///
    /// Reporting-currency lines count at face value; foreign lines convert
    /// at their stated rate, rounded to `reporting_places`. A compliant
    /// sub-transaction balances to exactly zero.
    #[must_use]
    pub fn recorded_balance(&self, reporting: CurrencyCode, reporting_places: u32) -> Money {
        let total = self
            .items
            .iter()
            .map(|item| {
                if item.currency == reporting {
                    item.amount
                } else {
                    convert(item.amount, item.rate, reporting_places)
                }
            })
            .sum();
        Money::new(total, reporting)
    }
}
