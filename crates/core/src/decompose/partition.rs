//! Grouping of line items by transaction currency.

use std::collections::BTreeMap;

use ledgerbridge_shared::CurrencyCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::journal::{LedgerTransaction, LineItem};

use super::error::DecomposeError;

/// All line items of one transaction that share a transaction currency.
///
/// Items keep their original relative order. Any single group is
/// representable alone under the backend's one-foreign-currency rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyGroup {
    /// The shared transaction currency.
    pub currency: CurrencyCode,
    /// The group's line items, in original order.
    pub items: Vec<LineItem>,
}

impl CurrencyGroup {
    /// Returns true if this is the reporting-currency group.
    #[must_use]
    pub fn is_reporting(&self, reporting: CurrencyCode) -> bool {
        self.currency == reporting
    }

    /// Exact reporting-currency sum of the group's items.
    ///
    /// Reporting-currency lines count at face value regardless of their
    /// stated rate.
    #[must_use]
    pub fn exact_reporting_sum(&self, reporting: CurrencyCode) -> Decimal {
        self.items
            .iter()
            .map(|item| {
                if item.currency == reporting {
                    item.amount
                } else {
                    item.reporting_value()
                }
            })
            .sum()
    }
}

/// Splits a transaction into currency groups.
///
/// Groups are ordered by currency code, so the output (and everything
/// derived from it, including sub-transaction keys) is stable across calls.
pub fn partition(transaction: &LedgerTransaction) -> Result<Vec<CurrencyGroup>, DecomposeError> {
    if transaction.is_empty() {
        return Err(DecomposeError::EmptyTransaction);
    }

    let mut by_currency: BTreeMap<CurrencyCode, Vec<LineItem>> = BTreeMap::new();
    for item in &transaction.items {
        by_currency
            .entry(item.currency)
            .or_default()
            .push(item.clone());
    }

    Ok(by_currency
        .into_iter()
        .map(|(currency, items)| CurrencyGroup { currency, items })
        .collect())
}
