//! Journal transactions as the reconciliation layer hands them over.

use chrono::NaiveDate;
use ledgerbridge_shared::TransactionId;
use serde::{Deserialize, Serialize};

use super::item::LineItem;

/// A journal transaction in the generic ledger model.
///
/// May mix any number of currencies across its line items. The double-entry
/// invariant is that the signed reporting-currency values of all items sum to
/// zero; the decomposition pipeline verifies this rather than trusting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    /// Owner-assigned transaction identifier.
    pub id: TransactionId,
    /// The booking date.
    pub date: NaiveDate,
    /// A description of the transaction.
    pub description: String,
    /// The ordered line items.
    pub items: Vec<LineItem>,
}

impl LedgerTransaction {
    /// Creates a transaction from its parts.
    #[must_use]
    pub fn new(
        id: TransactionId,
        date: NaiveDate,
        description: impl Into<String>,
        items: Vec<LineItem>,
    ) -> Self {
        Self {
            id,
            date,
            description: description.into(),
            items,
        }
    }

    /// Returns true if the transaction has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
