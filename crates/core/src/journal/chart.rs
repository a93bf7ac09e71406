//! Chart of accounts metadata.
//!
//! The engine only reads from the chart; accounts are created and maintained
//! by the (out-of-scope) reconciliation layer. Identity is the chart position
//! number, and the one property the decomposition pipeline cares about is the
//! currency an account is denominated in.

use std::collections::BTreeMap;

use ledgerbridge_shared::{AccountId, CurrencyCode};
use serde::{Deserialize, Serialize};

/// Metadata for one chart of accounts position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// The chart position.
    pub id: AccountId,
    /// The currency the account is denominated in.
    pub currency: CurrencyCode,
    /// Human-readable account name.
    pub name: String,
}

/// Read-only registry of accounts, keyed by chart position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountChart {
    accounts: BTreeMap<AccountId, AccountInfo>,
}

impl AccountChart {
    /// Creates an empty chart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account, replacing any previous entry at the same position.
    pub fn insert(&mut self, id: AccountId, currency: CurrencyCode, name: impl Into<String>) {
        self.accounts.insert(
            id,
            AccountInfo {
                id,
                currency,
                name: name.into(),
            },
        );
    }

    /// Builder-style insert for test and setup code.
    #[must_use]
    pub fn with_account(
        mut self,
        id: AccountId,
        currency: CurrencyCode,
        name: impl Into<String>,
    ) -> Self {
        self.insert(id, currency, name);
        self
    }

    /// Looks up an account by position.
    #[must_use]
    pub fn get(&self, id: AccountId) -> Option<&AccountInfo> {
        self.accounts.get(&id)
    }

    /// Returns true if the position exists in the chart.
    #[must_use]
    pub fn contains(&self, id: AccountId) -> bool {
        self.accounts.contains_key(&id)
    }

    /// Iterates accounts in position order.
    pub fn iter(&self) -> impl Iterator<Item = &AccountInfo> {
        self.accounts.values()
    }

    /// Number of accounts in the chart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if the chart has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
