//! Engine error types.

use ledgerbridge_shared::{AccountId, CurrencyCode, TransactionId};
use thiserror::Error;

use crate::decompose::DecomposeError;

/// Errors raised by the write path and its backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Decomposition of the submitted transaction failed.
    #[error(transparent)]
    Decompose(#[from] DecomposeError),

    /// A line item references an account missing from the chart.
    #[error("Unknown account: {0}")]
    UnknownAccount(AccountId),

    /// The configured residual account is missing from the chart.
    #[error("Residual account {0} is not in the chart of accounts")]
    MissingResidualAccount(AccountId),

    /// The configured residual account is denominated in the wrong currency.
    #[error("Residual account {account} is denominated in {currency}, expected {expected}")]
    ResidualAccountCurrency {
        /// The configured residual account.
        account: AccountId,
        /// Currency the account is denominated in.
        currency: CurrencyCode,
        /// The reporting currency it must carry.
        expected: CurrencyCode,
    },

    /// No entries are recorded under this transaction.
    #[error("Unknown transaction: {0}")]
    UnknownTransaction(TransactionId),

    /// The backend refused an entry.
    #[error("Backend rejected entry {key}: {reason}")]
    EntryRejected {
        /// Source reference key of the refused entry.
        key: String,
        /// Backend-supplied reason.
        reason: String,
    },
}
