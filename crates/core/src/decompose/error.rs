//! Decomposition error types.
//!
//! Every error here is a deterministic function of the input transaction and
//! configuration: retrying without changing the input cannot succeed, so none
//! of them are retried internally. The caller decides whether to skip, log,
//! or abort its synchronization run.

use ledgerbridge_shared::CurrencyCode;
use rust_decimal::Decimal;
use thiserror::Error;

use super::validate::BalanceMismatch;

/// Errors that can occur while decomposing a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecomposeError {
    // ========== Input Errors ==========
    /// Transaction has no line items.
    #[error("Transaction has no line items")]
    EmptyTransaction,

    /// An FX rate is zero or negative.
    #[error("FX rate for {currency} must be positive, got {rate}")]
    InvalidRate {
        /// The currency of the offending line.
        currency: CurrencyCode,
        /// The rate as given.
        rate: Decimal,
    },

    /// The transaction cannot be balanced at backend precision.
    #[error("Currency group {currency} cannot be balanced: off by {imbalance}")]
    UnbalanceableGroup {
        /// The offending currency group.
        currency: CurrencyCode,
        /// The reporting-currency amount left unmatched.
        imbalance: Decimal,
    },

    // ========== Configuration Errors ==========
    /// No decimal-places entry for a currency.
    #[error("No precision metadata for currency {currency}")]
    MissingPrecision {
        /// The currency without metadata.
        currency: CurrencyCode,
    },

    // ========== Precision Errors ==========
    /// A rounding residual exceeded the configured cap.
    #[error(
        "Residual {residual} for currency group {currency} exceeds the configured maximum {limit}"
    )]
    ResidualTooLarge {
        /// The currency group whose sub-transaction overflowed.
        currency: CurrencyCode,
        /// The residual that would have been booked.
        residual: Decimal,
        /// The configured cap.
        limit: Decimal,
    },

    // ========== Post-condition Errors ==========
    /// The emitted batch does not reproduce the original balances.
    #[error(
        "Decomposition is not equivalent to the original transaction: {} mismatched balance(s)",
        mismatches.len()
    )]
    Equivalence {
        /// Per account and currency differences, never empty.
        mismatches: Vec<BalanceMismatch>,
    },
}

impl DecomposeError {
    /// Returns the stable error code for logs and caller-facing reports.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyTransaction => "EMPTY_TRANSACTION",
            Self::InvalidRate { .. } => "INVALID_RATE",
            Self::UnbalanceableGroup { .. } => "UNBALANCEABLE_GROUP",
            Self::MissingPrecision { .. } => "MISSING_PRECISION",
            Self::ResidualTooLarge { .. } => "RESIDUAL_TOO_LARGE",
            Self::Equivalence { .. } => "EQUIVALENCE_FAILURE",
        }
    }

    /// Returns true if the error indicates a bug in the engine itself rather
    /// than bad input or configuration.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Equivalence { .. })
    }
}
