//! Decomposition entry point.
//!
//! Wires the stages into one pure function: partition the transaction by
//! currency, plan one sub-transaction per group, then prove the batch
//! equivalent to the input before handing it back. Callers submit the
//! returned sub-transactions to the backend in order.

use crate::journal::{LedgerTransaction, SubTransaction};

use super::config::PrecisionConfig;
use super::error::DecomposeError;
use super::partition::partition;
use super::plan::plan;
use super::validate::validate_equivalence;

/// Decomposes one transaction into backend-compliant sub-transactions.
///
/// Each returned sub-transaction references at most one non-reporting
/// currency, balances to zero in reporting terms, and carries FX rates at
/// the configured precision. The batch as a whole preserves every account's
/// balance within one minimal currency unit. The function is deterministic
/// and holds no state between calls.
///
/// # Errors
///
/// Returns the first failure among [`DecomposeError::EmptyTransaction`],
/// [`DecomposeError::InvalidRate`], [`DecomposeError::MissingPrecision`],
/// [`DecomposeError::UnbalanceableGroup`],
/// [`DecomposeError::ResidualTooLarge`] and, should the planner ever emit a
/// non-equivalent batch, [`DecomposeError::Equivalence`].
pub fn decompose(
    transaction: &LedgerTransaction,
    config: &PrecisionConfig,
) -> Result<Vec<SubTransaction>, DecomposeError> {
    let groups = partition(transaction)?;
    let subs = plan(transaction, &groups, config)?;
    validate_equivalence(transaction, &subs, config)?;
    Ok(subs)
}
