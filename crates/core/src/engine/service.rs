//! Ledger engine trait and the decomposing write-path adapter.

use ledgerbridge_shared::TransactionId;
use tracing::{info, warn};

use crate::decompose::{PrecisionConfig, decompose};
use crate::journal::{AccountChart, LedgerTransaction, SourceRef, SubTransaction};

use super::backend::RestrictedBackend;
use super::error::EngineError;

/// Capability interface over a double-entry ledger.
///
/// Deliberately small: read access to the chart and journal, one write
/// operation, one delete operation. Implementations decide how submitted
/// transactions are represented in storage.
pub trait LedgerEngine {
    /// Chart of accounts the engine writes against.
    fn accounts(&self) -> &AccountChart;

    /// Recorded journal entries in submission order.
    fn journal(&self) -> Vec<&SubTransaction>;

    /// Validates and records one transaction.
    ///
    /// Returns the source references of the entries created, in submission
    /// order.
    ///
    /// # Errors
    ///
    /// Propagates validation, decomposition, and backend failures.
    fn post_transaction(
        &mut self,
        transaction: &LedgerTransaction,
    ) -> Result<Vec<SourceRef>, EngineError>;

    /// Deletes every entry recorded for `transaction`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownTransaction`] when nothing is recorded
    /// under the id.
    fn delete_transaction(&mut self, transaction: &TransactionId) -> Result<(), EngineError>;
}

/// Write-path adapter inserting decomposition in front of a restricted
/// backend.
///
/// Every posted transaction is decomposed into backend-compliant
/// sub-transactions and submitted in order; reads pass through unchanged.
/// The backend never sees a multi-currency collective entry.
#[derive(Debug)]
pub struct DecomposingLedger<B> {
    backend: B,
    chart: AccountChart,
    config: PrecisionConfig,
}

impl<B: RestrictedBackend> DecomposingLedger<B> {
    /// Wraps `backend` with decomposition against `chart` and `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingResidualAccount`] when the configured
    /// residual account is not in the chart, and
    /// [`EngineError::ResidualAccountCurrency`] when it is not denominated
    /// in the reporting currency.
    pub fn new(
        backend: B,
        chart: AccountChart,
        config: PrecisionConfig,
    ) -> Result<Self, EngineError> {
        let residual = config.residual_account;
        let info = chart
            .get(residual)
            .ok_or(EngineError::MissingResidualAccount(residual))?;
        if info.currency != config.reporting_currency {
            return Err(EngineError::ResidualAccountCurrency {
                account: residual,
                currency: info.currency,
                expected: config.reporting_currency,
            });
        }
        Ok(Self {
            backend,
            chart,
            config,
        })
    }

    /// Precision configuration the write path applies.
    #[must_use]
    pub const fn config(&self) -> &PrecisionConfig {
        &self.config
    }

    /// Consumes the adapter and returns the wrapped backend.
    #[must_use]
    pub fn into_backend(self) -> B {
        self.backend
    }
}

impl<B: RestrictedBackend> LedgerEngine for DecomposingLedger<B> {
    fn accounts(&self) -> &AccountChart {
        &self.chart
    }

    fn journal(&self) -> Vec<&SubTransaction> {
        self.backend.entries()
    }

    fn post_transaction(
        &mut self,
        transaction: &LedgerTransaction,
    ) -> Result<Vec<SourceRef>, EngineError> {
        for item in &transaction.items {
            if !self.chart.contains(item.account) {
                return Err(EngineError::UnknownAccount(item.account));
            }
        }

        let batch = decompose(transaction, &self.config)?;
        let mut submitted = Vec::with_capacity(batch.len());
        for sub in &batch {
            if let Err(err) = self.backend.create_entry(sub) {
                // A half-submitted batch must not stay behind.
                for source in &submitted {
                    if let Err(rollback) = self.backend.delete_entry(source) {
                        warn!(
                            entry = %source,
                            error = %rollback,
                            "Rollback delete failed, entry left behind"
                        );
                    }
                }
                warn!(
                    transaction = %transaction.id,
                    entry = %sub.source,
                    error = %err,
                    "Submission failed, batch unwound"
                );
                return Err(err);
            }
            submitted.push(sub.source.clone());
        }

        info!(
            transaction = %transaction.id,
            entries = submitted.len(),
            "Transaction decomposed and submitted"
        );
        Ok(submitted)
    }

    fn delete_transaction(&mut self, transaction: &TransactionId) -> Result<(), EngineError> {
        let sources: Vec<SourceRef> = self
            .backend
            .entries()
            .iter()
            .filter(|entry| entry.source.transaction == *transaction)
            .map(|entry| entry.source.clone())
            .collect();
        if sources.is_empty() {
            return Err(EngineError::UnknownTransaction(transaction.clone()));
        }
        for source in &sources {
            self.backend.delete_entry(source)?;
        }

        info!(
            transaction = %transaction,
            entries = sources.len(),
            "Transaction entries deleted"
        );
        Ok(())
    }
}
