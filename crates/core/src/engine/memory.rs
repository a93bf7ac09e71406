//! In-memory journal store enforcing backend constraints.

use ledgerbridge_shared::CurrencyCode;

use crate::currency::fractional_digits;
use crate::journal::{SourceRef, SubTransaction};

use super::backend::RestrictedBackend;
use super::error::EngineError;

/// Journal store that behaves like the restricted remote backend.
///
/// Rejects any entry touching more than one non-reporting currency or
/// carrying an FX rate with too many fractional digits, so tests exercise
/// the same constraints the real service imposes.
#[derive(Debug, Clone)]
pub struct InMemoryBackend {
    reporting: CurrencyCode,
    max_rate_digits: u32,
    entries: Vec<SubTransaction>,
}

impl InMemoryBackend {
    /// Creates an empty store enforcing the given constraints.
    #[must_use]
    pub const fn new(reporting: CurrencyCode, max_rate_digits: u32) -> Self {
        Self {
            reporting,
            max_rate_digits,
            entries: Vec::new(),
        }
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn reject(entry: &SubTransaction, reason: String) -> EngineError {
        EngineError::EntryRejected {
            key: entry.source.key(),
            reason,
        }
    }
}

impl RestrictedBackend for InMemoryBackend {
    fn create_entry(&mut self, entry: &SubTransaction) -> Result<(), EngineError> {
        if self.entries.iter().any(|e| e.source == entry.source) {
            return Err(Self::reject(entry, "duplicate source reference".to_string()));
        }
        let foreign = entry.foreign_currency_count(self.reporting);
        if foreign > 1 {
            return Err(Self::reject(
                entry,
                format!("{foreign} foreign currencies in one entry"),
            ));
        }
        for item in &entry.items {
            let digits = fractional_digits(item.rate);
            if digits > self.max_rate_digits {
                return Err(Self::reject(
                    entry,
                    format!(
                        "rate {} carries {digits} fractional digits, maximum is {}",
                        item.rate, self.max_rate_digits
                    ),
                ));
            }
        }
        self.entries.push(entry.clone());
        Ok(())
    }

    fn delete_entry(&mut self, source: &SourceRef) -> Result<bool, EngineError> {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.source != *source);
        Ok(before != self.entries.len())
    }

    fn entries(&self) -> Vec<&SubTransaction> {
        self.entries.iter().collect()
    }
}
