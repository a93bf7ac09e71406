//! Backend abstraction for journal entry storage.

use crate::journal::{SourceRef, SubTransaction};

use super::error::EngineError;

/// A journal store with representational constraints.
///
/// Models the remote system's create and delete operations over entries.
/// Implementations enforce their own constraints and reject entries that
/// violate them; callers are expected to submit pre-decomposed entries.
pub trait RestrictedBackend: Send + Sync {
    /// Records one entry under its source reference.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EntryRejected`] when the entry violates a
    /// backend constraint or its source reference is already taken.
    fn create_entry(&mut self, entry: &SubTransaction) -> Result<(), EngineError>;

    /// Deletes the entry recorded under `source`.
    ///
    /// Returns `false` when no such entry exists.
    ///
    /// # Errors
    ///
    /// Implementations backed by remote services may fail on transport
    /// problems; the in-memory store never does.
    fn delete_entry(&mut self, source: &SourceRef) -> Result<bool, EngineError>;

    /// Recorded entries in insertion order.
    fn entries(&self) -> Vec<&SubTransaction>;
}
