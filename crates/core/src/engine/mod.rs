//! Write-path engine over a restricted backend.
//!
//! This module provides the seam between decomposition and storage:
//! - Capability trait for ledger read/write/delete
//! - Decomposing adapter wrapping any restricted backend
//! - In-memory backend enforcing the remote system's constraints
//! - Error types for engine operations

pub mod backend;
pub mod error;
pub mod memory;
pub mod service;

#[cfg(test)]
mod tests;

pub use backend::RestrictedBackend;
pub use error::EngineError;
pub use memory::InMemoryBackend;
pub use service::{DecomposingLedger, LedgerEngine};
