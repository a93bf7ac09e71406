//! Transaction decomposition engine.
//!
//! This module turns multi-currency collective transactions into batches of
//! sub-transactions a single-currency backend can record:
//! - Precision normalization of FX rates and amounts
//! - Partitioning of line items into currency groups
//! - Planning of one balanced sub-transaction per group
//! - Bounded residual allocation for rounding drift
//! - Post-condition equivalence validation
//! - Error types for decomposition failures

pub mod config;
pub mod error;
pub mod normalize;
pub mod partition;
pub mod pipeline;
pub mod plan;
pub mod residual;
pub mod validate;

#[cfg(test)]
mod props;

pub use config::{DEFAULT_MAX_RATE_DIGITS, DEFAULT_MAX_RESIDUAL_UNITS, PrecisionConfig};
pub use error::DecomposeError;
pub use normalize::{Normalized, normalize};
pub use partition::{CurrencyGroup, partition};
pub use pipeline::decompose;
pub use plan::plan;
pub use residual::allocate;
pub use validate::{BalanceMismatch, validate_equivalence};
