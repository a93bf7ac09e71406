//! Journal domain types.
//!
//! This module defines the generic ledger model the engine consumes and the
//! backend-compliant shape it produces:
//! - Line items (signed amounts with arbitrary-precision FX rates)
//! - Journal transactions
//! - Sub-transactions with back-references to their origin
//! - Chart of accounts metadata

pub mod chart;
pub mod item;
pub mod subtxn;
pub mod transaction;

pub use chart::{AccountChart, AccountInfo};
pub use item::LineItem;
pub use subtxn::{COMPENSATING_DESCRIPTION, RESIDUAL_DESCRIPTION, SourceRef, SubTransaction};
pub use transaction::LedgerTransaction;
