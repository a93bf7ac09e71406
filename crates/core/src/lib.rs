//! Core decomposition logic for Ledgerbridge.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! It rewrites multi-currency journal transactions into sequences the remote
//! accounting backend can represent, without changing any account balance.
//!
//! # Modules
//!
//! - `journal` - Journal domain types (transactions, line items, accounts)
//! - `currency` - Decimal rounding and rate application
//! - `decompose` - The transaction decomposition pipeline
//! - `engine` - Ledger capability trait and the decomposing write-path adapter

pub mod currency;
pub mod decompose;
pub mod engine;
pub mod journal;
