//! Shared types for Ledgerbridge.
//!
//! This crate provides common types used across all other crates:
//! - Money values with decimal precision
//! - Currency codes
//! - Typed IDs for type-safe entity references

pub mod types;

pub use types::{AccountId, CurrencyCode, Money, TaxCodeId, TransactionId};
