//! Multi-currency rounding helpers.

pub mod rounding;

pub use rounding::{convert, fractional_digits, round_half_even, unit};
