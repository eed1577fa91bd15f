//! Shared value types, error type, and fixed-point helpers used across the crate.

pub mod color;
pub mod core;
pub mod error;
pub(crate) mod math;
