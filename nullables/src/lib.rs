//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies (currently only wall-clock time) are abstracted
//! behind traits in `rlp-types`. This crate provides test-friendly
//! implementations that return deterministic values and can be controlled
//! programmatically.

pub mod clock;

pub use clock::NullClock;
