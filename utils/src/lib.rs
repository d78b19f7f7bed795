//! Shared utilities for the RLP simulator.

pub mod logging;
pub mod stats;

pub use logging::{init_tracing, LogFormat, LoggingError};
pub use stats::StatsCounter;
