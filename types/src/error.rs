//! Errors raised when constructing the scalar types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypesError {
    #[error("share must be a finite fraction in [0, 1], got {0}")]
    ShareOutOfRange(f64),

    #[error("amount must be a finite number, got {0}")]
    NonFiniteAmount(f64),

    #[error("invalid status: {0}")]
    InvalidStatus(String),
}
