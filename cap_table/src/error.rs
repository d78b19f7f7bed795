use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CapTableError {
    /// Active shares do not add up to 100%. Distribution is refused.
    #[error("allocation must equal 100%, current: {}%", .total * 100.0)]
    InvalidAllocation { total: f64 },

    #[error("cap table row {index} not found (table has {len} rows)")]
    RowNotFound { index: usize, len: usize },

    #[error(transparent)]
    Types(#[from] rlp_types::TypesError),
}
