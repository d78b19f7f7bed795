use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Active shares do not sum to 100%; nothing was distributed.
    #[error("cannot execute: cap table allocation is {}%, must equal 100%", .total * 100.0)]
    InvalidAllocation { total: f64 },

    #[error("cap table error: {0}")]
    CapTable(#[from] rlp_cap_table::CapTableError),

    #[error("ledger error: {0}")]
    Ledger(#[from] rlp_ledger::LedgerError),

    #[error("config error: {0}")]
    Config(String),
}
