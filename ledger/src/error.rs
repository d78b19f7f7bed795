use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger export failed: {0}")]
    Export(#[from] std::io::Error),
}
