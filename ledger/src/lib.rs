//! Append-only transaction ledger.
//!
//! The ledger is the session's audit log: every distribution event appends
//! one Income record followed by one Payout record per Active stakeholder.
//! Records are never mutated or removed after insertion, and insertion order
//! is preserved.

pub mod error;
pub mod export;
pub mod ledger;
pub mod record;

pub use error::LedgerError;
pub use export::CSV_HEADER;
pub use ledger::{Ledger, LedgerSummary};
pub use record::{LedgerRecord, RecordKind, INCOME_SOURCE, REVENUE_ROUTER};
