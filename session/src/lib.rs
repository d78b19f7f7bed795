//! RLP session: the explicit application state of one simulator run.
//!
//! A [`Session`] owns the cap table, the ledger and the distribution engine.
//! Every user action (editing the cap table, executing a distribution,
//! exporting the ledger) goes through it and runs to completion before the
//! next one starts:
//!
//! 1. the allocation invariant is checked (Active shares sum to 100%)
//! 2. the engine splits the payment
//! 3. the income record and all payouts are appended to the ledger
//! 4. subscribers are notified via the [`EventBus`]

pub mod config;
pub mod error;
pub mod event;
pub mod session;

pub use config::SessionConfig;
pub use error::SessionError;
pub use event::{CapTableChange, EventBus, SessionEvent};
pub use session::{Receipt, Session, SessionSummary};
