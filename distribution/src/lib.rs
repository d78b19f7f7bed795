//! Distribution engine: the revenue router.
//!
//! Given a cap table and an incoming amount, the engine produces one Income
//! record and one Payout record per Active stakeholder:
//! `payout(s) = amount × share(s)`.
//!
//! The engine is total: it never validates the cap table and never fails.
//! Gating on the allocation invariant belongs to the caller, as does
//! appending the produced records to the ledger.

pub mod engine;

pub use engine::{payout_note, Distribution, DistributionEngine};
