//! Cap table: the ordered roster of stakeholders and their claims on revenue.
//!
//! The table is edited directly by the session owner (add, remove, update
//! rows). Before a distribution executes, the caller gates on
//! [`CapTable::validate`]: the shares of all Active stakeholders must sum to
//! one whole. The distribution engine itself never validates.

pub mod error;
pub mod stakeholder;
pub mod table;

pub use error::CapTableError;
pub use stakeholder::{StakeholderEdit, StakeholderEntry, Status};
pub use table::{total_active_share, CapTable, DEFAULT_ALLOCATION_TOLERANCE};
