//! Fundamental types for the RLP (Revenue Labor Protocol) simulator.
//!
//! This crate defines the scalar types shared across every other crate in the
//! workspace: amounts, share fractions, timestamps, event identifiers, wallet
//! addresses and the clock abstraction.

pub mod address;
pub mod amount;
pub mod clock;
pub mod error;
pub mod event;
pub mod share;
pub mod time;

pub use address::WalletAddress;
pub use amount::Amount;
pub use clock::{Clock, SystemClock};
pub use error::TypesError;
pub use event::EventId;
pub use share::Share;
pub use time::Timestamp;
