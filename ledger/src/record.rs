//! Ledger records.

use rlp_types::{Amount, EventId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Counterparty name on the sending side of every Income record.
pub const INCOME_SOURCE: &str = "Client";

/// The router account: receives income, sends payouts.
pub const REVENUE_ROUTER: &str = "Revenue Router";

/// Whether money entered the router or left it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordKind {
    Income,
    Payout,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Payout => "PAYOUT",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable ledger line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub timestamp: Timestamp,
    pub kind: RecordKind,
    pub from: String,
    pub to: String,
    pub amount: Amount,
    pub note: String,
    /// The distribution event this record belongs to.
    pub event: EventId,
}

impl LedgerRecord {
    /// Money entering the router from the client.
    pub fn income(
        event: EventId,
        timestamp: Timestamp,
        amount: Amount,
        note: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            kind: RecordKind::Income,
            from: INCOME_SOURCE.to_string(),
            to: REVENUE_ROUTER.to_string(),
            amount,
            note: note.into(),
            event,
        }
    }

    /// One stakeholder's cut of an income, sent from the router.
    pub fn payout(
        event: EventId,
        timestamp: Timestamp,
        to: impl Into<String>,
        amount: Amount,
        note: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            kind: RecordKind::Payout,
            from: REVENUE_ROUTER.to_string(),
            to: to.into(),
            amount,
            note: note.into(),
            event,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == RecordKind::Income
    }

    pub fn is_payout(&self) -> bool {
        self.kind == RecordKind::Payout
    }
}
