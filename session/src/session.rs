//! The session struct: owns every piece of mutable state of one run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rlp_cap_table::{CapTable, CapTableError, StakeholderEdit, StakeholderEntry, Status};
use rlp_distribution::DistributionEngine;
use rlp_ledger::Ledger;
use rlp_types::{Amount, Clock, EventId, SystemClock, Timestamp};
use rlp_utils::StatsCounter;
use serde::Serialize;

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::event::{CapTableChange, EventBus, SessionEvent};

const STAT_EXECUTED: &str = "distributions_executed";
const STAT_REFUSED: &str = "distributions_refused";
const STAT_EDITS: &str = "cap_table_edits";

/// Result of a successful distribution.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Receipt {
    pub event: EventId,
    pub timestamp: Timestamp,
    pub amount: Amount,
    pub distributed: Amount,
    /// Number of payout records appended.
    pub payouts: usize,
}

impl Receipt {
    /// User-facing confirmation line.
    pub fn describe(&self, unit: &str) -> String {
        format!(
            "Successfully bridged {} {unit} to {} wallets!",
            self.distributed, self.payouts
        )
    }
}

/// Headline numbers for the session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSummary {
    pub total_active_share: f64,
    pub allocation_ok: bool,
    pub stakeholders: usize,
    pub active_stakeholders: usize,
    pub income_volume: Amount,
    pub payout_volume: Amount,
    pub distributions: u64,
    pub refused: u64,
    pub records: usize,
}

/// One interactive simulator session.
///
/// The cap table is changed only through the edit methods; the ledger only
/// through [`Session::execute_distribution`].
pub struct Session<C = SystemClock> {
    config: SessionConfig,
    cap_table: CapTable,
    ledger: Ledger,
    engine: DistributionEngine,
    events: EventBus,
    stats: StatsCounter,
    clock: C,
}

impl Session<SystemClock> {
    /// A session driven by the system clock.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Session<C> {
    pub fn with_clock(config: SessionConfig, clock: C) -> Self {
        let cap_table = config.cap_table();
        tracing::debug!(
            stakeholders = cap_table.len(),
            tolerance = config.allocation_tolerance,
            "session created"
        );
        Self {
            config,
            cap_table,
            ledger: Ledger::new(),
            engine: DistributionEngine::new(),
            events: EventBus::new(),
            stats: StatsCounter::new(&[STAT_EXECUTED, STAT_REFUSED, STAT_EDITS]),
            clock,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn cap_table(&self) -> &CapTable {
        &self.cap_table
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn stats(&self) -> &StatsCounter {
        &self.stats
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&SessionEvent)>) {
        self.events.subscribe(listener);
    }

    // ── Cap table edits ────────────────────────────────────────────────

    /// Append a stakeholder; returns its row index.
    pub fn add_stakeholder(&mut self, entry: StakeholderEntry) -> usize {
        let name = entry.name.clone();
        self.cap_table.push(entry);
        let index = self.cap_table.len() - 1;
        self.edited(CapTableChange::Added { index, name });
        index
    }

    pub fn remove_stakeholder(&mut self, index: usize) -> Result<StakeholderEntry, SessionError> {
        let removed = self.cap_table.remove(index)?;
        self.edited(CapTableChange::Removed {
            index,
            name: removed.name.clone(),
        });
        Ok(removed)
    }

    pub fn update_stakeholder(
        &mut self,
        index: usize,
        edit: StakeholderEdit,
    ) -> Result<(), SessionError> {
        let name = self.cap_table.update(index, edit)?.name.clone();
        self.edited(CapTableChange::Updated { index, name });
        Ok(())
    }

    pub fn set_status(&mut self, index: usize, status: Status) -> Result<(), SessionError> {
        self.update_stakeholder(
            index,
            StakeholderEdit {
                status: Some(status),
                ..Default::default()
            },
        )
    }

    /// Swap in a whole new table, as a bulk editor would.
    pub fn replace_cap_table(&mut self, cap_table: CapTable) {
        let rows = cap_table.len();
        self.cap_table = cap_table;
        self.edited(CapTableChange::Replaced { rows });
    }

    fn edited(&mut self, change: CapTableChange) {
        self.stats.increment(STAT_EDITS);
        tracing::debug!(?change, total_active_share = self.cap_table.total_active_share(), "cap table edited");
        self.events.emit(&SessionEvent::CapTableEdited(change));
    }

    // ── Distribution ───────────────────────────────────────────────────

    pub fn total_active_share(&self) -> f64 {
        self.cap_table.total_active_share()
    }

    /// Whether the allocation invariant currently holds.
    pub fn allocation_ok(&self) -> bool {
        self.cap_table
            .validate(self.config.allocation_tolerance)
            .is_ok()
    }

    /// Split an incoming payment across the Active stakeholders and record it.
    ///
    /// Refused with [`SessionError::InvalidAllocation`] when the Active shares
    /// do not sum to 100%; the ledger is left untouched in that case. On
    /// success one Income record and one Payout per Active stakeholder are
    /// appended, all stamped with the same timestamp, never earlier than the
    /// newest record already in the ledger.
    pub fn execute_distribution(
        &mut self,
        amount: Amount,
        note: &str,
    ) -> Result<Receipt, SessionError> {
        if let Err(err) = self.cap_table.validate(self.config.allocation_tolerance) {
            let total = match err {
                CapTableError::InvalidAllocation { total } => total,
                other => return Err(other.into()),
            };
            self.stats.increment(STAT_REFUSED);
            tracing::warn!(%amount, total_active_share = total, "distribution refused: allocation is not 100%");
            self.events.emit(&SessionEvent::DistributionRefused {
                amount,
                total_active_share: total,
            });
            return Err(SessionError::InvalidAllocation { total });
        }

        if self.config.processing_delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(self.config.processing_delay_ms));
        }

        let now = match self.ledger.latest_timestamp() {
            Some(latest) => self.clock.now().max(latest),
            None => self.clock.now(),
        };
        let distribution = self.engine.distribute(&self.cap_table, amount, note, now);
        let receipt = Receipt {
            event: distribution.event,
            timestamp: now,
            amount,
            distributed: distribution.total_distributed,
            payouts: distribution.payouts.len(),
        };
        distribution.append_to(&mut self.ledger);

        self.stats.increment(STAT_EXECUTED);
        tracing::info!(
            event = %receipt.event,
            %amount,
            distributed = %receipt.distributed,
            payouts = receipt.payouts,
            "distribution executed"
        );
        self.events.emit(&SessionEvent::DistributionExecuted {
            event: receipt.event,
            amount,
            distributed: receipt.distributed,
            payouts: receipt.payouts,
        });
        Ok(receipt)
    }

    // ── Reporting ──────────────────────────────────────────────────────

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            total_active_share: self.total_active_share(),
            allocation_ok: self.allocation_ok(),
            stakeholders: self.cap_table.len(),
            active_stakeholders: self.cap_table.active_count(),
            income_volume: self.ledger.income_volume(),
            payout_volume: self.ledger.payout_volume(),
            distributions: self.stats.get(STAT_EXECUTED),
            refused: self.stats.get(STAT_REFUSED),
            records: self.ledger.len(),
        }
    }

    /// Write the ledger as CSV to `path`, or to the configured export path.
    pub fn export_csv(&self, path: Option<&Path>) -> Result<PathBuf, SessionError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.export_path.clone());
        self.ledger.export_csv(&path)?;
        Ok(path)
    }
}
