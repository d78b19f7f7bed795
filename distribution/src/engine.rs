//! Core distribution engine.

use rlp_cap_table::CapTable;
use rlp_ledger::{Ledger, LedgerRecord};
use rlp_types::{Amount, EventId, Share, Timestamp};
use serde::Serialize;

/// Note attached to a payout record, e.g. `Salary Share (20.0%)`.
pub fn payout_note(share: Share) -> String {
    format!("Salary Share ({}%)", share.percent_label())
}

/// The output of one distribution event.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Distribution {
    pub event: EventId,
    pub income: LedgerRecord,
    /// One payout per Active stakeholder, in cap-table order.
    pub payouts: Vec<LedgerRecord>,
    /// Sum of all payouts: `amount × total_active_share`.
    pub total_distributed: Amount,
}

impl Distribution {
    /// The records to append to the ledger: the income first, then payouts.
    pub fn records(&self) -> impl Iterator<Item = &LedgerRecord> {
        std::iter::once(&self.income).chain(self.payouts.iter())
    }

    pub fn into_records(self) -> impl Iterator<Item = LedgerRecord> {
        std::iter::once(self.income).chain(self.payouts)
    }

    pub fn amount(&self) -> Amount {
        self.income.amount
    }

    /// Append the income record and every payout to `ledger` as one group.
    ///
    /// Returns the number of records appended.
    pub fn append_to(self, ledger: &mut Ledger) -> usize {
        ledger.append(self.into_records())
    }
}

/// The distribution engine: assigns event ids and splits revenue.
///
/// Holds no reference to the cap table or ledger; both are passed in per
/// call by the session that owns them.
#[derive(Debug)]
pub struct DistributionEngine {
    next_event: EventId,
}

impl DistributionEngine {
    pub fn new() -> Self {
        Self {
            next_event: EventId::FIRST,
        }
    }

    /// Resume numbering after a given event id.
    pub fn starting_after(last: EventId) -> Self {
        Self {
            next_event: last.next().unwrap_or(last),
        }
    }

    /// The id the next distribution will carry.
    pub fn peek_event(&self) -> EventId {
        self.next_event
    }

    /// Split `amount` across the Active stakeholders of `cap_table`.
    ///
    /// Every record produced shares the timestamp `now` and a fresh event id.
    /// The cap table is not checked: with an invalid allocation the payouts
    /// still sum to `amount × total_active_share`.
    pub fn distribute(
        &mut self,
        cap_table: &CapTable,
        amount: Amount,
        note: &str,
        now: Timestamp,
    ) -> Distribution {
        let event = self.next_event;
        // Saturate at u64::MAX rather than wrap; unreachable in practice.
        self.next_event = event.next().unwrap_or(event);

        let income = LedgerRecord::income(event, now, amount, note);

        let mut payouts = Vec::with_capacity(cap_table.active_count());
        let mut total_distributed = Amount::ZERO;
        for member in cap_table.active() {
            let payout = amount * member.share;
            payouts.push(LedgerRecord::payout(
                event,
                now,
                member.name.clone(),
                payout,
                payout_note(member.share),
            ));
            total_distributed += payout;
        }

        tracing::debug!(
            %event,
            %amount,
            payouts = payouts.len(),
            %total_distributed,
            "distribution computed"
        );

        Distribution {
            event,
            income,
            payouts,
            total_distributed,
        }
    }
}

impl Default for DistributionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rlp_cap_table::{StakeholderEntry, Status};
    use rlp_ledger::{RecordKind, INCOME_SOURCE, REVENUE_ROUTER};

    fn amounts(d: &Distribution) -> Vec<f64> {
        d.payouts.iter().map(|p| p.amount.value()).collect()
    }

    fn now() -> Timestamp {
        Timestamp::from_secs(1_700_000_000)
    }

    #[test]
    fn unit_payment_over_default_roster() {
        let mut engine = DistributionEngine::new();
        let d = engine.distribute(&CapTable::default_roster(), Amount::new(1.0), "inv", now());
        assert_eq!(amounts(&d), vec![0.20, 0.15, 0.05, 0.60]);
        assert_eq!(d.total_distributed, Amount::new(1.0));
    }

    #[test]
    fn fractional_payment_over_default_roster() {
        let mut engine = DistributionEngine::new();
        let d = engine.distribute(&CapTable::default_roster(), Amount::new(2.5), "inv", now());
        assert_eq!(amounts(&d), vec![0.50, 0.375, 0.125, 1.50]);
        assert_eq!(d.total_distributed, Amount::new(2.5));
    }

    #[test]
    fn income_and_payout_records_are_well_formed() {
        let mut engine = DistributionEngine::new();
        let d = engine.distribute(
            &CapTable::default_roster(),
            Amount::new(1.0),
            "Invoice #1024 - Consulting",
            now(),
        );

        assert_eq!(d.income.kind, RecordKind::Income);
        assert_eq!(d.income.from, INCOME_SOURCE);
        assert_eq!(d.income.to, REVENUE_ROUTER);
        assert_eq!(d.income.note, "Invoice #1024 - Consulting");
        assert_eq!(d.income.amount, Amount::new(1.0));

        let names: Vec<&str> = d.payouts.iter().map(|p| p.to.as_str()).collect();
        assert_eq!(names, ["Alice", "Bob", "Charlie", "Company Vault"]);
        assert!(d.payouts.iter().all(|p| p.kind == RecordKind::Payout));
        assert!(d.payouts.iter().all(|p| p.from == REVENUE_ROUTER));
        assert_eq!(d.payouts[0].note, "Salary Share (20.0%)");
        assert_eq!(d.payouts[3].note, "Salary Share (60.0%)");
        assert!(d.records().all(|r| r.timestamp == now() && r.event == d.event));
    }

    #[test]
    fn inactive_members_receive_nothing() {
        let mut table = CapTable::default_roster();
        table.set_status(2, Status::Inactive).unwrap();

        let mut engine = DistributionEngine::new();
        let d = engine.distribute(&table, Amount::new(1.0), "inv", now());
        assert_eq!(d.payouts.len(), 3);
        assert!(d.payouts.iter().all(|p| p.to != "Charlie"));
        // no gating: the missing 5% stays undistributed
        assert!((d.total_distributed.value() - 0.95).abs() < 1e-12);
    }

    #[test]
    fn append_to_writes_income_then_payouts() {
        let mut engine = DistributionEngine::new();
        let mut ledger = Ledger::new();
        let first = engine.distribute(&CapTable::default_roster(), Amount::new(1.0), "a", now());
        let first_event = first.event;
        assert_eq!(first.append_to(&mut ledger), 5);

        let second = engine.distribute(&CapTable::default_roster(), Amount::new(2.0), "b", now());
        let expected: Vec<LedgerRecord> = second.records().cloned().collect();
        assert_eq!(second.append_to(&mut ledger), 5);

        assert_eq!(ledger.len(), 10);
        assert_eq!(ledger.records()[0].event, first_event);
        assert!(ledger.records()[0].is_income());
        assert_eq!(&ledger.records()[5..], expected.as_slice());
        assert_eq!(ledger.income_volume(), Amount::new(3.0));
    }

    #[test]
    fn empty_table_yields_no_payouts() {
        let mut engine = DistributionEngine::new();
        let d = engine.distribute(&CapTable::new(), Amount::new(3.0), "inv", now());
        assert!(d.payouts.is_empty());
        assert_eq!(d.total_distributed, Amount::ZERO);
        assert_eq!(d.into_records().count(), 1);
    }

    #[test]
    fn event_ids_increase_per_call() {
        let mut engine = DistributionEngine::new();
        let table = CapTable::default_roster();
        let a = engine.distribute(&table, Amount::new(1.0), "a", now());
        let b = engine.distribute(&table, Amount::new(1.0), "b", now());
        assert_eq!(a.event, EventId::FIRST);
        assert_eq!(b.event, EventId::new(2));
        assert_eq!(engine.peek_event(), EventId::new(3));
    }

    #[test]
    fn cap_table_is_not_mutated() {
        let table = CapTable::from_entries(vec![StakeholderEntry::new(
            "Solo",
            "Dana",
            "bc1q...Dana",
            Share::WHOLE,
        )]);
        let before = table.clone();
        DistributionEngine::new().distribute(&table, Amount::new(4.0), "x", now());
        assert_eq!(table, before);
    }

    #[test]
    fn starting_after_resumes_numbering() {
        let engine = DistributionEngine::starting_after(EventId::new(41));
        assert_eq!(engine.peek_event(), EventId::new(42));
    }
}
