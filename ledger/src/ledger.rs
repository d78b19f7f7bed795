//! The session ledger: an ordered, append-only sequence of records.

use crate::record::{LedgerRecord, RecordKind};
use rlp_types::{Amount, EventId, Timestamp};
use serde::Serialize;
use std::cmp::Reverse;

/// Append-only, insertion-ordered record log.
///
/// Backed by a growable vector, so appending is amortised O(1) per record.
/// No mutable access to stored records is exposed.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    records: Vec<LedgerRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append records after all existing ones, preserving their order.
    ///
    /// Returns the number of records appended. Callers are responsible for
    /// supplying timestamps no earlier than [`Ledger::latest_timestamp`].
    pub fn append<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = LedgerRecord>,
    {
        let before = self.records.len();
        self.records.extend(records);
        let appended = self.records.len() - before;
        tracing::debug!(appended, total = self.records.len(), "ledger records appended");
        appended
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, LedgerRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[LedgerRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&LedgerRecord> {
        self.records.last()
    }

    /// Timestamp of the most recent record.
    pub fn latest_timestamp(&self) -> Option<Timestamp> {
        self.records.last().map(|r| r.timestamp)
    }

    /// Records sorted by timestamp, newest first. Records sharing a
    /// timestamp appear in reverse insertion order.
    pub fn newest_first(&self) -> Vec<&LedgerRecord> {
        let mut view: Vec<&LedgerRecord> = self.records.iter().rev().collect();
        view.sort_by_key(|r| Reverse(r.timestamp));
        view
    }

    /// All records produced by one distribution event, in insertion order.
    pub fn records_for(&self, event: EventId) -> impl Iterator<Item = &LedgerRecord> {
        self.records.iter().filter(move |r| r.event == event)
    }

    /// Total of all Income records to date.
    pub fn income_volume(&self) -> Amount {
        self.volume(RecordKind::Income)
    }

    /// Total of all Payout records to date.
    pub fn payout_volume(&self) -> Amount {
        self.volume(RecordKind::Payout)
    }

    fn volume(&self, kind: RecordKind) -> Amount {
        self.records
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.amount)
            .sum()
    }

    /// Total paid out per recipient, in the order recipients first appear.
    pub fn totals_by_recipient(&self) -> Vec<(String, Amount)> {
        let mut totals: Vec<(String, Amount)> = Vec::new();
        for record in self.records.iter().filter(|r| r.is_payout()) {
            match totals.iter_mut().find(|(name, _)| *name == record.to) {
                Some((_, total)) => *total += record.amount,
                None => totals.push((record.to.clone(), record.amount)),
            }
        }
        totals
    }

    /// Whether timestamps are non-decreasing in insertion order.
    pub fn is_time_ordered(&self) -> bool {
        self.records
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp)
    }

    /// Summary statistics for the ledger.
    pub fn summary(&self) -> LedgerSummary {
        let income_records = self.records.iter().filter(|r| r.is_income()).count();
        LedgerSummary {
            records: self.records.len(),
            income_records,
            payout_records: self.records.len() - income_records,
            income_volume: self.income_volume(),
            payout_volume: self.payout_volume(),
        }
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a LedgerRecord;
    type IntoIter = std::slice::Iter<'a, LedgerRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Summary statistics for the ledger.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub records: usize,
    pub income_records: usize,
    pub payout_records: usize,
    pub income_volume: Amount,
    pub payout_volume: Amount,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(micros: u64) -> Timestamp {
        Timestamp::from_micros(micros)
    }

    fn event_records(event: u64, at: u64, amount: f64) -> Vec<LedgerRecord> {
        let id = EventId::new(event);
        vec![
            LedgerRecord::income(id, ts(at), Amount::new(amount), "invoice"),
            LedgerRecord::payout(id, ts(at), "Alice", Amount::new(amount * 0.4), "40.0%"),
            LedgerRecord::payout(id, ts(at), "Bob", Amount::new(amount * 0.6), "60.0%"),
        ]
    }

    #[test]
    fn append_preserves_prior_order() {
        let mut ledger = Ledger::new();
        let first = event_records(1, 10, 1.0);
        let second = event_records(2, 20, 2.0);
        assert_eq!(ledger.append(first.clone()), 3);
        assert_eq!(ledger.append(second.clone()), 3);

        assert_eq!(&ledger.records()[..3], first.as_slice());
        assert_eq!(&ledger.records()[3..], second.as_slice());
        assert!(ledger.is_time_ordered());
    }

    #[test]
    fn appending_nothing_is_noop() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.append(Vec::new()), 0);
        assert!(ledger.is_empty());
        assert_eq!(ledger.latest_timestamp(), None);
    }

    #[test]
    fn newest_first_sorts_descending() {
        let mut ledger = Ledger::new();
        ledger.append(event_records(1, 10, 1.0));
        ledger.append(event_records(2, 20, 2.0));

        let view = ledger.newest_first();
        assert_eq!(view.len(), 6);
        assert_eq!(view[0].event, EventId::new(2));
        assert_eq!(view[0].to, "Bob");
        assert_eq!(view[2].kind, RecordKind::Income);
        assert_eq!(view[5].event, EventId::new(1));
        assert!(view.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[test]
    fn volumes_and_summary() {
        let mut ledger = Ledger::new();
        ledger.append(event_records(1, 10, 1.0));
        ledger.append(event_records(2, 20, 2.5));

        assert_eq!(ledger.income_volume(), Amount::new(3.5));
        let summary = ledger.summary();
        assert_eq!(summary.records, 6);
        assert_eq!(summary.income_records, 2);
        assert_eq!(summary.payout_records, 4);
        assert!((summary.payout_volume.value() - 3.5).abs() < 1e-12);
    }

    #[test]
    fn records_for_groups_by_event() {
        let mut ledger = Ledger::new();
        ledger.append(event_records(1, 10, 1.0));
        ledger.append(event_records(2, 20, 2.0));
        let group: Vec<_> = ledger.records_for(EventId::new(2)).collect();
        assert_eq!(group.len(), 3);
        assert!(group[0].is_income());
        assert!(group.iter().all(|r| r.event == EventId::new(2)));
    }

    #[test]
    fn totals_by_recipient_in_first_seen_order() {
        let mut ledger = Ledger::new();
        ledger.append(event_records(1, 10, 1.0));
        ledger.append(event_records(2, 20, 2.0));
        let totals = ledger.totals_by_recipient();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].0, "Alice");
        assert!((totals[0].1.value() - 1.2).abs() < 1e-12);
        assert_eq!(totals[1].0, "Bob");
        assert!((totals[1].1.value() - 1.8).abs() < 1e-12);
    }
}
