//! The cap table and its allocation validator.

use crate::error::CapTableError;
use crate::stakeholder::{StakeholderEdit, StakeholderEntry, Status};
use rlp_types::Share;
use serde::{Deserialize, Serialize};

/// Default absolute tolerance when checking that Active shares sum to 1.0.
///
/// Repeated fractional shares accumulate rounding error, so an exact
/// equality gate would refuse logically-complete tables. Set the tolerance
/// to `0.0` to require exact equality.
pub const DEFAULT_ALLOCATION_TOLERANCE: f64 = 1e-9;

/// Sum of `share` over Active entries, in table order.
pub fn total_active_share<'a, I>(entries: I) -> f64
where
    I: IntoIterator<Item = &'a StakeholderEntry>,
{
    entries
        .into_iter()
        .filter(|e| e.is_active())
        .fold(0.0, |acc, e| acc + e.share.fraction())
}

/// Ordered list of stakeholders. Row order is the payout order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapTable {
    entries: Vec<StakeholderEntry>,
}

impl CapTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<StakeholderEntry>) -> Self {
        Self { entries }
    }

    /// The roster a fresh session starts with: 20/15/5/60 across four
    /// Active stakeholders.
    pub fn default_roster() -> Self {
        let row = |role: &str, name: &str, wallet: &str, share: f64| {
            StakeholderEntry::new(role, name, wallet, Share::new(share).unwrap_or(Share::ZERO))
        };
        Self::from_entries(vec![
            row("Founder", "Alice", "bc1q...Alice", 0.20),
            row("Dev", "Bob", "bc1q...Bob", 0.15),
            row("Ops", "Charlie", "bc1q...Char", 0.05),
            row("Reserve", "Company Vault", "bc1q...Vault", 0.60),
        ])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StakeholderEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[StakeholderEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&StakeholderEntry> {
        self.entries.get(index)
    }

    /// Active entries, in table order.
    pub fn active(&self) -> impl Iterator<Item = &StakeholderEntry> {
        self.entries.iter().filter(|e| e.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// See [`total_active_share`].
    pub fn total_active_share(&self) -> f64 {
        total_active_share(&self.entries)
    }

    /// Check the allocation invariant: Active shares sum to 1.0 within
    /// `tolerance`.
    pub fn validate(&self, tolerance: f64) -> Result<(), CapTableError> {
        let total = self.total_active_share();
        if (total - 1.0).abs() <= tolerance {
            Ok(())
        } else {
            Err(CapTableError::InvalidAllocation { total })
        }
    }

    /// Append a row at the end of the table.
    pub fn push(&mut self, entry: StakeholderEntry) {
        tracing::debug!(name = %entry.name, share = %entry.share, "cap table row added");
        self.entries.push(entry);
    }

    /// Remove a row, shifting later rows up.
    pub fn remove(&mut self, index: usize) -> Result<StakeholderEntry, CapTableError> {
        self.check_index(index)?;
        let removed = self.entries.remove(index);
        tracing::debug!(index, name = %removed.name, "cap table row removed");
        Ok(removed)
    }

    /// Apply a partial edit to a row and return the updated row.
    pub fn update(
        &mut self,
        index: usize,
        edit: StakeholderEdit,
    ) -> Result<&StakeholderEntry, CapTableError> {
        self.check_index(index)?;
        let entry = &mut self.entries[index];
        edit.apply(entry);
        tracing::debug!(index, name = %entry.name, status = %entry.status, "cap table row updated");
        Ok(entry)
    }

    pub fn set_status(&mut self, index: usize, status: Status) -> Result<(), CapTableError> {
        self.update(
            index,
            StakeholderEdit {
                status: Some(status),
                ..Default::default()
            },
        )
        .map(|_| ())
    }

    fn check_index(&self, index: usize) -> Result<(), CapTableError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(CapTableError::RowNotFound {
                index,
                len: self.entries.len(),
            })
        }
    }
}

impl<'a> IntoIterator for &'a CapTable {
    type Item = &'a StakeholderEntry;
    type IntoIter = std::slice::Iter<'a, StakeholderEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<StakeholderEntry> for CapTable {
    fn from_iter<T: IntoIterator<Item = StakeholderEntry>>(iter: T) -> Self {
        Self::from_entries(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share(f: f64) -> Share {
        Share::new(f).unwrap()
    }

    #[test]
    fn default_roster_sums_to_one() {
        let table = CapTable::default_roster();
        assert_eq!(table.len(), 4);
        assert_eq!(table.total_active_share(), 1.0);
        assert!(table.validate(0.0).is_ok());
    }

    #[test]
    fn inactive_row_breaks_allocation() {
        let mut table = CapTable::default_roster();
        table.set_status(2, Status::Inactive).unwrap();
        let total = table.total_active_share();
        assert!((total - 0.95).abs() < 1e-12);
        assert_eq!(
            table.validate(DEFAULT_ALLOCATION_TOLERANCE),
            Err(CapTableError::InvalidAllocation { total })
        );
        assert_eq!(table.active_count(), 3);
    }

    #[test]
    fn empty_table_is_refused() {
        let table = CapTable::new();
        assert_eq!(table.total_active_share(), 0.0);
        assert!(matches!(
            table.validate(DEFAULT_ALLOCATION_TOLERANCE),
            Err(CapTableError::InvalidAllocation { total }) if total == 0.0
        ));
    }

    #[test]
    fn tolerance_accepts_rounding_error() {
        // ten rows of 0.1 accumulate to 0.9999999999999999
        let table: CapTable = (0..10)
            .map(|i| StakeholderEntry::new("Dev", format!("dev{i}"), "w", share(0.1)))
            .collect();
        assert_ne!(table.total_active_share(), 1.0);
        assert!(table.validate(0.0).is_err());
        assert!(table.validate(DEFAULT_ALLOCATION_TOLERANCE).is_ok());
    }

    #[test]
    fn total_active_share_is_idempotent() {
        let table = CapTable::default_roster();
        assert_eq!(table.total_active_share(), table.total_active_share());
    }

    #[test]
    fn remove_and_update_rows() {
        let mut table = CapTable::default_roster();
        let removed = table.remove(1).unwrap();
        assert_eq!(removed.name, "Bob");
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(1).unwrap().name, "Charlie");

        let updated = table
            .update(
                1,
                StakeholderEdit {
                    share: Some(share(0.20)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.share, share(0.20));
        assert_eq!(updated.name, "Charlie");
        assert!(table.validate(DEFAULT_ALLOCATION_TOLERANCE).is_ok());
    }

    #[test]
    fn out_of_range_index_is_reported() {
        let mut table = CapTable::default_roster();
        assert_eq!(
            table.remove(7),
            Err(CapTableError::RowNotFound { index: 7, len: 4 })
        );
        assert!(table.set_status(4, Status::Inactive).is_err());
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("inactive".parse::<Status>().unwrap(), Status::Inactive);
        assert_eq!("Active".parse::<Status>().unwrap(), Status::Active);
        assert!("paused".parse::<Status>().is_err());
    }
}
