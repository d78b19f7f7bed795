//! Named counters for session statistics.

use std::collections::BTreeMap;

/// A fixed set of named counters.
///
/// Counters must be declared up front; updates to unknown names are ignored.
/// Snapshots iterate in name order.
#[derive(Clone, Debug, Default)]
pub struct StatsCounter {
    counters: BTreeMap<&'static str, u64>,
}

impl StatsCounter {
    pub fn new(names: &[&'static str]) -> Self {
        Self {
            counters: names.iter().map(|&name| (name, 0)).collect(),
        }
    }

    pub fn increment(&mut self, name: &str) {
        self.add(name, 1);
    }

    pub fn add(&mut self, name: &str, value: u64) {
        if let Some(counter) = self.counters.get_mut(name) {
            *counter = counter.saturating_add(value);
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn snapshot(&self) -> Vec<(&'static str, u64)> {
        self.counters.iter().map(|(&k, &v)| (k, v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_declared_names_only() {
        let mut stats = StatsCounter::new(&["executed", "refused"]);
        stats.increment("executed");
        stats.add("executed", 2);
        stats.increment("unknown");
        assert_eq!(stats.get("executed"), 3);
        assert_eq!(stats.get("refused"), 0);
        assert_eq!(stats.get("unknown"), 0);
        assert_eq!(stats.snapshot(), vec![("executed", 3), ("refused", 0)]);
    }
}
