//! Events emitted by the session for subscribers.

use rlp_types::{Amount, EventId};

/// What changed in the cap table.
#[derive(Clone, Debug, PartialEq)]
pub enum CapTableChange {
    Added { index: usize, name: String },
    Removed { index: usize, name: String },
    Updated { index: usize, name: String },
    /// The whole table was swapped for a new one.
    Replaced { rows: usize },
}

/// Session-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// A distribution ran and its records were appended to the ledger.
    DistributionExecuted {
        event: EventId,
        amount: Amount,
        distributed: Amount,
        payouts: usize,
    },
    /// A distribution was refused because the allocation is not 100%.
    DistributionRefused { amount: Amount, total_active_share: f64 },
    CapTableEdited(CapTableChange),
}

/// Synchronous fan-out event bus.
///
/// Listeners run inline on the caller's thread, after the state change they
/// describe has been applied.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&SessionEvent)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&SessionEvent)>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &SessionEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
