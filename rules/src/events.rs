//! Change notifications emitted by the [`RuleStore`](crate::RuleStore).

use crate::proposal_type::ProposalType;
use tessera_types::{Address, ProposalTypeId, ScopeKey, Selector};

/// Rule-store events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleEvent {
    /// A proposal type was created or overwritten.
    ProposalTypeSet(ProposalType),
    /// A scope was appended under `(proposal_type_id, key)` at `index`.
    ScopeCreated {
        proposal_type_id: ProposalTypeId,
        key: ScopeKey,
        selector: Selector,
        index: usize,
        description: String,
    },
    ScopeDisabled {
        proposal_type_id: ProposalTypeId,
        key: ScopeKey,
        index: usize,
    },
    ScopeDeleted {
        proposal_type_id: ProposalTypeId,
        key: ScopeKey,
        index: usize,
    },
    AdminChanged {
        old: Address,
        new: Address,
    },
}

impl RuleEvent {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProposalTypeSet(_) => "proposal_type_set",
            Self::ScopeCreated { .. } => "scope_created",
            Self::ScopeDisabled { .. } => "scope_disabled",
            Self::ScopeDeleted { .. } => "scope_deleted",
            Self::AdminChanged { .. } => "admin_changed",
        }
    }
}

/// Observers of rule-store mutations, notified in subscription order.
///
/// Listeners run inline on the mutating call, after the mutation has been applied.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&RuleEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&RuleEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &RuleEvent) {
        tracing::trace!(
            event = event.kind(),
            listeners = self.listeners.len(),
            "rule event"
        );
        self.listeners.iter().for_each(|listener| listener(event));
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn emit_calls_all_listeners() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let c1 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));
        let c2 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        }));

        bus.emit(&RuleEvent::AdminChanged {
            old: Address::from_low_u64(1),
            new: Address::from_low_u64(2),
        });
        assert_eq!(counter.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn listeners_see_events_in_order() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut bus = EventBus::default();
        bus.subscribe(Box::new(move |e| sink.lock().unwrap().push(e.kind())));

        bus.emit(&RuleEvent::ScopeDisabled {
            proposal_type_id: 1,
            key: ScopeKey::ZERO,
            index: 0,
        });
        bus.emit(&RuleEvent::ScopeDeleted {
            proposal_type_id: 1,
            key: ScopeKey::ZERO,
            index: 0,
        });
        assert_eq!(*seen.lock().unwrap(), vec!["scope_disabled", "scope_deleted"]);
    }
}
