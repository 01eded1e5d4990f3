//! Capability masks derived from module identities.

use crate::event::LifecycleEvent;
use tessera_types::Address;

bitflags::bitflags! {
    /// The set of lifecycle events a module implements.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CapabilitySet: u16 {
        const AFTER_EXECUTE = 1 << 0;
        const BEFORE_EXECUTE = 1 << 1;
        const AFTER_QUEUE = 1 << 2;
        const BEFORE_QUEUE = 1 << 3;
        const AFTER_CANCEL = 1 << 4;
        const BEFORE_CANCEL = 1 << 5;
        const AFTER_PROPOSE = 1 << 6;
        const BEFORE_PROPOSE = 1 << 7;
        const AFTER_VOTE = 1 << 8;
        const BEFORE_VOTE = 1 << 9;
        const AFTER_QUORUM_CALCULATION = 1 << 10;
        const BEFORE_QUORUM_CALCULATION = 1 << 11;
        const AFTER_INITIALIZE = 1 << 12;
        const BEFORE_INITIALIZE = 1 << 13;
        const AFTER_VOTE_SUCCEEDED = 1 << 14;
        const BEFORE_VOTE_SUCCEEDED = 1 << 15;
    }
}

impl CapabilitySet {
    /// The capabilities encoded in the low 16 bits of `identity`.
    ///
    /// The zero identity encodes nothing.
    pub fn from_identity(identity: &Address) -> Self {
        Self::from_bits_truncate(identity.low_u16())
    }

    /// The single-event set for `event`.
    pub fn of(event: LifecycleEvent) -> Self {
        Self::from_bits_truncate(event.mask())
    }

    pub fn implements(&self, event: LifecycleEvent) -> bool {
        self.contains(Self::of(event))
    }

    /// The events in this set, highest bit first.
    pub fn events(&self) -> impl Iterator<Item = LifecycleEvent> + '_ {
        LifecycleEvent::ALL
            .into_iter()
            .filter(move |e| self.implements(*e))
    }
}

impl FromIterator<LifecycleEvent> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = LifecycleEvent>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |acc, e| acc | Self::of(e))
    }
}

/// Whether `identity` encodes `event`. Pure and total.
pub fn has_capability(identity: &Address, event: LifecycleEvent) -> bool {
    identity.low_u16() & event.mask() != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_line_up_with_event_bits() {
        for event in LifecycleEvent::ALL {
            assert_eq!(CapabilitySet::of(event).bits(), event.mask());
        }
        assert_eq!(
            CapabilitySet::of(LifecycleEvent::BeforeQuorumCalculation),
            CapabilitySet::BEFORE_QUORUM_CALCULATION
        );
        assert_eq!(
            CapabilitySet::of(LifecycleEvent::AfterExecute),
            CapabilitySet::AFTER_EXECUTE
        );
    }

    #[test]
    fn identity_low_bits_define_capabilities() {
        let identity = Address::from_low_u64(0xaaaa_0000).with_low_u16(
            CapabilitySet::AFTER_PROPOSE.bits() | CapabilitySet::BEFORE_VOTE.bits(),
        );
        let caps = CapabilitySet::from_identity(&identity);
        assert!(caps.implements(LifecycleEvent::AfterPropose));
        assert!(caps.implements(LifecycleEvent::BeforeVote));
        assert!(!caps.implements(LifecycleEvent::BeforePropose));
        assert!(has_capability(&identity, LifecycleEvent::BeforeVote));
        assert!(!has_capability(&identity, LifecycleEvent::AfterExecute));
    }

    #[test]
    fn zero_identity_implements_nothing() {
        assert!(CapabilitySet::from_identity(&Address::ZERO).is_empty());
        for event in LifecycleEvent::ALL {
            assert!(!has_capability(&Address::ZERO, event));
        }
    }

    #[test]
    fn collect_and_iterate() {
        let caps: CapabilitySet = [LifecycleEvent::BeforeQueue, LifecycleEvent::AfterQueue]
            .into_iter()
            .collect();
        let events: Vec<_> = caps.events().collect();
        assert_eq!(events, vec![LifecycleEvent::BeforeQueue, LifecycleEvent::AfterQueue]);
    }
}
