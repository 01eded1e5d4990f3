//! Author-declared permissions and the one-time identity check.

use crate::capability::CapabilitySet;
use crate::error::HookError;
use crate::event::LifecycleEvent;
use serde::{Deserialize, Serialize};
use tessera_types::Address;

/// What a module author claims the module implements, one flag per lifecycle event.
///
/// Checked against the module's identity once, when it is registered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionDescriptor {
    pub before_initialize: bool,
    pub after_initialize: bool,
    pub before_quorum_calculation: bool,
    pub after_quorum_calculation: bool,
    pub before_vote: bool,
    pub after_vote: bool,
    pub before_vote_succeeded: bool,
    pub after_vote_succeeded: bool,
    pub before_propose: bool,
    pub after_propose: bool,
    pub before_cancel: bool,
    pub after_cancel: bool,
    pub before_queue: bool,
    pub after_queue: bool,
    pub before_execute: bool,
    pub after_execute: bool,
}

impl PermissionDescriptor {
    pub fn get(&self, event: LifecycleEvent) -> bool {
        match event {
            LifecycleEvent::BeforeInitialize => self.before_initialize,
            LifecycleEvent::AfterInitialize => self.after_initialize,
            LifecycleEvent::BeforeQuorumCalculation => self.before_quorum_calculation,
            LifecycleEvent::AfterQuorumCalculation => self.after_quorum_calculation,
            LifecycleEvent::BeforeVote => self.before_vote,
            LifecycleEvent::AfterVote => self.after_vote,
            LifecycleEvent::BeforeVoteSucceeded => self.before_vote_succeeded,
            LifecycleEvent::AfterVoteSucceeded => self.after_vote_succeeded,
            LifecycleEvent::BeforePropose => self.before_propose,
            LifecycleEvent::AfterPropose => self.after_propose,
            LifecycleEvent::BeforeCancel => self.before_cancel,
            LifecycleEvent::AfterCancel => self.after_cancel,
            LifecycleEvent::BeforeQueue => self.before_queue,
            LifecycleEvent::AfterQueue => self.after_queue,
            LifecycleEvent::BeforeExecute => self.before_execute,
            LifecycleEvent::AfterExecute => self.after_execute,
        }
    }

    pub fn set(&mut self, event: LifecycleEvent, enabled: bool) {
        let slot = match event {
            LifecycleEvent::BeforeInitialize => &mut self.before_initialize,
            LifecycleEvent::AfterInitialize => &mut self.after_initialize,
            LifecycleEvent::BeforeQuorumCalculation => &mut self.before_quorum_calculation,
            LifecycleEvent::AfterQuorumCalculation => &mut self.after_quorum_calculation,
            LifecycleEvent::BeforeVote => &mut self.before_vote,
            LifecycleEvent::AfterVote => &mut self.after_vote,
            LifecycleEvent::BeforeVoteSucceeded => &mut self.before_vote_succeeded,
            LifecycleEvent::AfterVoteSucceeded => &mut self.after_vote_succeeded,
            LifecycleEvent::BeforePropose => &mut self.before_propose,
            LifecycleEvent::AfterPropose => &mut self.after_propose,
            LifecycleEvent::BeforeCancel => &mut self.before_cancel,
            LifecycleEvent::AfterCancel => &mut self.after_cancel,
            LifecycleEvent::BeforeQueue => &mut self.before_queue,
            LifecycleEvent::AfterQueue => &mut self.after_queue,
            LifecycleEvent::BeforeExecute => &mut self.before_execute,
            LifecycleEvent::AfterExecute => &mut self.after_execute,
        };
        *slot = enabled;
    }

    /// Builder-style [`set`](Self::set) to `true`.
    pub fn with(mut self, event: LifecycleEvent) -> Self {
        self.set(event, true);
        self
    }

    pub fn capabilities(&self) -> CapabilitySet {
        LifecycleEvent::ALL
            .into_iter()
            .filter(|e| self.get(*e))
            .collect()
    }
}

impl From<CapabilitySet> for PermissionDescriptor {
    fn from(caps: CapabilitySet) -> Self {
        caps.events()
            .fold(Self::default(), |desc, event| desc.with(event))
    }
}

/// Check that `identity` encodes exactly the permissions in `descriptor`.
///
/// Fails with [`HookError::HookAddressNotValid`] on the first event whose declared
/// flag disagrees with the identity's bit, or when a non-zero identity encodes no
/// capability at all. The zero identity with an empty descriptor is always valid.
/// On success the verified set is returned for caching.
pub fn validate_capabilities(
    identity: &Address,
    descriptor: &PermissionDescriptor,
) -> Result<CapabilitySet, HookError> {
    let encoded = CapabilitySet::from_identity(identity);
    for event in LifecycleEvent::ALL {
        if descriptor.get(event) != encoded.implements(event) {
            return Err(HookError::HookAddressNotValid {
                identity: *identity,
                event: Some(event),
            });
        }
    }
    if !identity.is_zero() && encoded.is_empty() {
        return Err(HookError::HookAddressNotValid {
            identity: *identity,
            event: None,
        });
    }
    Ok(encoded)
}
