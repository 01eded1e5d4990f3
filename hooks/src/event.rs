//! The closed, ordered set of lifecycle events.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in a proposal's life at which a module may intercept.
///
/// The discriminant is the event's bit position in a module identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LifecycleEvent {
    AfterExecute = 0,
    BeforeExecute = 1,
    AfterQueue = 2,
    BeforeQueue = 3,
    AfterCancel = 4,
    BeforeCancel = 5,
    AfterPropose = 6,
    BeforePropose = 7,
    AfterVote = 8,
    BeforeVote = 9,
    AfterQuorumCalculation = 10,
    BeforeQuorumCalculation = 11,
    AfterInitialize = 12,
    BeforeInitialize = 13,
    AfterVoteSucceeded = 14,
    BeforeVoteSucceeded = 15,
}

impl LifecycleEvent {
    /// Every event, highest bit first (the order a proposal meets them, roughly).
    pub const ALL: [LifecycleEvent; 16] = [
        Self::BeforeVoteSucceeded,
        Self::AfterVoteSucceeded,
        Self::BeforeInitialize,
        Self::AfterInitialize,
        Self::BeforeQuorumCalculation,
        Self::AfterQuorumCalculation,
        Self::BeforeVote,
        Self::AfterVote,
        Self::BeforePropose,
        Self::AfterPropose,
        Self::BeforeCancel,
        Self::AfterCancel,
        Self::BeforeQueue,
        Self::AfterQueue,
        Self::BeforeExecute,
        Self::AfterExecute,
    ];

    /// Bit position of this event in a capability mask.
    pub fn bit(self) -> u8 {
        self as u8
    }

    /// Single-bit mask for this event.
    pub fn mask(self) -> u16 {
        1u16 << self.bit()
    }

    /// Read-only events are dispatched through [`GovernanceHook::on_view`];
    /// everything else may mutate module state.
    ///
    /// [`GovernanceHook::on_view`]: crate::GovernanceHook::on_view
    pub fn is_view(self) -> bool {
        matches!(
            self,
            Self::BeforeQuorumCalculation
                | Self::AfterQuorumCalculation
                | Self::BeforeVoteSucceeded
                | Self::AfterVoteSucceeded
        )
    }

    pub fn is_before(self) -> bool {
        self.bit() % 2 == 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::BeforeInitialize => "before_initialize",
            Self::AfterInitialize => "after_initialize",
            Self::BeforeQuorumCalculation => "before_quorum_calculation",
            Self::AfterQuorumCalculation => "after_quorum_calculation",
            Self::BeforeVote => "before_vote",
            Self::AfterVote => "after_vote",
            Self::BeforeVoteSucceeded => "before_vote_succeeded",
            Self::AfterVoteSucceeded => "after_vote_succeeded",
            Self::BeforePropose => "before_propose",
            Self::AfterPropose => "after_propose",
            Self::BeforeCancel => "before_cancel",
            Self::AfterCancel => "after_cancel",
            Self::BeforeQueue => "before_queue",
            Self::AfterQueue => "after_queue",
            Self::BeforeExecute => "before_execute",
            Self::AfterExecute => "after_execute",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
