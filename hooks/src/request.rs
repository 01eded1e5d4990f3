//! Typed request/response shapes for every lifecycle event.
//!
//! Each request variant carries the arguments of one event. Each response carries
//! the event it answers (the tag) plus the payload shape that event allows; the
//! dispatcher rejects a response whose tag or shape does not match the request.

use crate::event::LifecycleEvent;
use serde::{Deserialize, Serialize};
use tessera_types::{Address, DescriptionHash, ProposalId};

/// A voter's choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Support {
    Against = 0,
    For = 1,
    Abstain = 2,
}

/// The call list a proposal would execute.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalCalls {
    pub targets: Vec<Address>,
    pub values: Vec<u128>,
    pub calldatas: Vec<Vec<u8>>,
}

/// Arguments of a single vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteInfo {
    pub voter: Address,
    pub support: Support,
    pub reason: String,
    pub params: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookRequest {
    BeforeInitialize {
        sender: Address,
    },
    AfterInitialize {
        sender: Address,
    },
    BeforeQuorumCalculation {
        sender: Address,
        proposal: ProposalId,
    },
    AfterQuorumCalculation {
        sender: Address,
        proposal: ProposalId,
        quorum: u128,
    },
    BeforeVote {
        sender: Address,
        proposal: ProposalId,
        vote: VoteInfo,
    },
    AfterVote {
        sender: Address,
        proposal: ProposalId,
        vote: VoteInfo,
        weight: u128,
    },
    BeforeVoteSucceeded {
        sender: Address,
        proposal: ProposalId,
    },
    AfterVoteSucceeded {
        sender: Address,
        proposal: ProposalId,
        succeeded: bool,
    },
    BeforePropose {
        sender: Address,
        calls: ProposalCalls,
        description: String,
    },
    AfterPropose {
        sender: Address,
        proposal: ProposalId,
        calls: ProposalCalls,
        description: String,
    },
    BeforeCancel {
        sender: Address,
        calls: ProposalCalls,
        description_hash: DescriptionHash,
    },
    AfterCancel {
        sender: Address,
        calls: ProposalCalls,
        description_hash: DescriptionHash,
    },
    BeforeQueue {
        sender: Address,
        calls: ProposalCalls,
        description_hash: DescriptionHash,
    },
    AfterQueue {
        sender: Address,
        calls: ProposalCalls,
        description_hash: DescriptionHash,
    },
    BeforeExecute {
        sender: Address,
        calls: ProposalCalls,
        description_hash: DescriptionHash,
    },
    AfterExecute {
        sender: Address,
        calls: ProposalCalls,
        description_hash: DescriptionHash,
    },
}

impl HookRequest {
    pub fn event(&self) -> LifecycleEvent {
        match self {
            Self::BeforeInitialize { .. } => LifecycleEvent::BeforeInitialize,
            Self::AfterInitialize { .. } => LifecycleEvent::AfterInitialize,
            Self::BeforeQuorumCalculation { .. } => LifecycleEvent::BeforeQuorumCalculation,
            Self::AfterQuorumCalculation { .. } => LifecycleEvent::AfterQuorumCalculation,
            Self::BeforeVote { .. } => LifecycleEvent::BeforeVote,
            Self::AfterVote { .. } => LifecycleEvent::AfterVote,
            Self::BeforeVoteSucceeded { .. } => LifecycleEvent::BeforeVoteSucceeded,
            Self::AfterVoteSucceeded { .. } => LifecycleEvent::AfterVoteSucceeded,
            Self::BeforePropose { .. } => LifecycleEvent::BeforePropose,
            Self::AfterPropose { .. } => LifecycleEvent::AfterPropose,
            Self::BeforeCancel { .. } => LifecycleEvent::BeforeCancel,
            Self::AfterCancel { .. } => LifecycleEvent::AfterCancel,
            Self::BeforeQueue { .. } => LifecycleEvent::BeforeQueue,
            Self::AfterQueue { .. } => LifecycleEvent::AfterQueue,
            Self::BeforeExecute { .. } => LifecycleEvent::BeforeExecute,
            Self::AfterExecute { .. } => LifecycleEvent::AfterExecute,
        }
    }

    /// The account that triggered the lifecycle operation.
    pub fn sender(&self) -> &Address {
        match self {
            Self::BeforeInitialize { sender }
            | Self::AfterInitialize { sender }
            | Self::BeforeQuorumCalculation { sender, .. }
            | Self::AfterQuorumCalculation { sender, .. }
            | Self::BeforeVote { sender, .. }
            | Self::AfterVote { sender, .. }
            | Self::BeforeVoteSucceeded { sender, .. }
            | Self::AfterVoteSucceeded { sender, .. }
            | Self::BeforePropose { sender, .. }
            | Self::AfterPropose { sender, .. }
            | Self::BeforeCancel { sender, .. }
            | Self::AfterCancel { sender, .. }
            | Self::BeforeQueue { sender, .. }
            | Self::AfterQueue { sender, .. }
            | Self::BeforeExecute { sender, .. }
            | Self::AfterExecute { sender, .. } => sender,
        }
    }
}

/// A module's answer to a [`HookRequest`].
///
/// `None` in an override slot means "leave the governor's value alone".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookResponse {
    Ack(LifecycleEvent),
    Quorum {
        tag: LifecycleEvent,
        quorum: Option<u128>,
    },
    VoteWeight {
        tag: LifecycleEvent,
        weight: Option<u128>,
    },
    VoteSucceeded {
        tag: LifecycleEvent,
        succeeded: Option<bool>,
    },
    ProposalId {
        tag: LifecycleEvent,
        proposal: Option<ProposalId>,
    },
}

impl HookResponse {
    /// The response a module that does not intercept `event` would give.
    pub fn neutral(event: LifecycleEvent) -> Self {
        match event {
            LifecycleEvent::BeforeQuorumCalculation => Self::Quorum {
                tag: event,
                quorum: None,
            },
            LifecycleEvent::BeforeVote => Self::VoteWeight {
                tag: event,
                weight: None,
            },
            LifecycleEvent::BeforeVoteSucceeded => Self::VoteSucceeded {
                tag: event,
                succeeded: None,
            },
            LifecycleEvent::BeforePropose => Self::ProposalId {
                tag: event,
                proposal: None,
            },
            _ => Self::Ack(event),
        }
    }

    /// Acknowledge `request` without overriding anything.
    pub fn ack(request: &HookRequest) -> Self {
        Self::neutral(request.event())
    }

    pub fn tag(&self) -> LifecycleEvent {
        match self {
            Self::Ack(tag)
            | Self::Quorum { tag, .. }
            | Self::VoteWeight { tag, .. }
            | Self::VoteSucceeded { tag, .. }
            | Self::ProposalId { tag, .. } => *tag,
        }
    }

    /// Whether this response's payload is the shape `event` allows.
    pub fn fits(&self, event: LifecycleEvent) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(&Self::neutral(event))
    }

    /// Fold a later module's response over this one: a later override replaces an
    /// earlier one, a neutral response leaves it in place.
    pub fn merge(self, later: Self) -> Self {
        match (&self, &later) {
            (Self::Quorum { .. }, Self::Quorum { quorum: Some(_), .. })
            | (Self::VoteWeight { .. }, Self::VoteWeight { weight: Some(_), .. })
            | (Self::VoteSucceeded { .. }, Self::VoteSucceeded { succeeded: Some(_), .. })
            | (Self::ProposalId { .. }, Self::ProposalId { proposal: Some(_), .. }) => later,
            _ => self,
        }
    }

    pub fn quorum_override(&self) -> Option<u128> {
        match self {
            Self::Quorum { quorum, .. } => *quorum,
            _ => None,
        }
    }

    pub fn weight_override(&self) -> Option<u128> {
        match self {
            Self::VoteWeight { weight, .. } => *weight,
            _ => None,
        }
    }

    pub fn succeeded_override(&self) -> Option<bool> {
        match self {
            Self::VoteSucceeded { succeeded, .. } => *succeeded,
            _ => None,
        }
    }

    pub fn proposal_override(&self) -> Option<ProposalId> {
        match self {
            Self::ProposalId { proposal, .. } => *proposal,
            _ => None,
        }
    }
}
