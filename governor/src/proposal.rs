//! Governance proposals and their lifecycle states.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tessera_hooks::{ProposalCalls, Support};
use tessera_types::{
    Address, DescriptionHash, ProposalId, ProposalTypeId, Timestamp, Window, WindowPosition,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalState {
    /// Created; voting has not started.
    Pending,
    Active,
    Canceled,
    /// Voting ended without quorum or approval.
    Defeated,
    Succeeded,
    Queued,
    Executed,
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Canceled => "canceled",
            Self::Defeated => "defeated",
            Self::Succeeded => "succeeded",
            Self::Queued => "queued",
            Self::Executed => "executed",
        };
        f.write_str(name)
    }
}

/// Weighted vote sums.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub for_votes: u128,
    pub against_votes: u128,
    pub abstain_votes: u128,
}

impl Tally {
    pub fn add(&mut self, support: Support, weight: u128) {
        let bucket = match support {
            Support::For => &mut self.for_votes,
            Support::Against => &mut self.against_votes,
            Support::Abstain => &mut self.abstain_votes,
        };
        *bucket = bucket.saturating_add(weight);
    }

    /// Votes that count toward quorum: for and abstain.
    pub fn quorum_votes(&self) -> u128 {
        self.for_votes.saturating_add(self.abstain_votes)
    }

    /// Votes that decide approval: for and against.
    pub fn decisive_votes(&self) -> u128 {
        self.for_votes.saturating_add(self.against_votes)
    }
}

/// A governance proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub proposer: Address,
    pub proposal_type: ProposalTypeId,
    pub calls: ProposalCalls,
    pub description: String,
    pub description_hash: DescriptionHash,
    pub voting: Window,
    pub tally: Tally,
    /// Who voted and how.
    pub votes: BTreeMap<Address, Support>,
    pub canceled: bool,
    pub queued: bool,
    pub executed: bool,
}

impl Proposal {
    pub fn has_voted(&self, voter: &Address) -> bool {
        self.votes.contains_key(voter)
    }

    /// The state as far as flags and time decide it. `None` once voting has
    /// ended and the outcome depends on the tally.
    pub fn settled_state(&self, now: Timestamp) -> Option<ProposalState> {
        if self.executed {
            Some(ProposalState::Executed)
        } else if self.canceled {
            Some(ProposalState::Canceled)
        } else if self.queued {
            Some(ProposalState::Queued)
        } else {
            match self.voting.position(now) {
                WindowPosition::Before => Some(ProposalState::Pending),
                WindowPosition::Inside => Some(ProposalState::Active),
                WindowPosition::After => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal() -> Proposal {
        Proposal {
            id: ProposalId::ZERO,
            proposer: Address::from_low_u64(1),
            proposal_type: 0,
            calls: ProposalCalls::default(),
            description: String::new(),
            description_hash: DescriptionHash::of(""),
            voting: Window::after(Timestamp::new(0), 100, 100),
            tally: Tally::default(),
            votes: BTreeMap::new(),
            canceled: false,
            queued: false,
            executed: false,
        }
    }

    #[test]
    fn window_boundaries() {
        let p = proposal();
        assert_eq!(p.settled_state(Timestamp::new(99)), Some(ProposalState::Pending));
        assert_eq!(p.settled_state(Timestamp::new(100)), Some(ProposalState::Active));
        assert_eq!(p.settled_state(Timestamp::new(199)), Some(ProposalState::Active));
        assert_eq!(p.settled_state(Timestamp::new(200)), None);
    }

    #[test]
    fn flags_take_precedence() {
        let mut p = proposal();
        p.queued = true;
        assert_eq!(p.settled_state(Timestamp::new(0)), Some(ProposalState::Queued));
        p.canceled = true;
        assert_eq!(p.settled_state(Timestamp::new(0)), Some(ProposalState::Canceled));
        p.executed = true;
        assert_eq!(p.settled_state(Timestamp::new(0)), Some(ProposalState::Executed));
    }

    #[test]
    fn tally_buckets() {
        let mut t = Tally::default();
        t.add(Support::For, 10);
        t.add(Support::Against, 4);
        t.add(Support::Abstain, 3);
        t.add(Support::For, u128::MAX);
        assert_eq!(t.for_votes, u128::MAX);
        assert_eq!(t.quorum_votes(), u128::MAX);
        assert_eq!(t.against_votes, 4);
        assert_eq!(t.decisive_votes(), u128::MAX);
    }
}
