//! The governor: proposal bookkeeping around hook dispatch and rule validation.

use std::collections::{BTreeMap, HashMap};

use tessera_hooks::{
    CallContext, Dispatcher, HookRequest, HookResponse, ProposalCalls, Support, VoteInfo,
};
use tessera_rules::RuleStore;
use tessera_types::{
    Address, DescriptionHash, ProposalId, ProposalTypeId, Timestamp, Window, DIVISOR,
};

use crate::config::GovernorConfig;
use crate::error::GovernorError;
use crate::proposal::{Proposal, ProposalState, Tally};

/// `total * bps / DIVISOR`, rounded down, without intermediate overflow.
fn fraction_floor(total: u128, bps: u16) -> u128 {
    let d = DIVISOR as u128;
    let b = bps as u128;
    total / d * b + total % d * b / d
}

/// `total * bps / DIVISOR`, rounded up.
fn fraction_ceil(total: u128, bps: u16) -> u128 {
    let d = DIVISOR as u128;
    let b = bps as u128;
    let floor = fraction_floor(total, bps);
    if total % d * b % d == 0 {
        floor
    } else {
        floor.saturating_add(1)
    }
}

pub struct Governor {
    config: GovernorConfig,
    rules: RuleStore,
    dispatcher: Dispatcher<RuleStore>,
    voting_supply: u128,
    initialized: bool,
    proposals: HashMap<ProposalId, Proposal>,
}

impl Governor {
    pub fn new(
        config: GovernorConfig,
        rules: RuleStore,
        dispatcher: Dispatcher<RuleStore>,
        voting_supply: u128,
    ) -> Self {
        Self {
            config,
            rules,
            dispatcher,
            voting_supply,
            initialized: false,
            proposals: HashMap::new(),
        }
    }

    /// Build the rule store from `config.rules` and wrap it.
    pub fn from_config(
        config: GovernorConfig,
        admin: Address,
        timelock: Address,
        dispatcher: Dispatcher<RuleStore>,
        voting_supply: u128,
    ) -> Result<Self, GovernorError> {
        config.validate()?;
        let rules = RuleStore::new(admin, timelock, config.rules.clone())?;
        Ok(Self::new(config, rules, dispatcher, voting_supply))
    }

    pub fn config(&self) -> &GovernorConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut RuleStore {
        &mut self.rules
    }

    pub fn dispatcher(&self) -> &Dispatcher<RuleStore> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<RuleStore> {
        &mut self.dispatcher
    }

    pub fn voting_supply(&self) -> u128 {
        self.voting_supply
    }

    pub fn set_voting_supply(&mut self, supply: u128) {
        self.voting_supply = supply;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn proposal(&self, id: &ProposalId) -> Option<&Proposal> {
        self.proposals.get(id)
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    /// The module bound to the proposal's type, if any.
    pub fn proposal_module(&self, id: &ProposalId) -> Result<Option<Address>, GovernorError> {
        let type_id = self.get(id)?.proposal_type;
        Ok(self.rules.proposal_type(type_id)?.module)
    }

    fn get(&self, id: &ProposalId) -> Result<&Proposal, GovernorError> {
        self.proposals
            .get(id)
            .ok_or(GovernorError::ProposalNotFound(*id))
    }

    fn get_mut(&mut self, id: &ProposalId) -> Result<&mut Proposal, GovernorError> {
        self.proposals
            .get_mut(id)
            .ok_or(GovernorError::ProposalNotFound(*id))
    }

    /// Fan `request` out to every module, with the rule store as the read-only view.
    fn run_hooks(&mut self, request: HookRequest) -> Result<HookResponse, GovernorError> {
        let ctx = CallContext::new(*request.sender(), &self.rules)
            .with_max_depth(self.config.max_hook_depth);
        Ok(self.dispatcher.dispatch_all(&ctx, &request)?)
    }

    // ── Initialize ──────────────────────────────────────────────────────

    pub fn initialize(&mut self, sender: Address) -> Result<(), GovernorError> {
        if self.initialized {
            return Err(GovernorError::AlreadyInitialized);
        }
        self.run_hooks(HookRequest::BeforeInitialize { sender })?;
        self.initialized = true;
        if let Err(e) = self.run_hooks(HookRequest::AfterInitialize { sender }) {
            self.initialized = false;
            return Err(e);
        }
        tracing::info!(sender = %sender, modules = self.dispatcher.len(), "governor initialized");
        Ok(())
    }

    // ── Propose ─────────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub fn propose(
        &mut self,
        sender: Address,
        targets: Vec<Address>,
        values: Vec<u128>,
        calldatas: Vec<Vec<u8>>,
        description: String,
        proposal_type: ProposalTypeId,
        now: Timestamp,
    ) -> Result<ProposalId, GovernorError> {
        if values.len() != targets.len() {
            return Err(GovernorError::InvalidValuesLength {
                targets: targets.len(),
                values: values.len(),
            });
        }
        let bound_module = self.rules.proposal_type(proposal_type)?.module;
        self.rules
            .validate_proposal_data(&targets, &calldatas, proposal_type)?;

        let calls = ProposalCalls {
            targets,
            values,
            calldatas,
        };
        let before = self.run_hooks(HookRequest::BeforePropose {
            sender,
            calls: calls.clone(),
            description: description.clone(),
        })?;

        let description_hash = DescriptionHash::of(&description);
        let id = before.proposal_override().unwrap_or_else(|| {
            ProposalId::derive(&calls.targets, &calls.values, &calls.calldatas, &description_hash)
        });
        if self.proposals.contains_key(&id) {
            return Err(GovernorError::ProposalExists(id));
        }

        let voting = Window::after(
            now,
            self.config.voting_delay_secs,
            self.config.voting_period_secs,
        );
        self.proposals.insert(
            id,
            Proposal {
                id,
                proposer: sender,
                proposal_type,
                calls: calls.clone(),
                description: description.clone(),
                description_hash,
                voting,
                tally: Tally::default(),
                votes: BTreeMap::new(),
                canceled: false,
                queued: false,
                executed: false,
            },
        );

        let after = self.run_hooks(HookRequest::AfterPropose {
            sender,
            proposal: id,
            calls,
            description,
        });
        if let Err(e) = after {
            self.proposals.remove(&id);
            return Err(e);
        }

        tracing::info!(
            proposal = %id,
            proposer = %sender,
            proposal_type,
            module = ?bound_module,
            voting = %voting,
            "proposal created"
        );
        Ok(id)
    }

    // ── Vote ────────────────────────────────────────────────────────────

    /// Record `sender`'s vote with `weight` (or the weight a module substitutes).
    /// Returns the weight counted.
    #[allow(clippy::too_many_arguments)]
    pub fn cast_vote(
        &mut self,
        sender: Address,
        proposal: ProposalId,
        support: Support,
        reason: String,
        params: Vec<u8>,
        weight: u128,
        now: Timestamp,
    ) -> Result<u128, GovernorError> {
        let p = self.get(&proposal)?;
        match p.settled_state(now) {
            Some(ProposalState::Active) => {}
            Some(state) => {
                return Err(GovernorError::WrongState {
                    id: proposal,
                    state,
                    action: "vote on",
                })
            }
            None => return Err(GovernorError::VotingClosed(proposal)),
        }
        if p.has_voted(&sender) {
            return Err(GovernorError::AlreadyVoted {
                proposal,
                voter: sender,
            });
        }

        let vote = VoteInfo {
            voter: sender,
            support,
            reason,
            params,
        };
        let before = self.run_hooks(HookRequest::BeforeVote {
            sender,
            proposal,
            vote: vote.clone(),
        })?;
        let weight = before.weight_override().unwrap_or(weight);

        let p = self.get_mut(&proposal)?;
        let saved = p.tally;
        p.tally.add(support, weight);
        p.votes.insert(sender, support);

        let after = self.run_hooks(HookRequest::AfterVote {
            sender,
            proposal,
            vote,
            weight,
        });
        if let Err(e) = after {
            let p = self.get_mut(&proposal)?;
            p.tally = saved;
            p.votes.remove(&sender);
            return Err(e);
        }

        tracing::debug!(proposal = %proposal, voter = %sender, ?support, weight, "vote cast");
        Ok(weight)
    }

    // ── Counting ────────────────────────────────────────────────────────

    /// Votes needed for `proposal` to reach quorum.
    pub fn quorum(&mut self, proposal: ProposalId) -> Result<u128, GovernorError> {
        let type_id = self.get(&proposal)?.proposal_type;
        let bps = self.rules.proposal_type(type_id)?.quorum;
        let sender = self.rules.admin();

        let before = self.run_hooks(HookRequest::BeforeQuorumCalculation { sender, proposal })?;
        let quorum = before
            .quorum_override()
            .unwrap_or_else(|| fraction_floor(self.voting_supply, bps));
        self.run_hooks(HookRequest::AfterQuorumCalculation {
            sender,
            proposal,
            quorum,
        })?;
        Ok(quorum)
    }

    pub fn quorum_reached(&mut self, proposal: ProposalId) -> Result<bool, GovernorError> {
        let quorum = self.quorum(proposal)?;
        Ok(self.get(&proposal)?.tally.quorum_votes() >= quorum)
    }

    /// Whether the for share of decisive votes meets the approval threshold.
    pub fn vote_succeeded(&mut self, proposal: ProposalId) -> Result<bool, GovernorError> {
        let p = self.get(&proposal)?;
        let tally = p.tally;
        let approval = self.rules.proposal_type(p.proposal_type)?.approval_threshold;
        let sender = self.rules.admin();

        let before = self.run_hooks(HookRequest::BeforeVoteSucceeded { sender, proposal })?;
        let succeeded = before.succeeded_override().unwrap_or_else(|| {
            let decisive = tally.decisive_votes();
            decisive > 0 && tally.for_votes >= fraction_ceil(decisive, approval)
        });
        self.run_hooks(HookRequest::AfterVoteSucceeded {
            sender,
            proposal,
            succeeded,
        })?;
        Ok(succeeded)
    }

    pub fn state(
        &mut self,
        proposal: ProposalId,
        now: Timestamp,
    ) -> Result<ProposalState, GovernorError> {
        if let Some(state) = self.get(&proposal)?.settled_state(now) {
            return Ok(state);
        }
        if self.quorum_reached(proposal)? && self.vote_succeeded(proposal)? {
            Ok(ProposalState::Succeeded)
        } else {
            Ok(ProposalState::Defeated)
        }
    }

    // ── Cancel / queue / execute ────────────────────────────────────────

    fn calls_request(
        &self,
        proposal: &ProposalId,
    ) -> Result<(ProposalCalls, DescriptionHash), GovernorError> {
        let p = self.get(proposal)?;
        Ok((p.calls.clone(), p.description_hash))
    }

    pub fn cancel(
        &mut self,
        sender: Address,
        proposal: ProposalId,
        now: Timestamp,
    ) -> Result<(), GovernorError> {
        let p = self.get(&proposal)?;
        if sender != p.proposer && sender != self.rules.admin() {
            return Err(GovernorError::NotProposerOrAdmin(sender));
        }
        if let Some(state @ (ProposalState::Canceled | ProposalState::Executed)) =
            p.settled_state(now)
        {
            return Err(GovernorError::WrongState {
                id: proposal,
                state,
                action: "cancel",
            });
        }

        let (calls, description_hash) = self.calls_request(&proposal)?;
        self.run_hooks(HookRequest::BeforeCancel {
            sender,
            calls: calls.clone(),
            description_hash,
        })?;
        self.get_mut(&proposal)?.canceled = true;
        if let Err(e) = self.run_hooks(HookRequest::AfterCancel {
            sender,
            calls,
            description_hash,
        }) {
            self.get_mut(&proposal)?.canceled = false;
            return Err(e);
        }
        tracing::info!(proposal = %proposal, sender = %sender, "proposal canceled");
        Ok(())
    }

    pub fn queue(
        &mut self,
        sender: Address,
        proposal: ProposalId,
        now: Timestamp,
    ) -> Result<(), GovernorError> {
        let state = self.state(proposal, now)?;
        if state != ProposalState::Succeeded {
            return Err(GovernorError::WrongState {
                id: proposal,
                state,
                action: "queue",
            });
        }

        let (calls, description_hash) = self.calls_request(&proposal)?;
        self.run_hooks(HookRequest::BeforeQueue {
            sender,
            calls: calls.clone(),
            description_hash,
        })?;
        self.get_mut(&proposal)?.queued = true;
        if let Err(e) = self.run_hooks(HookRequest::AfterQueue {
            sender,
            calls,
            description_hash,
        }) {
            self.get_mut(&proposal)?.queued = false;
            return Err(e);
        }
        tracing::info!(proposal = %proposal, "proposal queued");
        Ok(())
    }

    /// Mark a queued proposal executed and return the calls to perform.
    ///
    /// The calls are validated again against the current scopes, which may
    /// have changed since the proposal was created.
    pub fn execute(
        &mut self,
        sender: Address,
        proposal: ProposalId,
        now: Timestamp,
    ) -> Result<ProposalCalls, GovernorError> {
        let state = self.state(proposal, now)?;
        if state != ProposalState::Queued {
            return Err(GovernorError::WrongState {
                id: proposal,
                state,
                action: "execute",
            });
        }

        let (calls, description_hash) = self.calls_request(&proposal)?;
        let type_id = self.get(&proposal)?.proposal_type;
        self.rules
            .validate_proposal_data(&calls.targets, &calls.calldatas, type_id)?;

        self.run_hooks(HookRequest::BeforeExecute {
            sender,
            calls: calls.clone(),
            description_hash,
        })?;
        self.get_mut(&proposal)?.executed = true;
        if let Err(e) = self.run_hooks(HookRequest::AfterExecute {
            sender,
            calls: calls.clone(),
            description_hash,
        }) {
            self.get_mut(&proposal)?.executed = false;
            return Err(e);
        }
        tracing::info!(proposal = %proposal, calls = calls.targets.len(), "proposal executed");
        Ok(calls)
    }
}

impl std::fmt::Debug for Governor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Governor")
            .field("config", &self.config)
            .field("modules", &self.dispatcher.len())
            .field("proposals", &self.proposals.len())
            .field("initialized", &self.initialized)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractions_round_correctly() {
        assert_eq!(fraction_floor(1_000, 3000), 300);
        assert_eq!(fraction_floor(1, 5000), 0);
        assert_eq!(fraction_ceil(1, 5000), 1);
        assert_eq!(fraction_ceil(10, 5000), 5);
        assert_eq!(fraction_floor(u128::MAX, DIVISOR), u128::MAX);
        assert_eq!(fraction_ceil(u128::MAX, DIVISOR), u128::MAX);
        assert_eq!(fraction_floor(u128::MAX, 0), 0);
    }
}
