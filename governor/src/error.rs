use crate::proposal::ProposalState;
use tessera_hooks::HookError;
use tessera_rules::RuleError;
use tessera_types::{Address, ProposalId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernorError {
    #[error("hook error: {0}")]
    Hook(#[from] HookError),

    #[error("rule error: {0}")]
    Rule(#[from] RuleError),

    #[error("governor already initialized")]
    AlreadyInitialized,

    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("proposal {0} already exists")]
    ProposalExists(ProposalId),

    #[error("cannot {action} proposal {id} in state {state}")]
    WrongState {
        id: ProposalId,
        state: ProposalState,
        action: &'static str,
    },

    #[error("voting on proposal {0} has closed")]
    VotingClosed(ProposalId),

    #[error("{voter} has already voted on proposal {proposal}")]
    AlreadyVoted { proposal: ProposalId, voter: Address },

    #[error("{0} is neither the proposer nor the admin")]
    NotProposerOrAdmin(Address),

    #[error("{targets} targets but {values} values")]
    InvalidValuesLength { targets: usize, values: usize },

    #[error("config error: {0}")]
    Config(String),

    #[error("logging error: {0}")]
    Logging(String),
}
