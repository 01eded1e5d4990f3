use crate::abi::ParamType;
use tessera_types::{Address, ProposalTypeId, Selector};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    // ── Validation ──────────────────────────────────────────────────────
    #[error("no active scope for this proposal type and key")]
    InvalidScope,

    #[error("call selector {actual} does not match scope selector {expected}")]
    Invalid4ByteSelector { expected: Selector, actual: Selector },

    #[error("parameter does not equal the scope's reference value")]
    InvalidParamNotEqual,

    #[error("parameter is outside the scope's allowed range")]
    InvalidParamRange,

    #[error("call to {target} ({selector}) is not allowed for this proposal type")]
    InvalidProposedTxForType { target: Address, selector: Selector },

    #[error("invalid calldata: {0}")]
    InvalidCalldata(String),

    #[error("invalid calldatas length: {targets} targets, {calldatas} calldatas")]
    InvalidCalldatasLength { targets: usize, calldatas: usize },

    // ── Configuration ───────────────────────────────────────────────────
    #[error("invalid scope definition: {0}")]
    InvalidScopeDefinition(String),

    #[error("scope index {index} out of range ({len} scopes)")]
    InvalidScopeIndex { index: usize, len: usize },

    #[error("proposal type {0} does not exist")]
    InvalidProposalType(ProposalTypeId),

    #[error("quorum {0} exceeds the divisor")]
    InvalidQuorum(u16),

    #[error("approval threshold {0} exceeds the divisor")]
    InvalidApprovalThreshold(u16),

    #[error("invalid admin address")]
    InvalidAdmin,

    #[error("value does not fit in {0:?}")]
    ValueOutOfRange(ParamType),

    // ── Authorization ───────────────────────────────────────────────────
    #[error("caller {0} is not the admin")]
    NotAdmin(Address),

    #[error("caller {0} is neither the admin nor the timelock")]
    NotAdminOrTimelock(Address),

    // ── Wire format ─────────────────────────────────────────────────────
    #[error("unknown {kind} tag {tag}")]
    InvalidWireTag { kind: &'static str, tag: u8 },

    #[error("scope definition decode error: {0}")]
    Decode(String),
}
