//! Protocol-wide constants for proposal categories.

/// Identifier of a proposal category (proposal type).
pub type ProposalTypeId = u8;

/// Basis-point divisor for quorum and approval fractions: 10_000 = 100%.
pub const DIVISOR: u16 = 10_000;
