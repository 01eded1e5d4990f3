//! Scoped transaction validation for Tessera governance.
//!
//! Every proposal is tagged with a proposal type (category). A category carries
//! its quorum and approval fractions and zero or more *scopes*: rules bound to a
//! `(target, selector)` pair that constrain the arguments of the call a proposal
//! may execute. Validation extracts each constrained argument from the encoded
//! call by position and type, then compares it against the scope's reference
//! value (EQUAL / LESS_THAN / GREATER_THAN) on a canonical 256-bit word.
//!
//! - [`abi`]: argument slot extraction and encoding per [`ParamType`]
//! - [`comparator`]: [`Comparator`] and [`evaluate`]
//! - [`scope`]: the [`Scope`] record and its JSON wire form
//! - [`registry`]: the [`RuleStore`] holding categories and scopes
//! - [`validator`]: whole-call and whole-proposal validation

pub mod abi;
pub mod comparator;
pub mod config;
pub mod error;
pub mod events;
pub mod proposal_type;
pub mod registry;
pub mod scope;
pub mod validator;

pub use abi::{argument, encode, extract, ParamType};
pub use comparator::{evaluate, Comparator};
pub use config::{RulesConfig, ScopePolicy};
pub use error::RuleError;
pub use events::{EventBus, RuleEvent};
pub use proposal_type::ProposalType;
pub use registry::{RuleStore, ScopeId};
pub use scope::{Scope, ScopeDefinition};
pub use validator::{check_scope, validate_proposal_data, validate_proposed_tx};
