//! Proposal lifecycle for Tessera governance.
//!
//! The [`Governor`] owns the [`RuleStore`](tessera_rules::RuleStore) and a
//! [`Dispatcher`](tessera_hooks::Dispatcher) of verified modules. Every lifecycle
//! operation (initialize, propose, vote, quorum, vote-succeeded, cancel, queue,
//! execute) runs its before-hooks, applies its state change, then runs its
//! after-hooks; an error from any step leaves the governor unchanged.
//!
//! Voting weights are supplied by the caller. Time is supplied by the caller.

pub mod config;
pub mod error;
pub mod governor;
pub mod logging;
pub mod proposal;

pub use config::GovernorConfig;
pub use error::GovernorError;
pub use governor::Governor;
pub use logging::{init_logging, LogFormat};
pub use proposal::{Proposal, ProposalState, Tally};
