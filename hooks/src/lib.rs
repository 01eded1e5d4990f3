//! Capability-gated lifecycle hooks for Tessera governance.
//!
//! A governance module may intercept a proposal's lifecycle at sixteen fixed points
//! (before/after initialize, quorum calculation, vote, vote-succeeded, propose,
//! cancel, queue, execute). Which points a module implements is encoded in the low
//! 16 bits of its identity address, declared once by the module author as a
//! [`PermissionDescriptor`], and checked against each other exactly once when the
//! module is wrapped into a [`RegisteredModule`]. From then on dispatch is a single
//! bit test against the cached [`CapabilitySet`].
//!
//! Flow:
//! 1. Module author implements [`GovernanceHook`] and picks an identity whose low
//!    bits match the declared permissions.
//! 2. [`RegisteredModule::new`] verifies identity ⇔ descriptor (fail-fast).
//! 3. The governor builds a [`CallContext`] per lifecycle operation and calls
//!    [`Dispatcher::dispatch_all`]; modules lacking the capability are never called.
//! 4. Responses are checked for the echoed event tag and the event's response shape.

pub mod capability;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod module;
pub mod permissions;
pub mod request;

pub use capability::{has_capability, CapabilitySet};
pub use context::{CallContext, DEFAULT_MAX_DEPTH};
pub use dispatch::Dispatcher;
pub use error::{HookError, HookFault};
pub use event::LifecycleEvent;
pub use module::{GovernanceHook, RegisteredModule};
pub use permissions::{validate_capabilities, PermissionDescriptor};
pub use request::{HookRequest, HookResponse, ProposalCalls, Support, VoteInfo};
