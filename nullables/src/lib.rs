//! Nullable infrastructure for deterministic testing.
//!
//! External collaborators of the governance core (lifecycle modules, the clock)
//! get test-friendly implementations here that:
//! - Return scripted, deterministic values
//! - Record every interaction for later assertions
//! - Can be told to fail at a specific lifecycle point
//!
//! Usage: register a [`NullHook`] with a dispatcher or governor and inspect its
//! [`CallLog`] afterwards.

pub mod clock;
pub mod hook;

pub use clock::NullClock;
pub use hook::{CallLog, NullHook};
