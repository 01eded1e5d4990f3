//! Fundamental types for Tessera governance.
//!
//! This crate defines the value types shared across every other crate in the workspace:
//! module/target addresses, 4-byte function selectors, 24-byte scope keys, canonical
//! 256-bit words, proposal identifiers, timestamps, voting windows and the basis-point divisor.

#[macro_use]
mod bytes;

pub mod address;
pub mod error;
pub mod hash;
pub mod params;
pub mod selector;
pub mod time;
pub mod word;

pub use address::Address;
pub use error::TesseraError;
pub use hash::{DescriptionHash, ProposalId};
pub use params::{ProposalTypeId, DIVISOR};
pub use selector::{ScopeKey, Selector};
pub use time::{Timestamp, Window, WindowPosition};
pub use word::Word;
