//! Errors raised while constructing or parsing the fundamental types.

use thiserror::Error;

/// Common error type for Tessera value types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TesseraError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid {kind} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("value does not fit in {bits} bits")]
    Overflow { bits: u32 },
}
