//! Canonical 256-bit comparison value.

use crate::error::TesseraError;

/// A 256-bit unsigned value stored big-endian.
///
/// Because the bytes are big-endian and fixed-width, the derived lexicographic
/// ordering is exactly numeric ordering.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Word([u8; 32]);

fixed_bytes!(Word, 32);

impl Word {
    pub const MAX: Self = Self([0xff; 32]);

    /// Right-align up to 32 big-endian bytes, zero-extending on the left.
    pub fn from_be_slice(bytes: &[u8]) -> Result<Self, TesseraError> {
        if bytes.len() > 32 {
            return Err(TesseraError::InvalidLength {
                kind: "Word",
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut out = [0u8; 32];
        out[32 - bytes.len()..].copy_from_slice(bytes);
        Ok(Self(out))
    }

    /// The value as a `u128`, if it fits.
    pub fn to_u128(&self) -> Result<u128, TesseraError> {
        if self.0[..16].iter().any(|b| *b != 0) {
            return Err(TesseraError::Overflow { bits: 128 });
        }
        let mut low = [0u8; 16];
        low.copy_from_slice(&self.0[16..]);
        Ok(u128::from_be_bytes(low))
    }

    /// Number of significant bits (0 for zero).
    pub fn bits(&self) -> u32 {
        for (i, byte) in self.0.iter().enumerate() {
            if *byte != 0 {
                return (32 - i as u32) * 8 - byte.leading_zeros();
            }
        }
        0
    }
}

impl From<u128> for Word {
    fn from(value: u128) -> Self {
        let mut out = [0u8; 32];
        out[16..].copy_from_slice(&value.to_be_bytes());
        Self(out)
    }
}

impl From<u64> for Word {
    fn from(value: u64) -> Self {
        Self::from(value as u128)
    }
}

impl From<crate::Address> for Word {
    fn from(addr: crate::Address) -> Self {
        let mut out = [0u8; 32];
        out[12..].copy_from_slice(addr.as_bytes());
        Self(out)
    }
}
