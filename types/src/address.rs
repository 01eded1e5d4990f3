//! 20-byte account / module address.

/// A 20-byte address identifying a governance module, an administrator, or a call target.
///
/// Module addresses double as capability carriers: the low 16 bits (the last two
/// bytes, big-endian) encode which lifecycle callbacks the module implements.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 20]);

fixed_bytes!(Address, 20);

impl Address {
    /// An address whose trailing bytes hold `value` big-endian; handy for tests and fixtures.
    pub fn from_low_u64(value: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// The low 16 bits of the address, read big-endian from the last two bytes.
    pub fn low_u16(&self) -> u16 {
        u16::from_be_bytes([self.0[18], self.0[19]])
    }

    /// A copy of this address with the low 16 bits replaced by `bits`.
    pub fn with_low_u16(mut self, bits: u16) -> Self {
        self.0[18..].copy_from_slice(&bits.to_be_bytes());
        self
    }
}
