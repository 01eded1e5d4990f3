//! Function selectors and the scope keys built from them.

use crate::Address;

/// The leading 4 bytes of an encoded call, identifying the target function.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Selector([u8; 4]);

fixed_bytes!(Selector, 4);

impl Selector {
    /// The selector of an encoded call, or `None` if the call is shorter than 4 bytes.
    pub fn of_call(calldata: &[u8]) -> Option<Self> {
        calldata.get(..4).and_then(|s| Self::from_slice(s).ok())
    }
}

impl From<u32> for Selector {
    fn from(value: u32) -> Self {
        Self(value.to_be_bytes())
    }
}

/// A 24-byte scope key: the call target's address followed by the function selector.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeKey([u8; 24]);

fixed_bytes!(ScopeKey, 24);

impl ScopeKey {
    /// Pack `target ‖ selector`.
    pub fn pack(target: &Address, selector: Selector) -> Self {
        let mut bytes = [0u8; 24];
        bytes[..20].copy_from_slice(target.as_bytes());
        bytes[20..].copy_from_slice(selector.as_bytes());
        Self(bytes)
    }

    pub fn target(&self) -> Address {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&self.0[..20]);
        Address::new(bytes)
    }

    pub fn selector(&self) -> Selector {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.0[20..]);
        Selector::new(bytes)
    }
}
