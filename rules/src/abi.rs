//! Typed access to 32-byte argument slots of an encoded call.
//!
//! An encoded call is a 4-byte selector followed by one 32-byte slot per static
//! argument. Unsigned integers sit right-aligned in their slot; an address is
//! read from the first 20 bytes of its slot; `bytes32` fills the slot.

use crate::error::RuleError;
use serde::{Deserialize, Serialize};
use tessera_types::Word;

/// Width of one argument slot.
pub const SLOT: usize = 32;

/// Width of the leading function selector.
pub const SELECTOR_LEN: usize = 4;

/// Primitive type of a constrained argument. Wire tags 1..=8 (0 is "none").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum ParamType {
    Uint8 = 1,
    Uint16 = 2,
    Uint32 = 3,
    Uint64 = 4,
    Uint128 = 5,
    Uint256 = 6,
    Address = 7,
    Bytes32 = 8,
}

impl ParamType {
    pub const ALL: [ParamType; 8] = [
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Uint128,
        Self::Uint256,
        Self::Address,
        Self::Bytes32,
    ];

    /// Number of bytes the value occupies inside its slot.
    pub fn width(self) -> usize {
        match self {
            Self::Uint8 => 1,
            Self::Uint16 => 2,
            Self::Uint32 => 4,
            Self::Uint64 => 8,
            Self::Uint128 => 16,
            Self::Uint256 => 32,
            Self::Address => 20,
            Self::Bytes32 => 32,
        }
    }

    /// Whether the value is read from the head of the slot rather than the tail.
    pub fn head_aligned(self) -> bool {
        matches!(self, Self::Address | Self::Bytes32)
    }
}

impl TryFrom<u8> for ParamType {
    type Error = RuleError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|t| *t as u8 == tag)
            .ok_or(RuleError::InvalidWireTag {
                kind: "type",
                tag,
            })
    }
}

impl From<ParamType> for u8 {
    fn from(ty: ParamType) -> Self {
        ty as u8
    }
}

/// The `index`-th argument slot of `calldata`.
pub fn argument(calldata: &[u8], index: usize) -> Result<&[u8], RuleError> {
    let start = SELECTOR_LEN + SLOT * index;
    calldata.get(start..start + SLOT).ok_or_else(|| {
        RuleError::InvalidCalldata(format!(
            "argument {index} needs {} bytes, call has {}",
            start + SLOT,
            calldata.len()
        ))
    })
}

/// Read a `ty` value from `bytes` and widen it to a canonical word.
///
/// The width comes from `ty` alone; `bytes` shorter than that width is an error,
/// longer is fine (the head or tail is taken as the type dictates).
pub fn extract(bytes: &[u8], ty: ParamType) -> Result<Word, RuleError> {
    let width = ty.width();
    if bytes.len() < width {
        return Err(RuleError::InvalidCalldata(format!(
            "{ty:?} needs {width} bytes, got {}",
            bytes.len()
        )));
    }
    let field = if ty.head_aligned() {
        &bytes[..width]
    } else {
        &bytes[bytes.len() - width..]
    };
    Word::from_be_slice(field).map_err(|e| RuleError::InvalidCalldata(e.to_string()))
}

/// Lay `value` out in a 32-byte slot the way [`extract`] reads it back.
pub fn encode(value: &Word, ty: ParamType) -> Result<[u8; SLOT], RuleError> {
    let width = ty.width();
    if value.bits() as usize > width * 8 {
        return Err(RuleError::ValueOutOfRange(ty));
    }
    let word = value.as_bytes();
    let mut slot = [0u8; SLOT];
    if ty.head_aligned() {
        slot[..width].copy_from_slice(&word[SLOT - width..]);
    } else {
        slot[SLOT - width..].copy_from_slice(&word[SLOT - width..]);
    }
    Ok(slot)
}
