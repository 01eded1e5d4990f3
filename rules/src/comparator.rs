//! Comparison of an extracted argument against a scope's reference value.

use crate::error::RuleError;
use serde::{Deserialize, Serialize};
use tessera_types::Word;

/// Wire tags 1..=3 (0 is "empty").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Comparator {
    Equal = 1,
    LessThan = 2,
    GreaterThan = 3,
}

impl TryFrom<u8> for Comparator {
    type Error = RuleError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(Self::Equal),
            2 => Ok(Self::LessThan),
            3 => Ok(Self::GreaterThan),
            _ => Err(RuleError::InvalidWireTag {
                kind: "comparator",
                tag,
            }),
        }
    }
}

impl From<Comparator> for u8 {
    fn from(c: Comparator) -> Self {
        c as u8
    }
}

/// Check `extracted <comparator> reference`.
///
/// EQUAL fails with [`RuleError::InvalidParamNotEqual`]; LESS_THAN and
/// GREATER_THAN are strict and fail with [`RuleError::InvalidParamRange`].
pub fn evaluate(
    extracted: &Word,
    reference: &Word,
    comparator: Comparator,
) -> Result<(), RuleError> {
    match comparator {
        Comparator::Equal if extracted != reference => Err(RuleError::InvalidParamNotEqual),
        Comparator::LessThan if extracted >= reference => Err(RuleError::InvalidParamRange),
        Comparator::GreaterThan if extracted <= reference => Err(RuleError::InvalidParamRange),
        _ => Ok(()),
    }
}
