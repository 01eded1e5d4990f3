//! 32-byte digests: proposal identifiers and description hashes.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// Identifier of a proposal, derived from its content.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProposalId([u8; 32]);

fixed_bytes!(ProposalId, 32);

/// Digest of a proposal's free-text description.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DescriptionHash([u8; 32]);

fixed_bytes!(DescriptionHash, 32);

impl DescriptionHash {
    pub fn of(description: &str) -> Self {
        Self(blake2b_256(&[description.as_bytes()]))
    }
}

impl ProposalId {
    /// Derive a proposal id from the calls it would execute and its description hash.
    ///
    /// Every variable-length field is length-prefixed so distinct call lists never
    /// collide by concatenation.
    pub fn derive(
        targets: &[crate::Address],
        values: &[u128],
        calldatas: &[Vec<u8>],
        description: &DescriptionHash,
    ) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update((targets.len() as u64).to_be_bytes());
        for target in targets {
            hasher.update(target.as_bytes());
        }
        hasher.update((values.len() as u64).to_be_bytes());
        for value in values {
            hasher.update(value.to_be_bytes());
        }
        hasher.update((calldatas.len() as u64).to_be_bytes());
        for data in calldatas {
            hasher.update((data.len() as u64).to_be_bytes());
            hasher.update(data);
        }
        hasher.update(description.as_bytes());
        Self(hasher.finalize().into())
    }
}

/// Blake2b with a 256-bit output over the concatenation of `parts`.
pub fn blake2b_256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
