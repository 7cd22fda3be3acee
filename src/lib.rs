//! Merkle root and inclusion proofs over ordered 32-byte digests, such as
//! the transaction ids of a block.
//!
//! Odd levels are padded by repeating their last node, and every node is a
//! double hash of its two children. Digests are kept in internal byte order;
//! `MerkleHash`'s `Display`/`FromStr` use the reversed RPC hex form.

mod error;
mod hash;
mod pool;
mod proof;
mod raw;
mod tree;

pub use crate::{
    error::Error,
    hash::{
        DigestProvider, Double, DoubleBlake2s256, DoubleSha256, DoubleSha3_256, MerkleHash,
        HASH_SIZE,
    },
    pool::{HasherPool, PooledDoubleSha256, PooledHasher},
    proof::{verify, MerkleProof},
    raw::{verify_raw, verify_raw_parts},
    tree::{compute_root, depth_for, generate_proof},
};

#[cfg(test)]
mod test_utils {
    use super::*;

    /// Hash two nodes into their parent
    pub(crate) fn hash_pair<HF: DigestProvider>(
        left: &MerkleHash,
        right: &MerkleHash,
    ) -> MerkleHash {
        HF::hash_pair(left, right)
    }

    pub(crate) fn hash_str<HF: DigestProvider>(value: &str) -> MerkleHash {
        HF::hash(value.as_bytes())
    }

    /// Distinct leaves for a tree of `count` leaves
    pub(crate) fn leaves<HF: DigestProvider>(count: usize) -> Vec<MerkleHash> {
        (0..count as u64)
            .map(|i| HF::hash(&i.to_le_bytes()))
            .collect()
    }
}
