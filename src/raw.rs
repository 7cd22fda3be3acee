//! Verification straight from flat byte encodings of a proof
//!
//! Two layouts carry the same proof:
//! - self-delimited: `leaf || sibling_0 || ... || sibling_n || root`
//! - separated: `leaf`, `root` and the concatenated siblings as three fields
//!
//! Malformed input never errors, it simply fails verification.

use crate::{
    hash::{DigestProvider, MerkleHash, HASH_SIZE},
    proof::replay,
};
use tracing::debug;

/// Verify a self-delimited `leaf || siblings || root` buffer.
///
/// A buffer of exactly two digests proves a single-leaf tree and passes when
/// both halves are equal, whatever the index. Anything shorter, including a
/// lone 32-byte leaf, is rejected.
pub fn verify_raw<HF: DigestProvider>(proof: &[u8], index: usize) -> bool {
    if proof.len() % HASH_SIZE != 0 || proof.len() < 2 * HASH_SIZE {
        debug!(len = proof.len(), "malformed raw merkle proof");
        return false;
    }
    let (leaf, rest) = proof.split_at(HASH_SIZE);
    let (intermediate, root) = rest.split_at(rest.len() - HASH_SIZE);
    if intermediate.is_empty() {
        return leaf == root;
    }

    let Ok(leaf) = MerkleHash::try_from(leaf) else {
        return false;
    };
    let (implied, _) = replay::<HF, _>(leaf, intermediate.chunks_exact(HASH_SIZE), index);
    implied[..] == *root
}

/// Verify a proof given as separate `leaf`, `root` and concatenated siblings.
///
/// Besides reaching `root`, every bit of `index` must be consumed by the
/// siblings, so an index pointing past the proven subtree is rejected.
pub fn verify_raw_parts<HF: DigestProvider>(
    leaf: &[u8],
    root: &[u8],
    intermediate: &[u8],
    index: usize,
) -> bool {
    let (Ok(leaf), Ok(root)) = (MerkleHash::try_from(leaf), MerkleHash::try_from(root)) else {
        debug!(leaf = leaf.len(), root = root.len(), "malformed merkle proof fields");
        return false;
    };
    if intermediate.len() % HASH_SIZE != 0 {
        debug!(len = intermediate.len(), "malformed merkle proof siblings");
        return false;
    }
    if intermediate.is_empty() {
        return leaf == root;
    }

    let (implied, remaining) = replay::<HF, _>(leaf, intermediate.chunks_exact(HASH_SIZE), index);
    remaining == 0 && implied == root
}
