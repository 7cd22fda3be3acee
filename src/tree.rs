//! Level-by-level tree reduction and audit path generation

use crate::{
    error::Error,
    hash::{DigestProvider, MerkleHash},
    proof::MerkleProof,
};
use tracing::{debug, trace};

/// Compute the Merkle root of an ordered leaf sequence.
///
/// Returns `None` for an empty sequence. A single leaf is its own root.
pub fn compute_root<HF: DigestProvider>(leaves: &[MerkleHash]) -> Option<MerkleHash> {
    let mut level = leaves.to_vec();
    while level.len() > 1 {
        reduce_level::<HF>(&mut level);
    }
    level.first().copied()
}

/// Compute the Merkle root together with the audit path of the leaf at `index`.
///
/// The path is ordered from the sibling of the leaf up to the sibling just
/// below the root. An empty leaf sequence yields a proof with no root and no
/// path whatever the index.
pub fn generate_proof<HF: DigestProvider>(
    leaves: &[MerkleHash],
    index: usize,
) -> Result<MerkleProof<HF>, Error> {
    if leaves.is_empty() {
        debug!(index, "no leaves, proof has no root");
        return Ok(MerkleProof::new(index, None, Vec::new()));
    }
    if index >= leaves.len() {
        return Err(Error::ExceededMaxIndex(index, leaves.len()));
    }

    let mut level = leaves.to_vec();
    let mut path = Vec::with_capacity(depth_for(leaves.len()));
    let mut position = index;
    while level.len() > 1 {
        pad_level(&mut level);
        // Pairs are (2k, 2k + 1), so the partner differs only in the low bit.
        path.push(level[position ^ 1]);
        pair_up::<HF>(&mut level);
        position >>= 1;
    }

    debug!(index, leaves = leaves.len(), depth = path.len(), "generated merkle proof");
    Ok(MerkleProof::new(index, level.first().copied(), path))
}

/// Number of levels above the leaves, which is also the audit path length
pub fn depth_for(leaf_count: usize) -> usize {
    if leaf_count <= 1 {
        0
    } else {
        (usize::BITS - (leaf_count - 1).leading_zeros()) as usize
    }
}

/// Replace `level` with the next level up
fn reduce_level<HF: DigestProvider>(level: &mut Vec<MerkleHash>) {
    pad_level(level);
    pair_up::<HF>(level);
}

/// Duplicate the last node of an odd-sized level
fn pad_level(level: &mut Vec<MerkleHash>) {
    if let Some(&last) = level.last() {
        if level.len() & 1 == 1 {
            level.push(last);
        }
    }
}

/// Hash consecutive pairs of an even-sized level in place
fn pair_up<HF: DigestProvider>(level: &mut Vec<MerkleHash>) {
    let parents = level.len() / 2;
    for i in 0..parents {
        level[i] = HF::hash_pair(&level[2 * i], &level[2 * i + 1]);
    }
    level.truncate(parents);
    trace!(width = parents, "reduced merkle level");
}
