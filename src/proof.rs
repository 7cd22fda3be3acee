//! Audit paths and their verification

use crate::hash::{DigestProvider, MerkleHash, HASH_SIZE};
use std::marker::PhantomData;
use tracing::debug;

/// Merkle Proof for an individual leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleProof<HF: DigestProvider> {
    _hasher: PhantomData<HF>,
    /// Position of the proven leaf in the leaf sequence
    index: usize,
    /// Root of the tree the proof was generated from, absent for an empty tree
    root: Option<MerkleHash>,
    /// Siblings from the leaf level up to the level below the root
    path: Vec<MerkleHash>,
}

impl<HF: DigestProvider> MerkleProof<HF> {
    pub(crate) fn new(index: usize, root: Option<MerkleHash>, path: Vec<MerkleHash>) -> Self {
        Self {
            _hasher: PhantomData,
            index,
            root,
            path,
        }
    }

    /// Position of the proven leaf
    pub fn index(&self) -> usize {
        self.index
    }

    /// Root the proof leads to, `None` for an empty tree
    pub fn root(&self) -> Option<&MerkleHash> {
        self.root.as_ref()
    }

    /// Sibling digests, nearest the leaf first
    pub fn path(&self) -> &[MerkleHash] {
        &self.path
    }

    /// Consume the proof, keeping only its sibling digests
    pub fn into_path(self) -> Vec<MerkleHash> {
        self.path
    }

    /// Compute the implied Merkle Root Hash from the pre-calculated path
    pub fn compute_implied_root(&self, leaf: &MerkleHash) -> MerkleHash {
        let (root, _) = replay::<HF, _>(*leaf, self.path.iter().map(|h| &h[..]), self.index);
        root
    }

    /// Check that `leaf` sits at this proof's index under this proof's root
    pub fn verify(&self, leaf: &MerkleHash) -> bool {
        match &self.root {
            Some(root) => verify::<HF>(leaf, root, self.index, &self.path),
            None => false,
        }
    }

    /// Encode as `leaf || path || root`, the self-delimited flat layout
    pub fn to_raw(&self, leaf: &MerkleHash) -> Option<Vec<u8>> {
        let root = self.root?;
        let mut raw = Vec::with_capacity((self.path.len() + 2) * HASH_SIZE);
        raw.extend_from_slice(leaf);
        raw.extend_from_slice(&self.intermediate_bytes());
        raw.extend_from_slice(&root);
        Some(raw)
    }

    /// Concatenated path, the intermediate field of the separated flat layout
    pub fn intermediate_bytes(&self) -> Vec<u8> {
        self.path.iter().flat_map(|h| h.0).collect()
    }
}

/// Verify that `leaf` sits at `index` of the tree with the given `root`.
///
/// An empty path only proves a single-leaf tree: the leaf must be the root.
pub fn verify<HF: DigestProvider>(
    leaf: &MerkleHash,
    root: &MerkleHash,
    index: usize,
    path: &[MerkleHash],
) -> bool {
    if path.is_empty() {
        return leaf == root;
    }
    let (implied, _) = replay::<HF, _>(*leaf, path.iter().map(|h| &h[..]), index);
    let verified = &implied == root;
    debug!(index, depth = path.len(), verified, "verified merkle proof");
    verified
}

/// Fold `siblings` into `leaf`, ordering each pair by the parity of the
/// tracked index. Returns the implied root and what is left of the index.
pub(crate) fn replay<'a, HF, I>(
    leaf: MerkleHash,
    siblings: I,
    mut index: usize,
) -> (MerkleHash, usize)
where
    HF: DigestProvider,
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut current = leaf;
    for sibling in siblings {
        current = if index & 1 == 0 {
            HF::hash_pair(&current, sibling)
        } else {
            HF::hash_pair(sibling, &current)
        };
        index >>= 1;
    }
    (current, index)
}
