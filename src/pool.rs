//! Reusable hasher states with scoped checkout

use crate::hash::{DigestProvider, MerkleHash};
use lazy_static::lazy_static;
use parking_lot::Mutex;
use sha2::{
    digest::{consts::U32, FixedOutputReset},
    Digest, Sha256,
};
use std::{
    mem::ManuallyDrop,
    ops::{Deref, DerefMut},
};

lazy_static! {
    static ref SHA256_POOL: HasherPool<Sha256> = HasherPool::new();
}

/// Thread-safe pool of idle hasher states.
///
/// A state is only reachable through the [`PooledHasher`] guard that checked
/// it out, and is reset before it goes back to the pool.
#[derive(Debug, Default)]
pub struct HasherPool<D> {
    idle: Mutex<Vec<D>>,
}

impl<D: Digest + FixedOutputReset> HasherPool<D> {
    pub fn new() -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
        }
    }

    /// Take an idle state, or build a fresh one when the pool is empty
    pub fn checkout(&self) -> PooledHasher<'_, D> {
        let hasher = self.idle.lock().pop().unwrap_or_else(D::new);
        PooledHasher {
            pool: self,
            hasher: ManuallyDrop::new(hasher),
        }
    }

    /// Number of states waiting to be reused
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    fn give_back(&self, mut hasher: D) {
        Digest::reset(&mut hasher);
        self.idle.lock().push(hasher);
    }
}

/// Checked-out hasher state, returned to its pool on drop
#[derive(Debug)]
pub struct PooledHasher<'a, D: Digest + FixedOutputReset> {
    pool: &'a HasherPool<D>,
    hasher: ManuallyDrop<D>,
}

impl<D: Digest + FixedOutputReset> Deref for PooledHasher<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        &self.hasher
    }
}

impl<D: Digest + FixedOutputReset> DerefMut for PooledHasher<'_, D> {
    fn deref_mut(&mut self) -> &mut D {
        &mut self.hasher
    }
}

impl<D: Digest + FixedOutputReset> Drop for PooledHasher<'_, D> {
    fn drop(&mut self) {
        // SAFETY: `hasher` is never touched again after this take.
        let hasher = unsafe { ManuallyDrop::take(&mut self.hasher) };
        self.pool.give_back(hasher);
    }
}

/// Double SHA-256 drawing its state from a process-wide pool.
///
/// Produces the same digests as [`crate::DoubleSha256`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PooledDoubleSha256;

impl PooledDoubleSha256 {
    fn double<D>(hasher: &mut D, parts: &[&[u8]]) -> MerkleHash
    where
        D: Digest<OutputSize = U32> + FixedOutputReset,
    {
        for part in parts {
            Digest::update(&mut *hasher, *part);
        }
        let first = Digest::finalize_reset(&mut *hasher);
        Digest::update(&mut *hasher, first);
        MerkleHash::from_output(Digest::finalize_reset(&mut *hasher))
    }
}

impl DigestProvider for PooledDoubleSha256 {
    fn hash(data: &[u8]) -> MerkleHash {
        let mut hasher = SHA256_POOL.checkout();
        Self::double(&mut *hasher, &[data])
    }

    fn hash_pair(left: &[u8], right: &[u8]) -> MerkleHash {
        let mut hasher = SHA256_POOL.checkout();
        Self::double(&mut *hasher, &[left, right])
    }
}
