//! Double-hash digest primitive used at every node of the tree

use crate::error::Error;
use blake2::Blake2s256;
use sha2::{
    digest::{consts::U32, generic_array::GenericArray},
    Digest, Sha256,
};
use sha3::Sha3_256;
use std::{fmt, marker::PhantomData, ops::Deref, str::FromStr};

/// Size in bytes of every digest handled by the engine
pub const HASH_SIZE: usize = 32;

/// Hash function applied at every node of the tree.
///
/// Implementations must be stateless from the caller's point of view: two
/// threads hashing at the same time never observe each other's input.
pub trait DigestProvider {
    /// Hash arbitrary bytes into a node digest
    fn hash(data: &[u8]) -> MerkleHash;

    /// Hash two nodes on a merkle tree by concatenating the left and
    /// right inputs with no separator
    fn hash_pair(left: &[u8], right: &[u8]) -> MerkleHash {
        Self::hash(&[left, right].concat())
    }
}

/// Hash-of-hash over any 256-bit RustCrypto digest
pub struct Double<D>(PhantomData<fn() -> D>);

/// Bitcoin's `SHA256(SHA256(x))`
pub type DoubleSha256 = Double<Sha256>;
pub type DoubleSha3_256 = Double<Sha3_256>;
pub type DoubleBlake2s256 = Double<Blake2s256>;

impl<D> DigestProvider for Double<D>
where
    D: Digest<OutputSize = U32>,
{
    fn hash(data: &[u8]) -> MerkleHash {
        let first = D::digest(data);
        MerkleHash::from_output(D::digest(first))
    }

    fn hash_pair(left: &[u8], right: &[u8]) -> MerkleHash {
        let first = D::new().chain_update(left).chain_update(right).finalize();
        MerkleHash::from_output(D::digest(first))
    }
}

// Marker impls without bounds on `D`, so proofs stay `Clone`/`Debug`
// whatever the inner digest supports.
impl<D> fmt::Debug for Double<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Double")
    }
}

impl<D> Clone for Double<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for Double<D> {}

impl<D> Default for Double<D> {
    fn default() -> Self {
        Double(PhantomData)
    }
}

impl<D> PartialEq for Double<D> {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl<D> Eq for Double<D> {}

/// A 32-byte digest, held in internal (little-endian) byte order
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MerkleHash(pub [u8; HASH_SIZE]);

impl MerkleHash {
    pub(crate) fn from_output(output: GenericArray<u8, U32>) -> Self {
        let mut result = [0u8; HASH_SIZE];
        result.copy_from_slice(output.as_slice());
        MerkleHash(result)
    }

    /// Parse hex in internal byte order
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let raw = hex::decode(s)?;
        Self::try_from(raw.as_slice())
    }

    /// Hex in internal byte order
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; HASH_SIZE]> for MerkleHash {
    fn from(value: [u8; HASH_SIZE]) -> Self {
        MerkleHash(value)
    }
}

impl TryFrom<&[u8]> for MerkleHash {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; HASH_SIZE] = value
            .try_into()
            .map_err(|_| Error::InvalidLength(value.len()))?;
        Ok(MerkleHash(bytes))
    }
}

impl Deref for MerkleHash {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for MerkleHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq<[u8; HASH_SIZE]> for MerkleHash {
    fn eq(&self, other: &[u8; HASH_SIZE]) -> bool {
        &self.0 == other
    }
}

/// Big-endian hex, the form block explorers and RPC nodes print txids in
impl fmt::Display for MerkleHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter().rev() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for MerkleHash {
    type Err = Error;

    /// Parse a big-endian (RPC order) hex digest into internal byte order
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut hash = Self::from_hex(s)?;
        hash.0.reverse();
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ::hex_literal::hex;

    #[test]
    fn test_double_sha256_vectors() {
        assert_eq!(
            DoubleSha256::hash(b""),
            hex!("5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456")
        );
        assert_eq!(
            DoubleSha256::hash(b"hello"),
            hex!("9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50")
        );
    }

    #[test]
    fn test_double_is_hash_of_hash() {
        let once = Sha3_256::digest(b"merkle");
        let twice = Sha3_256::digest(once);
        assert_eq!(DoubleSha3_256::hash(b"merkle").as_ref(), twice.as_slice());

        let once = Blake2s256::digest(b"merkle");
        let twice = Blake2s256::digest(once);
        assert_eq!(DoubleBlake2s256::hash(b"merkle").as_ref(), twice.as_slice());
    }

    #[test]
    fn test_hash_pair_is_hash_of_concatenation() {
        let left = DoubleSha256::hash(b"a");
        let right = DoubleSha256::hash(b"b");
        let mut joined = Vec::with_capacity(2 * HASH_SIZE);
        joined.extend_from_slice(&left);
        joined.extend_from_slice(&right);
        assert_eq!(DoubleSha256::hash_pair(&left, &right), DoubleSha256::hash(&joined));
        assert_ne!(
            DoubleSha256::hash_pair(&left, &right),
            DoubleSha256::hash_pair(&right, &left)
        );
    }

    #[test]
    fn test_rpc_hex_is_byte_reversed() {
        let txid = "8c14f0db3df150123e6f3dbbf30f8b955a8249b62ac1d1ff16284aefa3d06d87";
        let hash: MerkleHash = txid.parse().unwrap();
        assert_eq!(hash.0[0], 0x87);
        assert_eq!(hash.0[31], 0x8c);
        assert_eq!(hash.to_string(), txid);
        assert_eq!(
            hash.to_hex(),
            "876dd0a3ef4a2816ffd1c12ab649825a958b0ff3bb3d6f3e1250f13ddbf0148c"
        );
    }

    #[test]
    fn test_malformed_hex_rejected() {
        assert_eq!("abcd".parse::<MerkleHash>(), Err(Error::InvalidLength(2)));
        assert!(matches!(
            MerkleHash::from_hex("zz"),
            Err(Error::InvalidHex(_))
        ));
        assert_eq!(
            MerkleHash::try_from(&[0u8; 33][..]),
            Err(Error::InvalidLength(33))
        );
    }
}
