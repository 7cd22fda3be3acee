//! Merkle Engine Errors

use displaydoc::Display;

#[derive(Debug, Display, Clone, PartialEq)]
pub enum Error {
    /// Requested index: {0} exceeds number of leaves: {1}
    ExceededMaxIndex(usize, usize),
    /// Invalid hex digest: {0}
    InvalidHex(hex::FromHexError),
    /// Digest must be 32 bytes, got: {0}
    InvalidLength(usize),
}

impl std::error::Error for Error {}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::InvalidHex(err)
    }
}
