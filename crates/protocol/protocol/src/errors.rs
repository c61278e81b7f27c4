//! Error types for decoding consensus metadata and recovering seals.

use alloy_primitives::SignatureError;
use thiserror::Error;

/// An error decoding RLP or the istanbul extra-data field of a header.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The underlying RLP stream is malformed or truncated.
    #[error("malformed rlp in `{field}`: {source}")]
    Rlp {
        /// The field being decoded.
        field: &'static str,
        /// The RLP error.
        #[source]
        source: alloy_rlp::Error,
    },
    /// Bytes remained after the top-level item was decoded.
    #[error("{remaining} trailing bytes after rlp item in `{field}`")]
    TrailingBytes {
        /// The field being decoded.
        field: &'static str,
        /// The number of bytes left over.
        remaining: usize,
    },
    /// The extra-data field is too short to hold the vanity prefix.
    #[error("extra data is {0} bytes, shorter than the 32-byte vanity")]
    ShortExtraData(usize),
    /// The istanbul extra list did not have exactly three elements.
    #[error("istanbul extra has {0} elements, expected 3")]
    ExtraArity(usize),
    /// A decoded element had the wrong structure.
    #[error("unexpected shape for `{field}`: expected {expected}")]
    UnexpectedShape {
        /// The field that had the wrong shape.
        field: &'static str,
        /// A description of the expected shape.
        expected: &'static str,
    },
    /// A validator entry was not a 20-byte address.
    #[error("validator {index} is {len} bytes, expected 20")]
    InvalidValidator {
        /// Position of the validator in the extra-data list.
        index: usize,
        /// The actual length found.
        len: usize,
    },
}

/// An error recovering the signer of a committed seal.
///
/// Recovery errors are recoverable: a seal that fails to recover simply
/// contributes no vote.
#[derive(Debug, Error)]
pub enum RecoveryError {
    /// The seal is not a 65-byte `r || s || v` signature.
    #[error("seal is {0} bytes, expected 65")]
    InvalidLength(usize),
    /// The signature could not be parsed or the public key could not be recovered.
    #[error("signature recovery failed: {0}")]
    Signature(#[from] SignatureError),
    /// The requested seal index does not exist in the header.
    #[error("seal index {index} out of range, header has {count} committed seals")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of committed seals present.
        count: usize,
    },
}

/// An error from [`SealRecoverer::recover_committer`](crate::SealRecoverer::recover_committer).
#[derive(Debug, Error)]
pub enum SealError {
    /// The header's extra data could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The seal could not be recovered.
    #[error(transparent)]
    Recovery(#[from] RecoveryError),
}
