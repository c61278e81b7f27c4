#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod errors;
pub use errors::{DecodeError, RecoveryError, SealError};

mod rlp;
pub use rlp::RlpItem;

mod extra;
pub use extra::{ADDRESS_LENGTH, EXTRA_VANITY, ExtraData, SEAL_LENGTH};

mod header;
pub use header::{HeaderHasher, KlaytnHeader};

mod seal;
pub use seal::{COMMIT_MSG_CODE, SealRecoverer, Secp256k1Recovery, SignatureRecovery};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
