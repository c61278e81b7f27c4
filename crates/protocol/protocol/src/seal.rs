//! Recovery of committed seal signers.

use crate::{ExtraData, KlaytnHeader, RecoveryError, SEAL_LENGTH, SealError};
use alloy_primitives::{Address, B256, Signature, keccak256};
use std::fmt::Debug;

/// Message code appended to the block hash in the istanbul commit phase.
pub const COMMIT_MSG_CODE: u8 = 0x02;

/// The cryptographic capabilities needed to attribute committed seals.
///
/// [`Secp256k1Recovery`] is the production implementation; tests may substitute deterministic
/// stubs that avoid elliptic-curve math.
pub trait SignatureRecovery: Debug + Send + Sync {
    /// Hashes an arbitrary message.
    fn hash(&self, bytes: &[u8]) -> B256 {
        keccak256(bytes)
    }

    /// Recovers the address that produced `signature` over `msg_hash`.
    fn recover_address(&self, msg_hash: &B256, signature: &[u8]) -> Result<Address, RecoveryError>;
}

/// Recoverable ECDSA over secp256k1 with Keccak-256 address derivation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Recovery;

impl SignatureRecovery for Secp256k1Recovery {
    fn recover_address(&self, msg_hash: &B256, signature: &[u8]) -> Result<Address, RecoveryError> {
        if signature.len() != SEAL_LENGTH {
            return Err(RecoveryError::InvalidLength(signature.len()));
        }
        let signature = Signature::from_raw(signature)?;
        Ok(signature.recover_address_from_prehash(msg_hash)?)
    }
}

/// Attributes committed seals to validator addresses.
#[derive(Debug, Clone, Default)]
pub struct SealRecoverer<R = Secp256k1Recovery> {
    recovery: R,
}

impl<R: SignatureRecovery> SealRecoverer<R> {
    /// Creates a new [`SealRecoverer`] backed by the given recovery capability.
    pub const fn new(recovery: R) -> Self {
        Self { recovery }
    }

    /// Returns the digest every validator signs in the commit phase of `block_hash`.
    ///
    /// The message is `block_hash || 0x02`, hashed once more.
    pub fn commit_digest(&self, block_hash: B256) -> B256 {
        let mut msg = [0u8; 33];
        msg[..32].copy_from_slice(block_hash.as_slice());
        msg[32] = COMMIT_MSG_CODE;
        self.recovery.hash(&msg)
    }

    /// Recovers the committer of the seal at `seal_index`.
    ///
    /// Uses the node-reported `header.hash`; the header is not rehashed.
    pub fn recover_committer(
        &self,
        header: &KlaytnHeader,
        seal_index: usize,
    ) -> Result<Address, SealError> {
        let extra = header.extra()?;
        let seal = extra.committed_seals.get(seal_index).ok_or(RecoveryError::IndexOutOfRange {
            index: seal_index,
            count: extra.committed_seals.len(),
        })?;
        let digest = self.commit_digest(header.hash);
        Ok(self.recovery.recover_address(&digest, seal)?)
    }

    /// Recovers the committers of all seals in `extra`, in seal order.
    ///
    /// The commit digest is derived once from `block_hash` and reused for every seal.
    pub fn committers(
        &self,
        block_hash: B256,
        extra: &ExtraData,
    ) -> Vec<Result<Address, RecoveryError>> {
        let digest = self.commit_digest(block_hash);
        extra
            .committed_seals
            .iter()
            .map(|seal| self.recovery.recover_address(&digest, seal))
            .collect()
    }
}
