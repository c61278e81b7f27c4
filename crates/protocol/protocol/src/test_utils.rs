//! Test utilities for building sealed istanbul headers.

use crate::{ExtraData, HeaderHasher, KlaytnHeader, SEAL_LENGTH, SealRecoverer, Secp256k1Recovery};
use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;

/// Returns a deterministic signer derived from `seed`.
pub fn test_signer(seed: u8) -> PrivateKeySigner {
    PrivateKeySigner::from_bytes(&B256::with_last_byte(seed.max(1)))
        .expect("small scalars are valid secp256k1 keys")
}

/// Builds headers whose committed seals are real signatures from a fixed validator set.
#[derive(Debug, Clone)]
pub struct SealedHeaderBuilder {
    validators: Vec<PrivateKeySigner>,
}

impl SealedHeaderBuilder {
    /// Creates a builder with `count` deterministic validators.
    pub fn with_validators(count: u8) -> Self {
        Self { validators: (1..=count).map(test_signer).collect() }
    }

    /// Returns the validator addresses in validator order.
    pub fn addresses(&self) -> Vec<Address> {
        self.validators.iter().map(PrivateKeySigner::address).collect()
    }

    /// Returns the validator signer at `index`.
    pub fn signer(&self, index: usize) -> &PrivateKeySigner {
        &self.validators[index]
    }

    /// Builds block `number` committed by the validators at `committers`, in that seal order.
    pub fn build(&self, number: u64, committers: &[usize]) -> KlaytnHeader {
        let signers: Vec<_> = committers.iter().map(|&i| &self.validators[i]).collect();
        self.build_with(number, &signers)
    }

    /// Builds block `number` committed by arbitrary signers, in that seal order.
    pub fn build_with(&self, number: u64, committers: &[&PrivateKeySigner]) -> KlaytnHeader {
        let mut extra = ExtraData {
            vanity: B256::with_last_byte(0x01),
            validators: self.addresses(),
            seal: Bytes::from(vec![0x5a; SEAL_LENGTH]),
            committed_seals: Vec::new(),
        };
        let mut header = KlaytnHeader {
            parent_hash: B256::from(U256::from(number.saturating_sub(1))),
            reward: self.addresses().first().copied().unwrap_or_default(),
            block_score: U256::from(1),
            number,
            timestamp: 1_600_000_000 + number,
            extra_data: extra.encode(),
            ..Default::default()
        };
        header.hash = HeaderHasher::hash(&header, true).expect("builder extra data decodes");

        let digest = SealRecoverer::<Secp256k1Recovery>::default().commit_digest(header.hash);
        extra.committed_seals = committers
            .iter()
            .map(|signer| {
                let signature = signer.sign_hash_sync(&digest).expect("local signing succeeds");
                let mut raw = signature.as_bytes();
                raw[64] = signature.v() as u8;
                Bytes::copy_from_slice(&raw)
            })
            .collect();
        header.extra_data = extra.encode();
        header
    }
}
