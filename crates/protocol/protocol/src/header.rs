//! Klaytn block headers and the istanbul header hash.

use crate::{DecodeError, ExtraData, RlpItem};
use alloy_primitives::{Address, B256, Bloom, Bytes, U256, keccak256};
use serde::{Deserialize, Serialize};

/// A Klaytn block header as returned by `klay_getHeaderByNumber`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KlaytnHeader {
    /// The node-reported block hash.
    pub hash: B256,
    /// The parent block hash.
    pub parent_hash: B256,
    /// The rewardbase of the block proposer.
    pub reward: Address,
    /// The state trie root.
    pub state_root: B256,
    /// The transaction trie root.
    pub transactions_root: B256,
    /// The receipt trie root.
    pub receipts_root: B256,
    /// The logs bloom.
    pub logs_bloom: Bloom,
    /// The block score.
    pub block_score: U256,
    /// The block number.
    #[serde(with = "alloy_serde::quantity")]
    pub number: u64,
    /// The gas used by the block.
    #[serde(with = "alloy_serde::quantity")]
    pub gas_used: u64,
    /// The block timestamp in seconds.
    #[serde(with = "alloy_serde::quantity")]
    pub timestamp: u64,
    /// The fractional part of the timestamp.
    #[serde(rename = "timestampFoS", with = "alloy_serde::quantity")]
    pub timestamp_fos: u64,
    /// The raw istanbul extra-data field.
    pub extra_data: Bytes,
    /// Governance data carried by the block.
    #[serde(default)]
    pub governance_data: Bytes,
    /// Governance vote data carried by the block.
    #[serde(default)]
    pub vote_data: Bytes,
    /// The base fee, present after the magma hardfork.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_fee_per_gas: Option<U256>,
}

impl KlaytnHeader {
    /// Decodes the header's extra-data field.
    pub fn extra(&self) -> Result<ExtraData, DecodeError> {
        ExtraData::decode(&self.extra_data)
    }
}

/// Computes the istanbul hash of a header.
///
/// The preimage is the RLP list of the header fields with the extra-data field replaced by
/// [`ExtraData::encode_for_hash`]. With `keep_seal` set the digest is the block hash; without
/// it the digest is the message signed by the proposer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderHasher;

impl HeaderHasher {
    /// Builds the RLP preimage of the header.
    pub fn preimage(header: &KlaytnHeader, keep_seal: bool) -> Result<Vec<u8>, DecodeError> {
        let extra = header.extra()?;
        Ok(Self::preimage_with_extra(header, &extra, keep_seal))
    }

    /// Builds the RLP preimage of the header from an already-decoded extra-data field.
    pub fn preimage_with_extra(
        header: &KlaytnHeader,
        extra: &ExtraData,
        keep_seal: bool,
    ) -> Vec<u8> {
        let mut fields = vec![
            RlpItem::hash(header.parent_hash),
            RlpItem::address(header.reward),
            RlpItem::hash(header.state_root),
            RlpItem::hash(header.transactions_root),
            RlpItem::hash(header.receipts_root),
            RlpItem::bytes(Bytes::copy_from_slice(header.logs_bloom.as_slice())),
            RlpItem::uint(header.block_score),
            RlpItem::u64(header.number),
            RlpItem::u64(header.gas_used),
            RlpItem::u64(header.timestamp),
            RlpItem::u64(header.timestamp_fos),
            RlpItem::Bytes(extra.encode_for_hash(keep_seal)),
            RlpItem::Bytes(header.governance_data.clone()),
            RlpItem::Bytes(header.vote_data.clone()),
        ];
        if let Some(base_fee) = header.base_fee_per_gas {
            fields.push(RlpItem::uint(base_fee));
        }
        RlpItem::list(fields).encoded()
    }

    /// Hashes the header with Keccak-256.
    pub fn hash(header: &KlaytnHeader, keep_seal: bool) -> Result<B256, DecodeError> {
        Ok(keccak256(Self::preimage(header, keep_seal)?))
    }

    /// Recomputes the block hash and reports whether it matches the node-reported hash.
    pub fn check_reported_hash(header: &KlaytnHeader) -> Result<bool, DecodeError> {
        Ok(Self::hash(header, true)? == header.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SEAL_LENGTH;
    use alloy_primitives::address;

    fn header() -> KlaytnHeader {
        let extra = ExtraData {
            vanity: B256::ZERO,
            validators: vec![address!("52d41ca72af615a1ac3301b0a93efa222ecc7541")],
            seal: Bytes::from(vec![0x01; SEAL_LENGTH]),
            committed_seals: vec![Bytes::from(vec![0x02; SEAL_LENGTH])],
        };
        KlaytnHeader {
            parent_hash: B256::repeat_byte(0x01),
            reward: address!("52d41ca72af615a1ac3301b0a93efa222ecc7541"),
            block_score: U256::from(1),
            number: 126_007_200,
            gas_used: 21_000,
            timestamp: 1_686_000_000,
            extra_data: extra.encode(),
            ..Default::default()
        }
    }

    #[test]
    fn test_preimage_is_a_fourteen_field_list() {
        let preimage = HeaderHasher::preimage(&header(), true).unwrap();
        let item = RlpItem::decode_exact(&preimage, "header").unwrap();
        let fields = item.as_list().unwrap();
        assert_eq!(fields.len(), 14);
        assert_eq!(fields[7], RlpItem::u64(126_007_200));
        assert_eq!(fields[10], RlpItem::empty());
    }

    #[test]
    fn test_base_fee_is_appended_last() {
        let mut header = header();
        header.base_fee_per_gas = Some(U256::from(25_000_000_000u64));
        let preimage = HeaderHasher::preimage(&header, true).unwrap();
        let item = RlpItem::decode_exact(&preimage, "header").unwrap();
        let fields = item.as_list().unwrap();
        assert_eq!(fields.len(), 15);
        assert_eq!(fields[14], RlpItem::uint(U256::from(25_000_000_000u64)));
    }

    #[test]
    fn test_seal_changes_hash_only_when_kept() {
        let header = header();
        let mut reseal = header.clone();
        let mut extra = reseal.extra().unwrap();
        extra.seal = Bytes::from(vec![0x09; SEAL_LENGTH]);
        reseal.extra_data = extra.encode();

        assert_ne!(
            HeaderHasher::hash(&header, true).unwrap(),
            HeaderHasher::hash(&reseal, true).unwrap()
        );
        assert_eq!(
            HeaderHasher::hash(&header, false).unwrap(),
            HeaderHasher::hash(&reseal, false).unwrap()
        );
    }

    #[test]
    fn test_committed_seals_never_change_hash() {
        let header = header();
        let mut recommitted = header.clone();
        let mut extra = recommitted.extra().unwrap();
        extra.committed_seals.clear();
        recommitted.extra_data = extra.encode();

        assert_eq!(
            HeaderHasher::hash(&header, true).unwrap(),
            HeaderHasher::hash(&recommitted, true).unwrap()
        );
    }

    #[test]
    fn test_check_reported_hash() {
        let mut header = header();
        assert!(!HeaderHasher::check_reported_hash(&header).unwrap());
        header.hash = HeaderHasher::hash(&header, true).unwrap();
        assert!(HeaderHasher::check_reported_hash(&header).unwrap());
    }

    #[test]
    fn test_malformed_extra_fails() {
        let mut header = header();
        header.extra_data = Bytes::from(vec![0u8; 8]);
        assert_eq!(HeaderHasher::hash(&header, true), Err(DecodeError::ShortExtraData(8)));
    }

    #[test]
    fn test_deserialize_rpc_header() {
        let json = r#"{
            "baseFeePerGas": "0x5d21dba00",
            "blockScore": "0x1",
            "extraData": "0x0000000000000000000000000000000000000000000000000000000000000000c3c080c0",
            "gasUsed": "0x5208",
            "governanceData": "0x",
            "hash": "0xd1c2c178d8c24a67e4ec9f7593a63c0f79c89688e7a983f3f832dc66a760bef6",
            "logsBloom": "0x00000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
            "number": "0x782b7a0",
            "parentHash": "0x0101010101010101010101010101010101010101010101010101010101010101",
            "receiptsRoot": "0x0000000000000000000000000000000000000000000000000000000000000000",
            "reward": "0x52d41ca72af615a1ac3301b0a93efa222ecc7541",
            "stateRoot": "0x0000000000000000000000000000000000000000000000000000000000000000",
            "timestamp": "0x647d6f80",
            "timestampFoS": "0x0",
            "transactionsRoot": "0x0000000000000000000000000000000000000000000000000000000000000000",
            "voteData": "0x"
        }"#;

        let header: KlaytnHeader = serde_json::from_str(json).unwrap();
        assert_eq!(header.number, 126_007_200);
        assert_eq!(header.gas_used, 21_000);
        assert_eq!(header.base_fee_per_gas, Some(U256::from(25_000_000_000u64)));
        assert!(header.extra().unwrap().validators.is_empty());
        assert!(HeaderHasher::hash(&header, true).is_ok());
    }
}
