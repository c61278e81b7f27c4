//! The istanbul extra-data field.

use crate::{DecodeError, RlpItem};
use alloy_primitives::{Address, B256, Bytes};

/// Size of the opaque vanity prefix of the extra-data field.
pub const EXTRA_VANITY: usize = 32;

/// Size of an encoded validator address.
pub const ADDRESS_LENGTH: usize = 20;

/// Size of a proposer or committed seal signature (`r || s || v`).
pub const SEAL_LENGTH: usize = 65;

/// Decoded view of a header's extra-data field.
///
/// The raw layout is `vanity || rlp([validators, seal, committed_seals])`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraData {
    /// The 32-byte vanity prefix.
    pub vanity: B256,
    /// The validator set encoded in this block.
    pub validators: Vec<Address>,
    /// The proposer seal.
    pub seal: Bytes,
    /// The committed seals, one per committing validator, in arbitrary order.
    pub committed_seals: Vec<Bytes>,
}

impl ExtraData {
    /// Decodes a raw extra-data field.
    pub fn decode(extra: &[u8]) -> Result<Self, DecodeError> {
        if extra.len() < EXTRA_VANITY {
            return Err(DecodeError::ShortExtraData(extra.len()));
        }
        let (vanity, rest) = extra.split_at(EXTRA_VANITY);

        let item = RlpItem::decode_exact(rest, "extra_data")?;
        let fields = item
            .as_list()
            .ok_or(DecodeError::UnexpectedShape { field: "extra_data", expected: "list" })?;
        let [validators, seal, committed_seals] = fields else {
            return Err(DecodeError::ExtraArity(fields.len()));
        };

        let validators = validators
            .as_list()
            .ok_or(DecodeError::UnexpectedShape {
                field: "validators",
                expected: "list of addresses",
            })?
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let bytes = item.as_bytes().ok_or(DecodeError::UnexpectedShape {
                    field: "validators",
                    expected: "list of addresses",
                })?;
                if bytes.len() != ADDRESS_LENGTH {
                    return Err(DecodeError::InvalidValidator { index, len: bytes.len() });
                }
                Ok(Address::from_slice(bytes))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let seal = seal
            .as_bytes()
            .ok_or(DecodeError::UnexpectedShape { field: "seal", expected: "byte string" })?
            .clone();

        let committed_seals = committed_seals
            .as_list()
            .ok_or(DecodeError::UnexpectedShape {
                field: "committed_seals",
                expected: "list of byte strings",
            })?
            .iter()
            .map(|item| {
                item.as_bytes().cloned().ok_or(DecodeError::UnexpectedShape {
                    field: "committed_seals",
                    expected: "list of byte strings",
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { vanity: B256::from_slice(vanity), validators, seal, committed_seals })
    }

    /// Encodes the full extra-data field, including all seals.
    pub fn encode(&self) -> Bytes {
        self.encode_with(self.seal.clone(), &self.committed_seals)
    }

    /// Encodes the extra-data field as it appears in the header hash preimage.
    ///
    /// Committed seals are always cleared; the proposer seal is kept only if `keep_seal` is set.
    pub fn encode_for_hash(&self, keep_seal: bool) -> Bytes {
        let seal = if keep_seal { self.seal.clone() } else { Bytes::new() };
        self.encode_with(seal, &[])
    }

    fn encode_with(&self, seal: Bytes, committed_seals: &[Bytes]) -> Bytes {
        let body = RlpItem::list(vec![
            RlpItem::list(self.validators.iter().copied().map(RlpItem::address).collect()),
            RlpItem::Bytes(seal),
            RlpItem::list(committed_seals.iter().cloned().map(RlpItem::Bytes).collect()),
        ]);

        let mut out = Vec::with_capacity(EXTRA_VANITY + alloy_rlp::Encodable::length(&body));
        out.extend_from_slice(self.vanity.as_slice());
        alloy_rlp::Encodable::encode(&body, &mut out);
        out.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, hex};
    use rstest::rstest;

    fn sample() -> ExtraData {
        ExtraData {
            vanity: B256::repeat_byte(0x11),
            validators: vec![
                address!("52d41ca72af615a1ac3301b0a93efa222ecc7541"),
                address!("99fb17d324fa0e07f23b49d09028ac0919414db6"),
                address!("c74c15bb1e8c0bd7f3ed5e2a4b5a1fbd1c5e5f10"),
            ],
            seal: Bytes::from(vec![0xaa; SEAL_LENGTH]),
            committed_seals: vec![
                Bytes::from(vec![0xbb; SEAL_LENGTH]),
                Bytes::from(vec![0xcc; SEAL_LENGTH]),
            ],
        }
    }

    #[test]
    fn test_decode_encoded() {
        let extra = sample();
        assert_eq!(ExtraData::decode(&extra.encode()).unwrap(), extra);
    }

    #[test]
    fn test_vanity_is_the_prefix() {
        let extra = sample();
        let raw = extra.encode();
        assert_eq!(&raw[..EXTRA_VANITY], extra.vanity.as_slice());
    }

    #[test]
    fn test_hash_encoding_keeps_seal_drops_committed_seals() {
        let extra = sample();
        let decoded = ExtraData::decode(&extra.encode_for_hash(true)).unwrap();

        assert_eq!(decoded.vanity, extra.vanity);
        assert_eq!(decoded.validators, extra.validators);
        assert_eq!(decoded.seal, extra.seal);
        assert!(decoded.committed_seals.is_empty());
        assert_ne!(decoded, extra);
    }

    #[test]
    fn test_hash_encoding_without_seal() {
        let extra = sample();
        let decoded = ExtraData::decode(&extra.encode_for_hash(false)).unwrap();

        assert_eq!(decoded.vanity, extra.vanity);
        assert_eq!(decoded.validators, extra.validators);
        assert!(decoded.seal.is_empty());
        assert!(decoded.committed_seals.is_empty());
    }

    #[test]
    fn test_hash_encoding_ignores_committed_seals() {
        let mut extra = sample();
        let before = extra.encode_for_hash(true);
        extra.committed_seals.push(Bytes::from(vec![0xdd; SEAL_LENGTH]));
        assert_eq!(extra.encode_for_hash(true), before);
        assert_ne!(extra.encode(), before);
    }

    #[test]
    fn test_decode_short_extra() {
        assert_eq!(ExtraData::decode(&[0u8; 31]), Err(DecodeError::ShortExtraData(31)));
    }

    #[test]
    fn test_decode_vanity_only() {
        let err = ExtraData::decode(&[0u8; EXTRA_VANITY]).unwrap_err();
        assert!(matches!(err, DecodeError::Rlp { field: "extra_data", .. }));
    }

    fn with_body(body: RlpItem) -> Vec<u8> {
        let mut raw = vec![0u8; EXTRA_VANITY];
        raw.extend(body.encoded());
        raw
    }

    #[rstest]
    #[case::not_a_list(
        RlpItem::bytes(vec![1u8, 2, 3]),
        DecodeError::UnexpectedShape { field: "extra_data", expected: "list" }
    )]
    #[case::two_elements(
        RlpItem::list(vec![RlpItem::list(vec![]), RlpItem::empty()]),
        DecodeError::ExtraArity(2)
    )]
    #[case::four_elements(
        RlpItem::list(vec![
            RlpItem::list(vec![]),
            RlpItem::empty(),
            RlpItem::list(vec![]),
            RlpItem::empty(),
        ]),
        DecodeError::ExtraArity(4)
    )]
    #[case::validators_not_list(
        RlpItem::list(vec![RlpItem::empty(), RlpItem::empty(), RlpItem::list(vec![])]),
        DecodeError::UnexpectedShape { field: "validators", expected: "list of addresses" }
    )]
    #[case::short_validator(
        RlpItem::list(vec![
            RlpItem::list(vec![RlpItem::bytes(vec![0x01; 19])]),
            RlpItem::empty(),
            RlpItem::list(vec![]),
        ]),
        DecodeError::InvalidValidator { index: 0, len: 19 }
    )]
    #[case::seal_is_list(
        RlpItem::list(vec![RlpItem::list(vec![]), RlpItem::list(vec![]), RlpItem::list(vec![])]),
        DecodeError::UnexpectedShape { field: "seal", expected: "byte string" }
    )]
    #[case::committed_seals_not_list(
        RlpItem::list(vec![RlpItem::list(vec![]), RlpItem::empty(), RlpItem::empty()]),
        DecodeError::UnexpectedShape {
            field: "committed_seals",
            expected: "list of byte strings",
        }
    )]
    #[case::nested_committed_seal(
        RlpItem::list(vec![
            RlpItem::list(vec![]),
            RlpItem::empty(),
            RlpItem::list(vec![RlpItem::list(vec![])]),
        ]),
        DecodeError::UnexpectedShape {
            field: "committed_seals",
            expected: "list of byte strings",
        }
    )]
    fn test_decode_malformed(#[case] body: RlpItem, #[case] expected: DecodeError) {
        assert_eq!(ExtraData::decode(&with_body(body)), Err(expected));
    }

    #[test]
    fn test_decode_trailing_garbage() {
        let mut raw = sample().encode().to_vec();
        raw.push(0x00);
        let err = ExtraData::decode(&raw).unwrap_err();
        assert_eq!(err, DecodeError::TrailingBytes { field: "extra_data", remaining: 1 });
    }

    #[test]
    fn test_committed_seals_of_any_length_decode() {
        let mut extra = sample();
        extra.committed_seals = vec![Bytes::from(vec![0x01; 10])];
        assert_eq!(ExtraData::decode(&extra.encode()).unwrap(), extra);
    }

    #[test]
    fn test_empty_extra_encoding() {
        let extra = ExtraData::default();
        let raw = extra.encode();
        assert_eq!(&raw[EXTRA_VANITY..], hex!("c3c080c0"));
    }
}
