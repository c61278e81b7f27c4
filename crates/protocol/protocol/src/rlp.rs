//! A dynamically-shaped RLP item.
//!
//! Headers and the istanbul extra-data field are hashed and decoded as nested lists of byte
//! strings. [`RlpItem`] models exactly that shape and is encoded and decoded with the
//! primitives from [`alloy_rlp`].

use crate::DecodeError;
use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_rlp::{BufMut, Decodable, Encodable, Header};

/// A nested RLP value: either a byte string or a list of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RlpItem {
    /// A leaf byte string.
    Bytes(Bytes),
    /// An ordered list of items.
    List(Vec<RlpItem>),
}

impl RlpItem {
    /// An empty byte string.
    pub fn empty() -> Self {
        Self::Bytes(Bytes::new())
    }

    /// Creates a leaf from any byte-like value.
    pub fn bytes(value: impl Into<Bytes>) -> Self {
        Self::Bytes(value.into())
    }

    /// Creates a leaf holding the minimal big-endian encoding of `value`.
    ///
    /// Zero is encoded as the empty string, matching the canonical integer encoding.
    pub fn uint(value: U256) -> Self {
        Self::Bytes(value.to_be_bytes_trimmed_vec().into())
    }

    /// Creates a leaf holding the minimal big-endian encoding of a `u64`.
    pub fn u64(value: u64) -> Self {
        Self::uint(U256::from(value))
    }

    /// Creates a 20-byte leaf.
    pub fn address(value: Address) -> Self {
        Self::Bytes(Bytes::copy_from_slice(value.as_slice()))
    }

    /// Creates a 32-byte leaf.
    pub fn hash(value: B256) -> Self {
        Self::Bytes(Bytes::copy_from_slice(value.as_slice()))
    }

    /// Creates a list item.
    pub const fn list(items: Vec<Self>) -> Self {
        Self::List(items)
    }

    /// Returns the byte string if this item is a leaf.
    pub const fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Bytes(b) => Some(b),
            Self::List(_) => None,
        }
    }

    /// Returns the list elements if this item is a list.
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::Bytes(_) => None,
            Self::List(items) => Some(items),
        }
    }

    /// Encodes the item into a fresh buffer.
    pub fn encoded(&self) -> Vec<u8> {
        alloy_rlp::encode(self)
    }

    /// Decodes exactly one item from `buf`, rejecting trailing bytes.
    ///
    /// `field` names the value being decoded and is carried in the error.
    pub fn decode_exact(mut buf: &[u8], field: &'static str) -> Result<Self, DecodeError> {
        let item = Self::decode(&mut buf).map_err(|source| DecodeError::Rlp { field, source })?;
        if !buf.is_empty() {
            return Err(DecodeError::TrailingBytes { field, remaining: buf.len() });
        }
        Ok(item)
    }

    fn payload_length(items: &[Self]) -> usize {
        items.iter().map(Encodable::length).sum()
    }
}

impl Encodable for RlpItem {
    fn encode(&self, out: &mut dyn BufMut) {
        match self {
            Self::Bytes(bytes) => <[u8] as Encodable>::encode(bytes, out),
            Self::List(items) => {
                Header { list: true, payload_length: Self::payload_length(items) }.encode(out);
                for item in items {
                    item.encode(out);
                }
            }
        }
    }

    fn length(&self) -> usize {
        match self {
            Self::Bytes(bytes) => <[u8] as Encodable>::length(bytes),
            Self::List(items) => {
                let payload_length = Self::payload_length(items);
                payload_length + alloy_rlp::length_of_length(payload_length)
            }
        }
    }
}

impl Decodable for RlpItem {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        let bytes: &[u8] = *buf;
        if bytes.len() < header.payload_length {
            return Err(alloy_rlp::Error::InputTooShort);
        }
        let (payload, rest) = bytes.split_at(header.payload_length);
        *buf = rest;

        if !header.list {
            return Ok(Self::Bytes(Bytes::copy_from_slice(payload)));
        }

        let mut payload = payload;
        let mut items = Vec::new();
        while !payload.is_empty() {
            items.push(Self::decode(&mut payload)?);
        }
        Ok(Self::List(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::hex;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty_string(RlpItem::empty(), "80")]
    #[case::single_low_byte(RlpItem::bytes(vec![0x0f]), "0f")]
    #[case::single_high_byte(RlpItem::bytes(vec![0x80]), "8180")]
    #[case::dog(RlpItem::bytes(b"dog".to_vec()), "83646f67")]
    #[case::zero(RlpItem::u64(0), "80")]
    #[case::small_int(RlpItem::u64(15), "0f")]
    #[case::int_1024(RlpItem::u64(1024), "820400")]
    #[case::empty_list(RlpItem::list(vec![]), "c0")]
    #[case::cat_dog(
        RlpItem::list(vec![RlpItem::bytes(b"cat".to_vec()), RlpItem::bytes(b"dog".to_vec())]),
        "c88363617483646f67"
    )]
    #[case::nested(
        RlpItem::list(vec![
            RlpItem::list(vec![]),
            RlpItem::list(vec![RlpItem::list(vec![])]),
        ]),
        "c3c0c1c0"
    )]
    fn test_encode_known_vectors(#[case] item: RlpItem, #[case] expected: &str) {
        let encoded = item.encoded();
        assert_eq!(hex::encode(&encoded), expected);
        assert_eq!(item.length(), encoded.len());
        assert_eq!(RlpItem::decode_exact(&encoded, "test").unwrap(), item);
    }

    #[test]
    fn test_long_string_header() {
        let item = RlpItem::bytes(vec![0xaa; 56]);
        let encoded = item.encoded();
        assert_eq!(&encoded[..2], &[0xb8, 56]);
        assert_eq!(encoded.len(), 58);
    }

    #[test]
    fn test_decode_truncated() {
        let err = RlpItem::decode_exact(&hex!("83646f"), "test").unwrap_err();
        assert!(matches!(err, DecodeError::Rlp { field: "test", .. }));
    }

    #[test]
    fn test_decode_truncated_list() {
        let err = RlpItem::decode_exact(&hex!("c88363617483646f"), "test").unwrap_err();
        assert!(matches!(err, DecodeError::Rlp { .. }));
    }

    #[test]
    fn test_decode_trailing_bytes() {
        let err = RlpItem::decode_exact(&hex!("83646f6700"), "extra").unwrap_err();
        assert_eq!(err, DecodeError::TrailingBytes { field: "extra", remaining: 1 });
    }

    #[test]
    fn test_decode_empty_input() {
        assert!(RlpItem::decode_exact(&[], "test").is_err());
    }

    #[test]
    fn test_accessors() {
        let item = RlpItem::list(vec![RlpItem::bytes(vec![1u8])]);
        assert!(item.as_bytes().is_none());
        assert_eq!(item.as_list().unwrap().len(), 1);
        assert_eq!(item.as_list().unwrap()[0], RlpItem::bytes(vec![1u8]));
    }

    fn arb_item() -> impl Strategy<Value = RlpItem> {
        let leaf = prop::collection::vec(any::<u8>(), 0..80).prop_map(RlpItem::bytes);
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop::collection::vec(inner, 0..8).prop_map(RlpItem::list)
        })
    }

    proptest! {
        #[test]
        fn test_nested_items_survive_decoding(item in arb_item()) {
            let encoded = item.encoded();
            prop_assert_eq!(item.length(), encoded.len());
            prop_assert_eq!(RlpItem::decode_exact(&encoded, "prop").unwrap(), item);
        }

        #[test]
        fn test_uint_matches_alloy_encoding(value in any::<u64>()) {
            prop_assert_eq!(RlpItem::u64(value).encoded(), alloy_rlp::encode(value));
        }
    }
}
