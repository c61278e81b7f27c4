//! Serde helpers writing addresses in EIP-55 checksummed form.
//!
//! Deserialization needs no helper, [`Address`] parses hex of either case.

use alloy_primitives::Address;
use serde::Serializer;

pub(crate) fn serialize<S: Serializer>(
    address: &Address,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&address.to_checksum(None))
}

/// Addresses as a sequence of checksummed strings.
pub(crate) mod seq {
    use alloy_primitives::Address;
    use serde::Serializer;

    pub(crate) fn serialize<'a, S: Serializer>(
        addresses: impl IntoIterator<Item = &'a Address>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(addresses.into_iter().map(|address| address.to_checksum(None)))
    }
}
