//! The fixed validator committee of an observation window.

use alloy_primitives::{Address, map::HashMap};
use serde::{Deserialize, Serialize, Serializer};
use tracing::warn;

/// The ordered validator committee, fixed for a whole observation window.
///
/// Duplicate members are collapsed, keeping the first position. Serializes as a plain list of
/// checksummed addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<Address>")]
pub struct Council {
    members: Vec<Address>,
    positions: HashMap<Address, usize>,
}

impl Council {
    /// Creates a council from an ordered member list.
    pub fn new(members: impl IntoIterator<Item = Address>) -> Self {
        let members = members.into_iter();
        let mut council = Self {
            members: Vec::with_capacity(members.size_hint().0),
            positions: HashMap::default(),
        };
        for member in members {
            if council.positions.contains_key(&member) {
                warn!(target: "council", %member, "dropping duplicate council member");
                continue;
            }
            council.positions.insert(member, council.members.len());
            council.members.push(member);
        }
        council
    }

    /// Returns the members in council order.
    pub fn members(&self) -> &[Address] {
        &self.members
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the council has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the council position of `address`.
    pub fn position(&self, address: &Address) -> Option<usize> {
        self.positions.get(address).copied()
    }

    /// Returns true if `address` is a member.
    pub fn contains(&self, address: &Address) -> bool {
        self.positions.contains_key(address)
    }

    /// Iterates over the members in council order.
    pub fn iter(&self) -> impl Iterator<Item = &Address> + '_ {
        self.members.iter()
    }
}

impl From<Vec<Address>> for Council {
    fn from(members: Vec<Address>) -> Self {
        Self::new(members)
    }
}

impl From<Council> for Vec<Address> {
    fn from(council: Council) -> Self {
        council.members
    }
}

impl Serialize for Council {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        crate::checksum::seq::serialize(&self.members, serializer)
    }
}

impl FromIterator<Address> for Council {
    fn from_iter<T: IntoIterator<Item = Address>>(iter: T) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_keep_first_position() {
        let (a, b, c) =
            (Address::repeat_byte(0xaa), Address::repeat_byte(0xbb), Address::repeat_byte(0xcc));
        let council = Council::new([a, b, a, c, b]);
        assert_eq!(council.members(), &[a, b, c]);
        assert_eq!(council.position(&c), Some(2));
        assert!(council.contains(&b));
        assert!(!council.contains(&Address::ZERO));
    }

    #[test]
    fn test_serializes_checksummed() {
        let member: Address = "0x52d41ca72af615a1ac3301b0a93efa222ecc7541".parse().unwrap();
        let council = Council::new([member]);
        let json = serde_json::to_string(&council).unwrap();
        assert_eq!(json, format!(r#"["{}"]"#, member.to_checksum(None)));
        assert_eq!(serde_json::from_str::<Council>(&json).unwrap(), council);
    }

    #[test]
    fn test_deserializes_lowercase() {
        let json = r#"["0x52d41ca72af615a1ac3301b0a93efa222ecc7541","0x52D41CA72AF615A1AC3301B0A93EFA222ECC7541"]"#;
        let council: Council = serde_json::from_str(json).unwrap();
        assert_eq!(council.len(), 1);
    }
}
