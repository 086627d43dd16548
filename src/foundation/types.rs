use crate::foundation::util::encoding::parse_hex_32bytes;
use crate::foundation::CeremonyError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub type Hash32 = [u8; 32];

/// A participant's consensus identity: a 32-byte ed25519 public key.
///
/// Displays as lowercase hex; serializes as a hex string in human-readable
/// formats and as the raw fixed-width bytes in binary formats.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct ConsensusPubKey(Hash32);

impl ConsensusPubKey {
    pub const fn new(value: Hash32) -> Self {
        Self(value)
    }

    pub fn as_bytes(&self) -> &Hash32 {
        &self.0
    }
}

impl fmt::Display for ConsensusPubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for ConsensusPubKey {
    type Err = CeremonyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(parse_hex_32bytes(s)?))
    }
}

impl Serialize for ConsensusPubKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for ConsensusPubKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            let bytes = Hash32::deserialize(deserializer)?;
            Ok(Self(bytes))
        }
    }
}

impl AsRef<[u8]> for ConsensusPubKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Hash32> for ConsensusPubKey {
    fn from(value: Hash32) -> Self {
        Self(value)
    }
}
