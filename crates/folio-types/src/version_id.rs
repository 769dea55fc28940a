use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Number of hex characters in a version identifier.
pub const VERSION_ID_LEN: usize = 12;

/// Identifier of a committed version.
///
/// Version ids are a 12-character hex prefix of a digest over the version's
/// timestamp, message and content hash. The digest itself is computed by the
/// version store; this type only guarantees the shape.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionId(String);

impl VersionId {
    /// Build an id from the leading bytes of a digest.
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        let mut hex = hex::encode(digest);
        hex.truncate(VERSION_ID_LEN);
        Self(hex)
    }

    /// Parse a user-supplied id, validating its shape.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let valid = s.len() == VERSION_ID_LEN
            && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !valid {
            return Err(TypeError::InvalidVersionId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VersionId({})", self.0)
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for VersionId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for VersionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for VersionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_digest_takes_prefix() {
        let id = VersionId::from_digest(&[0xab; 32]);
        assert_eq!(id.as_str(), "abababababab");
    }

    #[test]
    fn parse_accepts_valid_ids() {
        let id: VersionId = "0123456789ab".parse().unwrap();
        assert_eq!(id.to_string(), "0123456789ab");
    }

    #[test]
    fn parse_rejects_bad_shapes() {
        assert!(VersionId::parse("").is_err());
        assert!(VersionId::parse("0123456789").is_err());
        assert!(VersionId::parse("0123456789AB").is_err());
        assert!(VersionId::parse("0123456789xz").is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let id = VersionId::from_digest(&[7; 32]);
        let json = serde_json::to_string(&id).unwrap();
        let back: VersionId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
