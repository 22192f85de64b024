//! Opaque document ids.
//!
//! Every persisted document carries a conventional `_id` field. The id is an
//! opaque 12-byte value: a 4-byte unix-seconds prefix followed by 8 random
//! bytes, rendered as 24 hex characters on the wire.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use rand::Rng;

use super::errors::DocError;

/// Opaque 12-byte identifier for persisted documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id([u8; 12]);

impl Id {
    /// Generates a fresh id: 4 bytes of unix time followed by 8 random bytes.
    pub fn new() -> Self {
        let mut bytes = [0u8; 12];
        let secs = Utc::now().timestamp() as u32;
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        rand::thread_rng().fill(&mut bytes[4..]);
        Self(bytes)
    }

    /// Creates an id from raw bytes.
    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes of the id.
    pub fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for Id {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| DocError::InvalidId {
            reason: format!("'{s}' is not valid hex: {e}"),
        })?;
        let bytes: [u8; 12] = bytes.try_into().map_err(|_| DocError::InvalidId {
            reason: format!("'{s}' is not 12 bytes"),
        })?;
        Ok(Self(bytes))
    }
}

impl serde::Serialize for Id {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
