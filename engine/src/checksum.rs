//! Order-independent content checksum of a record collection.
//!
//! Two replicas with equal checksums hold the same non-planned records, so a
//! sync can stop after a single round trip.

use crate::FlightRecord;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 digest over the sorted per-record digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checksum([u8; 32]);

impl Checksum {
    /// Checksum of every non-planned record in `records`, in any order.
    pub fn of<'a>(records: impl IntoIterator<Item = &'a FlightRecord>) -> Self {
        let mut digests: Vec<[u8; 32]> = records
            .into_iter()
            .filter(|record| !record.is_planned)
            .map(|record| {
                let mut hasher = Sha256::new();
                record.digest_into(&mut hasher);
                hasher.finalize().into()
            })
            .collect();
        digests.sort_unstable();

        let mut hasher = Sha256::new();
        hasher.update((digests.len() as u64).to_le_bytes());
        for digest in &digests {
            hasher.update(digest);
        }
        Self(hasher.finalize().into())
    }

    /// Parse a 64 character hex string.
    pub fn from_hex(text: &str) -> Option<Self> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(text, &mut bytes).ok()?;
        Some(Self(bytes))
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Serialize for Checksum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Checksum {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid checksum: {hex}")))
    }
}
