//! Logbook snapshot files for import and export.
//!
//! Snapshots are the bridge between a stored logbook and a file on disk.
//! Records are keyed by identifier in a `BTreeMap`, so serialization order is
//! deterministic.

use crate::{error::Result, Error, FlightRecord, RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version of the snapshot format for future compatibility.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// A point-in-time copy of a logbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogbookSnapshot {
    /// Snapshot format version
    pub format_version: u32,
    /// When the snapshot was taken (seconds since epoch)
    pub exported_at: Timestamp,
    /// All records by identifier
    pub records: BTreeMap<RecordId, FlightRecord>,
}

impl LogbookSnapshot {
    /// Create a new empty snapshot.
    pub fn new(exported_at: Timestamp) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            exported_at,
            records: BTreeMap::new(),
        }
    }

    /// Build a snapshot from records that already carry unique identifiers.
    pub fn from_records(
        records: impl IntoIterator<Item = FlightRecord>,
        exported_at: Timestamp,
    ) -> Result<Self> {
        let mut snapshot = Self::new(exported_at);
        for record in records {
            if !record.is_assigned() {
                return Err(Error::InvalidRecord(format!(
                    "flight {} -> {} has no identifier",
                    record.orig, record.dest
                )));
            }
            if snapshot.records.contains_key(&record.id) {
                return Err(Error::DuplicateId(record.id));
            }
            snapshot.records.insert(record.id, record);
        }
        Ok(snapshot)
    }

    /// Records in identifier order.
    pub fn into_records(self) -> Vec<FlightRecord> {
        self.records.into_values().collect()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Serialize to pretty JSON with deterministic ordering.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidSnapshot(e.to_string()))?;

        if snapshot.format_version > SNAPSHOT_FORMAT_VERSION {
            return Err(Error::InvalidSnapshot(format!(
                "unsupported snapshot format version: {} (max supported: {})",
                snapshot.format_version, SNAPSHOT_FORMAT_VERSION
            )));
        }

        if let Some((key, record)) = snapshot.records.iter().find(|(key, r)| **key != r.id) {
            return Err(Error::InvalidSnapshot(format!(
                "record stored under id {key} claims id {}",
                record.id
            )));
        }

        Ok(snapshot)
    }
}

/// Parse flights from either a snapshot or a bare JSON array.
///
/// Bare arrays typically come from a parser and may lack identifiers.
pub fn parse_flights(json: &str) -> Result<Vec<FlightRecord>> {
    if json.trim_start().starts_with('[') {
        return serde_json::from_str(json).map_err(|e| Error::InvalidSnapshot(e.to_string()));
    }
    LogbookSnapshot::from_json(json).map(LogbookSnapshot::into_records)
}
