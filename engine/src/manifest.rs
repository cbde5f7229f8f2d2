//! Manifests and transfer planning.
//!
//! A manifest lists `(id, timestamp)` pairs for a replica so two sides can
//! work out what to transfer without moving record bodies.

use crate::{FlightRecord, RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier and last-modified time of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub id: RecordId,
    pub timestamp: Timestamp,
}

impl ManifestEntry {
    pub fn new(id: RecordId, timestamp: Timestamp) -> Self {
        Self { id, timestamp }
    }
}

impl From<&FlightRecord> for ManifestEntry {
    fn from(record: &FlightRecord) -> Self {
        Self::new(record.id, record.timestamp)
    }
}

/// The contents of one replica, without record bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    /// Manifest of all non-planned records.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a FlightRecord>) -> Self {
        let entries = records
            .into_iter()
            .filter(|record| !record.is_planned)
            .map(ManifestEntry::from)
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest identifier in the manifest, 0 when empty.
    pub fn highest_id(&self) -> RecordId {
        self.entries
            .iter()
            .map(|entry| entry.id)
            .max()
            .unwrap_or(0)
            .max(0)
    }

    fn by_id(&self) -> HashMap<RecordId, Timestamp> {
        self.entries
            .iter()
            .map(|entry| (entry.id, entry.timestamp))
            .collect()
    }
}

impl From<Vec<ManifestEntry>> for Manifest {
    fn from(entries: Vec<ManifestEntry>) -> Self {
        Self::new(entries)
    }
}

/// Records to move in each direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferPlan {
    /// Identifiers to fetch from remote, ascending
    pub to_pull: Vec<RecordId>,
    /// Identifiers to send to remote, ascending
    pub to_push: Vec<RecordId>,
}

impl TransferPlan {
    /// Last writer wins per identifier.
    ///
    /// A remote entry is pulled when local has no entry with its id or the
    /// local entry is strictly older; pushing is symmetric. Equal timestamps
    /// move nothing.
    pub fn compute(local: &Manifest, remote: &Manifest) -> Self {
        Self {
            to_pull: newer_or_missing(remote, &local.by_id()),
            to_push: newer_or_missing(local, &remote.by_id()),
        }
    }

    pub fn is_synced(&self) -> bool {
        self.to_pull.is_empty() && self.to_push.is_empty()
    }
}

fn newer_or_missing(source: &Manifest, target: &HashMap<RecordId, Timestamp>) -> Vec<RecordId> {
    let mut ids: Vec<_> = source
        .entries
        .iter()
        .filter(|entry| match target.get(&entry.id) {
            None => true,
            Some(&theirs) => theirs < entry.timestamp,
        })
        .map(|entry| entry.id)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
