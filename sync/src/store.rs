//! Local storage collaborator.
//!
//! The orchestrator and the logbook flows only see [`LocalStore`]. Two
//! implementations ship with the crate: [`MemoryStore`] here and the SQLite
//! backed [`crate::db::SqliteStore`].

use crate::error::StoreResult;
use async_trait::async_trait;
use dashmap::DashMap;
use logbook_engine::{FlightRecord, RecordId};
use std::sync::atomic::{AtomicI64, Ordering};

/// Persistent record storage for the local replica.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Every stored record, ordered by identifier.
    async fn get_all_records(&self) -> StoreResult<Vec<FlightRecord>>;

    /// Stored records among `ids`; unknown identifiers are skipped.
    async fn get_records_by_id(&self, ids: &[RecordId]) -> StoreResult<Vec<FlightRecord>>;

    /// Insert or replace records by identifier.
    async fn save_records(&self, records: &[FlightRecord]) -> StoreResult<()>;

    /// Remove records permanently.
    async fn delete_records_hard(&self, records: &[FlightRecord]) -> StoreResult<()>;

    /// Reserve an identifier strictly greater than `floor` and than any
    /// identifier stored or reserved before.
    async fn allocate_next_id(&self, floor: RecordId) -> StoreResult<RecordId>;
}

/// In-memory store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<RecordId, FlightRecord>,
    /// Highest identifier handed out by `allocate_next_id`
    reserved: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `records`.
    pub fn with_records(records: impl IntoIterator<Item = FlightRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.records.insert(record.id, record);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<FlightRecord> {
        self.records.get(&id).map(|entry| entry.value().clone())
    }

    fn highest_stored(&self) -> RecordId {
        self.records
            .iter()
            .map(|entry| *entry.key())
            .max()
            .unwrap_or(0)
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn get_all_records(&self) -> StoreResult<Vec<FlightRecord>> {
        let mut records: Vec<_> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|record| record.id);
        Ok(records)
    }

    async fn get_records_by_id(&self, ids: &[RecordId]) -> StoreResult<Vec<FlightRecord>> {
        Ok(ids.iter().filter_map(|&id| self.get(id)).collect())
    }

    async fn save_records(&self, records: &[FlightRecord]) -> StoreResult<()> {
        for record in records {
            self.records.insert(record.id, record.clone());
        }
        Ok(())
    }

    async fn delete_records_hard(&self, records: &[FlightRecord]) -> StoreResult<()> {
        for record in records {
            self.records.remove(&record.id);
        }
        Ok(())
    }

    async fn allocate_next_id(&self, floor: RecordId) -> StoreResult<RecordId> {
        let base = floor.max(self.highest_stored());
        let previous = self
            .reserved
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |reserved| {
                Some(reserved.max(base) + 1)
            })
            .unwrap_or_else(|current| current);
        Ok(previous.max(base) + 1)
    }
}
