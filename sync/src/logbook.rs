//! Local logbook maintenance: importing flights, cleaning up duplicates,
//! exporting snapshots and summarizing the replica.

use crate::error::{StoreError, StoreResult};
use crate::store::LocalStore;
use logbook_engine::{
    find_duplicates, merge_lists, Checksum, Error as EngineError, FlightRecord, LogbookSnapshot,
    MergeOnto, NextFreeId, RecordId, SameFlight, Timestamp,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// What an import changed in the local logbook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub added: usize,
    pub updated: usize,
    /// Imported flights that matched a logged flight without changing it
    pub unchanged: usize,
}

/// Summary of the local replica.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogbookStatus {
    pub records: usize,
    pub planned: usize,
    /// Records the server has not acknowledged yet
    pub unacknowledged: usize,
    pub checksum: Checksum,
}

/// Merge imported flights into the stored logbook.
///
/// Imported flights that match a logged flight (same route and aircraft,
/// times within `time_tolerance` seconds) are merged onto it and keep the
/// logged id. Everything else is added under a fresh id when its own id is
/// missing or already taken. Added and changed records are stamped with
/// `now`; added records are flagged as unknown to the server.
pub async fn import_records<S>(
    store: &S,
    imported: &[FlightRecord],
    time_tolerance: Timestamp,
    now: Timestamp,
) -> StoreResult<ImportReport>
where
    S: LocalStore + ?Sized,
{
    let mut seen = HashSet::new();
    for record in imported {
        record.validate()?;
        if record.is_assigned() && !seen.insert(record.id) {
            return Err(StoreError::Engine(EngineError::DuplicateId(record.id)));
        }
    }

    let existing = store.get_all_records().await?;
    let before: HashMap<RecordId, &FlightRecord> = existing.iter().map(|r| (r.id, r)).collect();

    let mut ids = NextFreeId::for_lists(&existing, imported);
    let merged = merge_lists(
        &existing,
        imported,
        &SameFlight::with_tolerance(time_tolerance),
        &MergeOnto::default(),
        &mut ids,
    );

    let mut report = ImportReport::default();
    let mut changed = Vec::new();
    for record in merged {
        match before.get(&record.id) {
            None => {
                report.added += 1;
                changed.push(FlightRecord {
                    unknown_to_server: true,
                    timestamp: now,
                    ..record
                });
            }
            Some(old) if !old.content_eq(&record) => {
                report.updated += 1;
                changed.push(record.with_timestamp(now));
            }
            Some(_) => {}
        }
    }
    report.unchanged = imported.len() - report.added - report.updated;

    store.save_records(&changed).await?;

    tracing::info!(
        added = report.added,
        updated = report.updated,
        unchanged = report.unchanged,
        "Imported flights"
    );
    Ok(report)
}

/// Hard-delete stored records that repeat an earlier record's content.
///
/// Returns the deleted records.
pub async fn remove_duplicate_records<S>(store: &S) -> StoreResult<Vec<FlightRecord>>
where
    S: LocalStore + ?Sized,
{
    let records = store.get_all_records().await?;
    let duplicates = find_duplicates(&records);

    if !duplicates.is_empty() {
        store.delete_records_hard(&duplicates).await?;
        tracing::info!(removed = duplicates.len(), "Removed duplicate flights");
    }

    Ok(duplicates)
}

/// Snapshot of every stored record.
pub async fn export_snapshot<S>(store: &S, exported_at: Timestamp) -> StoreResult<LogbookSnapshot>
where
    S: LocalStore + ?Sized,
{
    let records = store.get_all_records().await?;
    Ok(LogbookSnapshot::from_records(records, exported_at)?)
}

pub async fn logbook_status<S>(store: &S) -> StoreResult<LogbookStatus>
where
    S: LocalStore + ?Sized,
{
    let records = store.get_all_records().await?;

    Ok(LogbookStatus {
        records: records.len(),
        planned: records.iter().filter(|r| r.is_planned).count(),
        unacknowledged: records.iter().filter(|r| r.unknown_to_server).count(),
        checksum: Checksum::of(&records),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use logbook_engine::UNASSIGNED_ID;

    const NOW: Timestamp = 1_700_000_000;

    fn logged(id: RecordId, time_out: Timestamp) -> FlightRecord {
        FlightRecord {
            id,
            registration: "PH-BXA".into(),
            aircraft_type: "B738".into(),
            timestamp: 100,
            ..FlightRecord::new("EHAM", "LEMD", time_out, time_out + 9_000)
        }
    }

    #[tokio::test]
    async fn import_merges_adds_and_counts() {
        let store = MemoryStore::with_records([logged(1, 0), logged(2, 50_000)]);

        let imported = vec![
            // Same as flight 1, nothing new
            logged(UNASSIGNED_ID, 0),
            // Flight 2 with remarks added
            FlightRecord {
                remarks: "crosswind".into(),
                ..logged(UNASSIGNED_ID, 50_000)
            },
            // Not in the logbook yet
            logged(UNASSIGNED_ID, 100_000),
        ];

        let report = import_records(&store, &imported, 0, NOW).await.unwrap();
        assert_eq!(
            report,
            ImportReport {
                added: 1,
                updated: 1,
                unchanged: 1
            }
        );

        assert_eq!(store.get(1).unwrap().timestamp, 100);

        let updated = store.get(2).unwrap();
        assert_eq!(updated.remarks, "crosswind");
        assert_eq!(updated.timestamp, NOW);

        let added = store.get(3).unwrap();
        assert!(added.unknown_to_server);
        assert_eq!(added.timestamp, NOW);
    }

    #[tokio::test]
    async fn import_respects_time_tolerance() {
        let store = MemoryStore::with_records([logged(1, 0)]);
        let shifted = vec![logged(UNASSIGNED_ID, 120)];

        let strict = import_records(&store, &shifted, 0, NOW).await.unwrap();
        assert_eq!(strict.added, 1);

        let store = MemoryStore::with_records([logged(1, 0)]);
        let lenient = import_records(&store, &shifted, 300, NOW).await.unwrap();
        assert_eq!(lenient.added, 0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn import_rejects_invalid_records() {
        let store = MemoryStore::new();
        let backwards = FlightRecord::new("EHAM", "LEMD", 9_000, 0);

        let err = import_records(&store, &[backwards], 0, NOW)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Engine(EngineError::InvalidRecord(_))
        ));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn import_rejects_repeated_ids() {
        let store = MemoryStore::new();
        let err = import_records(&store, &[logged(4, 0), logged(4, 50_000)], 0, NOW)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Engine(EngineError::DuplicateId(4))
        ));
    }

    #[tokio::test]
    async fn duplicates_are_deleted() {
        let store = MemoryStore::with_records([logged(1, 0), logged(2, 0), logged(3, 50_000)]);

        let removed = remove_duplicate_records(&store).await.unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, 2);
        assert_eq!(store.len(), 2);

        assert!(remove_duplicate_records(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn status_counts() {
        let store = MemoryStore::with_records([
            logged(1, 0),
            FlightRecord {
                unknown_to_server: true,
                ..logged(2, 50_000)
            },
            FlightRecord {
                is_planned: true,
                ..logged(3, 100_000)
            },
        ]);

        let status = logbook_status(&store).await.unwrap();
        assert_eq!(status.records, 3);
        assert_eq!(status.planned, 1);
        assert_eq!(status.unacknowledged, 1);
        assert_eq!(
            status.checksum,
            Checksum::of(&store.get_all_records().await.unwrap())
        );
    }

    #[tokio::test]
    async fn export_contains_every_record() {
        let store = MemoryStore::with_records([logged(1, 0), logged(2, 50_000)]);
        let snapshot = export_snapshot(&store, NOW).await.unwrap();
        assert_eq!(snapshot.record_count(), 2);
        assert_eq!(snapshot.exported_at, NOW);
    }

    #[tokio::test]
    async fn status_serializes_checksum_as_hex() {
        let store = MemoryStore::with_records([logged(1, 0)]);
        let status = logbook_status(&store).await.unwrap();

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["records"], 1);
        assert_eq!(json["unacknowledged"], 0);
        assert_eq!(json["checksum"], status.checksum.to_string());
    }
}
