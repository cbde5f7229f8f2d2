//! Duplicate detection for post-hoc cleanup.

use crate::FlightRecord;

/// Records that are content-equal to another record with a lower identifier.
///
/// The lowest identifier of each group of identical flights is kept; the
/// rest are returned so the caller can delete them locally and remotely.
pub fn find_duplicates(records: &[FlightRecord]) -> Vec<FlightRecord> {
    split_duplicates(records).1
}

/// Split records into keepers and duplicates, both ordered by identifier.
pub fn split_duplicates(records: &[FlightRecord]) -> (Vec<FlightRecord>, Vec<FlightRecord>) {
    let mut sorted: Vec<&FlightRecord> = records.iter().collect();
    sorted.sort_by_key(|record| record.id);

    let mut keepers: Vec<FlightRecord> = Vec::new();
    let mut duplicates = Vec::new();
    for candidate in sorted {
        if keepers.iter().any(|kept| kept.content_eq(candidate)) {
            duplicates.push(candidate.clone());
        } else {
            keepers.push(candidate.clone());
        }
    }
    (keepers, duplicates)
}
