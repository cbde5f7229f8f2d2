//! Field-merge strategies: combine a matched (incoming, existing) pair.
//!
//! The shipped [`MergeOnto`] policy is deliberately asymmetric. Values a pilot
//! corrected by hand on the existing record survive an import, while data the
//! app filled in automatically is refreshed from the incoming record.

use crate::FlightRecord;
use serde::{Deserialize, Serialize};

/// Produces the merged record for a matched pair. Must be total and pure.
pub trait MergeStrategy<T> {
    fn merge_items(&self, incoming: &T, existing: &T) -> T;
}

impl<T, F> MergeStrategy<T> for F
where
    F: Fn(&T, &T) -> T,
{
    fn merge_items(&self, incoming: &T, existing: &T) -> T {
        self(incoming, existing)
    }
}

/// Which side's identifier the merged record keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeepId {
    #[default]
    Existing,
    Incoming,
}

/// Merge the incoming record onto the existing one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOnto {
    pub keep_id: KeepId,
}

impl MergeOnto {
    pub fn keeping(keep_id: KeepId) -> Self {
        Self { keep_id }
    }
}

fn prefer_incoming(incoming: &str, existing: &str) -> String {
    if incoming.trim().is_empty() {
        existing.to_string()
    } else {
        incoming.to_string()
    }
}

/// Duration rule shared by multi-pilot, instrument and night time.
///
/// `whole_flight` is the existing record's total time and `incoming_total`
/// the incoming one's; a value covering the whole flight follows the new
/// total, anything else entered by hand is left alone.
fn merge_duration(
    auto_fill: bool,
    incoming: u32,
    existing: u32,
    whole_flight: u32,
    incoming_total: u32,
) -> u32 {
    if auto_fill {
        return if incoming != 0 { incoming } else { existing };
    }
    match existing {
        0 => 0,
        value if value == whole_flight => incoming_total,
        value => value,
    }
}

impl MergeStrategy<FlightRecord> for MergeOnto {
    fn merge_items(&self, incoming: &FlightRecord, existing: &FlightRecord) -> FlightRecord {
        let whole_flight = existing.total_time();
        let incoming_total = incoming.total_time();
        let duration = |incoming_value: u32, existing_value: u32| {
            merge_duration(
                existing.auto_fill,
                incoming_value,
                existing_value,
                whole_flight,
                incoming_total,
            )
        };

        let multi_pilot_time = duration(incoming.multi_pilot_time, existing.multi_pilot_time);
        let is_pic = incoming.is_pic || existing.is_pic;

        FlightRecord {
            id: match self.keep_id {
                KeepId::Existing => existing.id,
                KeepId::Incoming => incoming.id,
            },
            time_out: incoming.time_out,
            time_in: incoming.time_in,
            orig: prefer_incoming(&incoming.orig, &existing.orig),
            dest: prefer_incoming(&incoming.dest, &existing.dest),
            aircraft_type: prefer_incoming(&incoming.aircraft_type, &existing.aircraft_type),
            registration: prefer_incoming(&incoming.registration, &existing.registration),
            name: prefer_incoming(&incoming.name, &existing.name),
            name2: prefer_incoming(&incoming.name2, &existing.name2),
            remarks: prefer_incoming(&incoming.remarks, &existing.remarks),
            multi_pilot_time,
            ifr_time: duration(incoming.ifr_time, existing.ifr_time),
            night_time: duration(incoming.night_time, existing.night_time),
            is_pic,
            is_picus: incoming.is_picus || existing.is_picus,
            is_copilot: multi_pilot_time != 0 && !is_pic,
            ..existing.clone()
        }
    }
}
