//! Flight record type.

use crate::{
    error::{Error, Result},
    RecordId, Timestamp, UNASSIGNED_ID,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A single logbook entry.
///
/// Records are values: the core never edits one in place, it produces a new
/// record through the `with_*` helpers or a merge strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlightRecord {
    /// Stable identifier, [`UNASSIGNED_ID`] until one is allocated
    pub id: RecordId,
    /// Departure aerodrome
    pub orig: String,
    /// Arrival aerodrome
    pub dest: String,
    /// Off-blocks time (seconds since epoch)
    pub time_out: Timestamp,
    /// On-blocks time (seconds since epoch)
    pub time_in: Timestamp,
    /// Manually corrected total time in minutes, 0 when derived from the time window
    pub corrected_total_time: u32,
    /// Multi-pilot time in minutes
    pub multi_pilot_time: u32,
    /// Instrument time in minutes
    pub ifr_time: u32,
    /// Night time in minutes
    pub night_time: u32,
    pub aircraft_type: String,
    pub registration: String,
    /// Pilot in command
    pub name: String,
    /// Other crew
    pub name2: String,
    pub remarks: String,
    pub takeoff_day: u32,
    pub takeoff_night: u32,
    pub landing_day: u32,
    pub landing_night: u32,
    pub is_pic: bool,
    pub is_picus: bool,
    pub is_copilot: bool,
    pub is_dual: bool,
    pub is_instructor: bool,
    pub is_sim: bool,
    pub is_pf: bool,
    /// Derived fields may be recalculated by the app
    pub auto_fill: bool,
    /// Planned (rostered) flight, never synced
    pub is_planned: bool,
    /// Last modification time (seconds since epoch)
    pub timestamp: Timestamp,
    /// Created locally and not yet acknowledged by the server
    pub unknown_to_server: bool,
}

impl Default for FlightRecord {
    fn default() -> Self {
        Self {
            id: UNASSIGNED_ID,
            orig: String::new(),
            dest: String::new(),
            time_out: 0,
            time_in: 0,
            corrected_total_time: 0,
            multi_pilot_time: 0,
            ifr_time: 0,
            night_time: 0,
            aircraft_type: String::new(),
            registration: String::new(),
            name: String::new(),
            name2: String::new(),
            remarks: String::new(),
            takeoff_day: 0,
            takeoff_night: 0,
            landing_day: 0,
            landing_night: 0,
            is_pic: false,
            is_picus: false,
            is_copilot: false,
            is_dual: false,
            is_instructor: false,
            is_sim: false,
            is_pf: false,
            auto_fill: true,
            is_planned: false,
            timestamp: 0,
            unknown_to_server: false,
        }
    }
}

impl FlightRecord {
    /// Create a flight between two aerodromes with the given time window.
    pub fn new(
        orig: impl Into<String>,
        dest: impl Into<String>,
        time_out: Timestamp,
        time_in: Timestamp,
    ) -> Self {
        Self {
            orig: orig.into(),
            dest: dest.into(),
            time_out,
            time_in,
            ..Self::default()
        }
    }

    /// Whether this record carries a real identifier.
    pub fn is_assigned(&self) -> bool {
        self.id > 0
    }

    /// Total flight time in minutes.
    ///
    /// A corrected total overrides the time window. A window that ends before
    /// it starts counts as zero.
    pub fn total_time(&self) -> u32 {
        if self.corrected_total_time > 0 {
            return self.corrected_total_time;
        }
        let minutes = self.time_in.saturating_sub(self.time_out).max(0) / 60;
        u32::try_from(minutes).unwrap_or(u32::MAX)
    }

    /// Copy of this record with another identifier.
    pub fn with_id(&self, id: RecordId) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }

    /// Copy of this record with another modification time.
    pub fn with_timestamp(&self, timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            ..self.clone()
        }
    }

    /// Copy of this record marked as known to the server.
    pub fn acknowledged(&self) -> Self {
        Self {
            unknown_to_server: false,
            ..self.clone()
        }
    }

    /// Equal in every field except id, timestamp and the acknowledgement flag.
    pub fn content_eq(&self, other: &Self) -> bool {
        let normalize = |r: &Self| Self {
            id: UNASSIGNED_ID,
            timestamp: 0,
            unknown_to_server: false,
            ..r.clone()
        };
        normalize(self) == normalize(other)
    }

    /// Reject records whose time window runs backwards.
    pub fn validate(&self) -> Result<()> {
        if self.time_in < self.time_out {
            return Err(Error::InvalidRecord(format!(
                "flight {} -> {} arrives ({}) before it departs ({})",
                self.orig, self.dest, self.time_in, self.time_out
            )));
        }
        Ok(())
    }

    /// Feed everything except the acknowledgement flag into a hasher.
    ///
    /// Strings are length-prefixed so adjacent fields cannot alias.
    pub(crate) fn digest_into(&self, hasher: &mut Sha256) {
        let mut text = |s: &str| {
            hasher.update((s.len() as u64).to_le_bytes());
            hasher.update(s.as_bytes());
        };
        text(&self.orig);
        text(&self.dest);
        text(&self.aircraft_type);
        text(&self.registration);
        text(&self.name);
        text(&self.name2);
        text(&self.remarks);

        for value in [self.id, self.time_out, self.time_in, self.timestamp] {
            hasher.update(value.to_le_bytes());
        }
        for value in [
            self.corrected_total_time,
            self.multi_pilot_time,
            self.ifr_time,
            self.night_time,
            self.takeoff_day,
            self.takeoff_night,
            self.landing_day,
            self.landing_night,
        ] {
            hasher.update(value.to_le_bytes());
        }
        hasher.update([
            u8::from(self.is_pic),
            u8::from(self.is_picus),
            u8::from(self.is_copilot),
            u8::from(self.is_dual),
            u8::from(self.is_instructor),
            u8::from(self.is_sim),
            u8::from(self.is_pf),
            u8::from(self.auto_fill),
            u8::from(self.is_planned),
        ]);
    }
}
