//! Comparison strategies: decide whether two records denote the same item.

use crate::{FlightRecord, Timestamp};

/// Decides whether an item from the other list matches a master item.
///
/// Implementations must be pure. Anything judged "the same" here must be
/// acceptable as a matched pair for the merge strategy used alongside it.
pub trait CompareStrategy<T> {
    fn is_same_item(&self, other: &T, master: &T) -> bool;
}

impl<T, F> CompareStrategy<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn is_same_item(&self, other: &T, master: &T) -> bool {
        self(other, master)
    }
}

/// Structural equality of every field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExactMatch;

impl<T: PartialEq> CompareStrategy<T> for ExactMatch {
    fn is_same_item(&self, other: &T, master: &T) -> bool {
        other == master
    }
}

/// Equality ignoring id, timestamp and the acknowledgement flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentMatch;

impl CompareStrategy<FlightRecord> for ContentMatch {
    fn is_same_item(&self, other: &FlightRecord, master: &FlightRecord) -> bool {
        other.content_eq(master)
    }
}

/// Cross-source matching for imports, where identifiers differ by construction.
///
/// Two flights match when they share a route, both block times agree within
/// `time_tolerance` seconds and the aircraft do not contradict each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SameFlight {
    pub time_tolerance: Timestamp,
}

impl SameFlight {
    pub fn with_tolerance(time_tolerance: Timestamp) -> Self {
        Self {
            time_tolerance: time_tolerance.max(0),
        }
    }

    /// A negative tolerance matches nothing.
    fn times_agree(&self, a: Timestamp, b: Timestamp) -> bool {
        u64::try_from(self.time_tolerance).is_ok_and(|tolerance| a.abs_diff(b) <= tolerance)
    }

    fn aircraft_agree(a: &FlightRecord, b: &FlightRecord) -> bool {
        let both = |x: &str, y: &str| !x.trim().is_empty() && !y.trim().is_empty();
        if both(&a.registration, &b.registration) {
            return a.registration.trim().eq_ignore_ascii_case(b.registration.trim());
        }
        if both(&a.aircraft_type, &b.aircraft_type) {
            return a.aircraft_type.trim().eq_ignore_ascii_case(b.aircraft_type.trim());
        }
        true
    }
}

impl CompareStrategy<FlightRecord> for SameFlight {
    fn is_same_item(&self, other: &FlightRecord, master: &FlightRecord) -> bool {
        other.orig.trim().eq_ignore_ascii_case(master.orig.trim())
            && other.dest.trim().eq_ignore_ascii_case(master.dest.trim())
            && self.times_agree(other.time_out, master.time_out)
            && self.times_agree(other.time_in, master.time_in)
            && Self::aircraft_agree(other, master)
    }
}
