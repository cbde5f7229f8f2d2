//! Identifier allocation for items entering a list from the other side.

use crate::{FlightRecord, RecordId};
use std::collections::HashSet;

/// Items that carry a stable integer identifier.
pub trait Identified {
    fn id(&self) -> RecordId;
    fn with_id(&self, id: RecordId) -> Self;

    fn is_assigned(&self) -> bool {
        self.id() > 0
    }
}

impl Identified for FlightRecord {
    fn id(&self) -> RecordId {
        self.id
    }

    fn with_id(&self, id: RecordId) -> Self {
        FlightRecord::with_id(self, id)
    }
}

/// Decides whether an unmatched item needs a new identifier and assigns it.
pub trait IdStrategy<T> {
    fn id_needs_updating(&self, item: &T) -> bool;
    fn update_id_for_item(&mut self, item: T) -> T;
}

/// Allocates identifiers above the highest one seen in either list.
///
/// An item needs a new identifier when it has none or when its identifier is
/// already taken in the master list. Allocations within one instance never
/// repeat.
#[derive(Debug, Clone, Default)]
pub struct NextFreeId {
    taken: HashSet<RecordId>,
    highest: RecordId,
}

impl NextFreeId {
    /// Prepare an allocator for merging `other` into `master`.
    pub fn for_lists<T: Identified>(master: &[T], other: &[T]) -> Self {
        let taken: HashSet<_> = master.iter().map(Identified::id).collect();
        let highest = master
            .iter()
            .chain(other)
            .map(Identified::id)
            .max()
            .unwrap_or(0)
            .max(0);
        Self { taken, highest }
    }

    /// Highest identifier seen or allocated so far.
    pub fn highest(&self) -> RecordId {
        self.highest
    }

    /// Reserve the next identifier.
    pub fn next_id(&mut self) -> RecordId {
        self.highest += 1;
        self.taken.insert(self.highest);
        self.highest
    }
}

impl<T: Identified> IdStrategy<T> for NextFreeId {
    fn id_needs_updating(&self, item: &T) -> bool {
        !item.is_assigned() || self.taken.contains(&item.id())
    }

    fn update_id_for_item(&mut self, item: T) -> T {
        let id = self.next_id();
        item.with_id(id)
    }
}
