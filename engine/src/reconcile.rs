//! Generic list reconciliation.
//!
//! Combines a master list with another list using three interchangeable
//! strategies. Pure and deterministic: the same inputs always produce the
//! same output, in the same order.
//!
//! # Algorithm
//!
//! 1. Each other item is paired with the first unclaimed master item it matches
//! 2. Matched pairs are merged, unmatched other items get an identifier if needed
//! 3. Master items nobody claimed pass through unchanged
//! 4. Result is `unmatched master ++ merged ++ new`

use crate::compare::CompareStrategy;
use crate::ids::IdStrategy;
use crate::merge::MergeStrategy;

/// Merge `other` into `master`.
///
/// When an other item matches several master items, the first one in master
/// order that no earlier other item has claimed wins. An other item whose
/// matches are all claimed is treated as new, so a master item is merged at
/// most once. Master items that end up unclaimed pass through unchanged.
pub fn merge_lists<T, C, M, I>(
    master: &[T],
    other: &[T],
    compare: &C,
    merge: &M,
    ids: &mut I,
) -> Vec<T>
where
    T: Clone,
    C: CompareStrategy<T> + ?Sized,
    M: MergeStrategy<T> + ?Sized,
    I: IdStrategy<T> + ?Sized,
{
    let mut claimed = vec![false; master.len()];
    let mut merged = Vec::new();
    let mut new_items = Vec::new();

    for item in other {
        let counterpart = (0..master.len())
            .find(|&index| !claimed[index] && compare.is_same_item(item, &master[index]));

        match counterpart {
            Some(index) => {
                claimed[index] = true;
                merged.push(merge.merge_items(item, &master[index]));
            }
            None if ids.id_needs_updating(item) => {
                new_items.push(ids.update_id_for_item(item.clone()));
            }
            None => new_items.push(item.clone()),
        }
    }

    let untouched = master
        .iter()
        .zip(&claimed)
        .filter(|(_, taken)| !**taken)
        .map(|(existing, _)| existing.clone());

    untouched.chain(merged).chain(new_items).collect()
}

/// Reusable bundle of strategies for repeated merges.
#[derive(Debug, Clone, Default)]
pub struct Reconciler<C, M> {
    compare: C,
    merge: M,
}

impl<C, M> Reconciler<C, M> {
    pub fn new(compare: C, merge: M) -> Self {
        Self { compare, merge }
    }

    /// Merge `other` into `master` with the bundled strategies.
    pub fn reconcile<T, I>(&self, master: &[T], other: &[T], ids: &mut I) -> Vec<T>
    where
        T: Clone,
        C: CompareStrategy<T>,
        M: MergeStrategy<T>,
        I: IdStrategy<T>,
    {
        merge_lists(master, other, &self.compare, &self.merge, ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{ExactMatch, SameFlight};
    use crate::ids::NextFreeId;
    use crate::merge::MergeOnto;
    use crate::{FlightRecord, RecordId, UNASSIGNED_ID};
    use std::collections::HashSet;

    fn flight(id: RecordId, orig: &str, dest: &str, time_out: i64) -> FlightRecord {
        FlightRecord {
            id,
            ..FlightRecord::new(orig, dest, time_out, time_out + 3600)
        }
    }

    fn merge_import(master: &[FlightRecord], other: &[FlightRecord]) -> Vec<FlightRecord> {
        let mut ids = NextFreeId::for_lists(master, other);
        merge_lists(
            master,
            other,
            &SameFlight::default(),
            &MergeOnto::default(),
            &mut ids,
        )
    }

    #[test]
    fn empty_other_returns_master() {
        let master = vec![flight(1, "A", "B", 0), flight(2, "B", "C", 7200)];
        assert_eq!(merge_import(&master, &[]), master);
    }

    #[test]
    fn empty_master_assigns_missing_ids_only() {
        let other = vec![
            flight(UNASSIGNED_ID, "A", "B", 0),
            flight(5, "B", "C", 7200),
            flight(UNASSIGNED_ID, "C", "D", 14_400),
        ];
        let result = merge_import(&[], &other);
        let ids: Vec<_> = result.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![6, 5, 7]);
    }

    #[test]
    fn order_is_untouched_then_merged_then_new() {
        let master = vec![flight(1, "A", "B", 0), flight(2, "B", "C", 7200)];
        let other = vec![
            flight(UNASSIGNED_ID, "X", "Y", 50_000),
            flight(UNASSIGNED_ID, "B", "C", 7200),
        ];
        let result = merge_import(&master, &other);
        let ids: Vec<_> = result.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(result[1].orig, "B");
        assert_eq!(result[2].orig, "X");
    }

    #[test]
    fn colliding_new_item_is_renumbered() {
        let master = vec![flight(1, "A", "B", 0)];
        let other = vec![flight(1, "Q", "R", 90_000)];
        let result = merge_import(&master, &other);
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].id, 2);
    }

    #[test]
    fn master_item_merged_at_most_once() {
        let master = vec![flight(1, "A", "B", 0)];
        let other = vec![
            FlightRecord {
                remarks: "first".into(),
                ..flight(UNASSIGNED_ID, "A", "B", 0)
            },
            FlightRecord {
                remarks: "second".into(),
                ..flight(UNASSIGNED_ID, "A", "B", 0)
            },
        ];
        let result = merge_import(&master, &other);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, 1);
        assert_eq!(result[0].remarks, "first");
        assert_eq!(result[1].id, 2);
        assert_eq!(result[1].remarks, "second");

        let unique: HashSet<_> = result.iter().map(|r| r.id).collect();
        assert_eq!(unique.len(), result.len());
    }

    #[test]
    fn closures_as_strategies() {
        let master = vec![1_i64, 2, 3];
        let other = vec![2_i64, 4];
        let mut seen = 0;
        struct Counting<'a>(&'a mut i32);
        impl IdStrategy<i64> for Counting<'_> {
            fn id_needs_updating(&self, _item: &i64) -> bool {
                false
            }
            fn update_id_for_item(&mut self, item: i64) -> i64 {
                *self.0 += 1;
                item
            }
        }
        let result = merge_lists(
            &master,
            &other,
            &|a: &i64, b: &i64| a == b,
            &|a: &i64, _b: &i64| a * 10,
            &mut Counting(&mut seen),
        );
        assert_eq!(result, vec![1, 3, 20, 4]);
        assert_eq!(seen, 0);
    }

    #[test]
    fn reconciler_bundle() {
        let reconciler = Reconciler::new(ExactMatch, MergeOnto::default());
        let master = vec![flight(1, "A", "B", 0)];
        let other = vec![flight(1, "A", "B", 0), flight(UNASSIGNED_ID, "B", "A", 9000)];
        let mut ids = NextFreeId::for_lists(&master, &other);
        let result = reconciler.reconcile(&master, &other, &mut ids);
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].id, 2);
    }
}
