//! Property-based tests for reconciling store convergence.
//!
//! These tests verify that the store's membership depends only on the set of
//! applied changes, never on their interleaving or duplication — the
//! property that makes the view converge when local optimistic mutations
//! race their remote echoes.

use std::collections::HashSet;

use proptest::prelude::*;
use smartmark::managers::store::{BookmarkStore, BookmarkStoreTrait};
use smartmark::types::bookmark::Bookmark;

fn bookmark(id: &str) -> Bookmark {
    Bookmark {
        id: id.to_string(),
        user_id: "user-1".to_string(),
        title: format!("Title {}", id),
        url: format!("https://example.com/{}", id),
        created_at: 1,
    }
}

/// One store mutation, keyed into a small id pool so sequences collide often.
#[derive(Debug, Clone)]
enum Op {
    Created(u8),
    LocalInsert(u8),
    Deleted(u8),
    LocalDelete(u8),
}

fn id_of(idx: u8) -> String {
    format!("id-{}", idx % 8)
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..8).prop_map(Op::Created),
        (0u8..8).prop_map(Op::LocalInsert),
        (0u8..8).prop_map(Op::Deleted),
        (0u8..8).prop_map(Op::LocalDelete),
    ]
}

/// Strategy for a subset of the id pool.
fn arb_id_subset() -> impl Strategy<Value = Vec<u8>> {
    proptest::sample::subsequence((0u8..8).collect::<Vec<_>>(), 0..=8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // **Membership follows set semantics**
    //
    // *For any* sequence of creates, local inserts, deletes, and local
    // deletes, the store's membership SHALL equal the fold of
    // insert/remove set operations over the same sequence — duplicates and
    // local/remote echoes change nothing.
    #[test]
    fn membership_matches_set_model(ops in proptest::collection::vec(arb_op(), 0..64)) {
        let mut store = BookmarkStore::new();
        store.load_snapshot(Vec::new());
        let mut model: HashSet<String> = HashSet::new();

        for op in ops {
            match op {
                Op::Created(i) => {
                    store.apply_created(bookmark(&id_of(i)));
                    model.insert(id_of(i));
                }
                Op::LocalInsert(i) => {
                    store.apply_local_insert(bookmark(&id_of(i)));
                    model.insert(id_of(i));
                }
                Op::Deleted(i) => {
                    store.apply_deleted(&id_of(i));
                    model.remove(&id_of(i));
                }
                Op::LocalDelete(i) => {
                    store.apply_local_delete(&id_of(i));
                    model.remove(&id_of(i));
                }
            }
        }

        let actual: HashSet<String> =
            store.bookmarks().iter().map(|b| b.id.clone()).collect();
        prop_assert_eq!(actual, model);

        // No id ever appears twice
        prop_assert_eq!(
            store.len(),
            store.bookmarks().iter().map(|b| &b.id).collect::<HashSet<_>>().len()
        );
    }

    // **Interleaving independence for disjoint ids**
    //
    // *For any* snapshot and any disjoint sets of created and deleted ids,
    // the final membership SHALL be snapshot ∪ created − deleted no matter
    // how the events are interleaved.
    #[test]
    fn disjoint_events_commute(
        snapshot_ids in arb_id_subset(),
        created_ids in proptest::sample::subsequence((8u8..16).collect::<Vec<_>>(), 0..=8),
        deleted_count in 0usize..=8,
        seed in any::<u64>(),
    ) {
        // Deleted ids are drawn from the snapshot; created ids are fresh
        let deleted_ids: Vec<u8> =
            snapshot_ids.iter().copied().take(deleted_count).collect();

        let mut events: Vec<(bool, u8)> = created_ids.iter().map(|&i| (true, i)).collect();
        events.extend(deleted_ids.iter().map(|&i| (false, i)));

        // Cheap deterministic shuffle from the seed
        let len = events.len();
        for i in (1..len).rev() {
            let j = (seed as usize).wrapping_mul(i + 31) % (i + 1);
            events.swap(i, j);
        }

        let mut store = BookmarkStore::new();
        store.load_snapshot(
            snapshot_ids.iter().map(|&i| bookmark(&format!("id-{}", i))).collect(),
        );

        for (is_create, i) in events {
            if is_create {
                store.apply_created(bookmark(&format!("id-{}", i)));
            } else {
                store.apply_deleted(&format!("id-{}", i));
            }
        }

        let mut expected: HashSet<String> =
            snapshot_ids.iter().map(|&i| format!("id-{}", i)).collect();
        for &i in &created_ids {
            expected.insert(format!("id-{}", i));
        }
        for &i in &deleted_ids {
            expected.remove(&format!("id-{}", i));
        }

        let actual: HashSet<String> =
            store.bookmarks().iter().map(|b| b.id.clone()).collect();
        prop_assert_eq!(actual, expected);
    }

    // **Insert idempotence by id**
    //
    // *For any* number of repeated creates and local inserts of the same id,
    // exactly one entry SHALL remain.
    #[test]
    fn repeated_inserts_keep_one_entry(repeats in 1usize..16, local_first in any::<bool>()) {
        let mut store = BookmarkStore::new();
        store.load_snapshot(Vec::new());

        for n in 0..repeats {
            if (n % 2 == 0) == local_first {
                store.apply_local_insert(bookmark("a"));
            } else {
                store.apply_created(bookmark("a"));
            }
        }

        prop_assert_eq!(store.len(), 1);
        prop_assert!(store.contains("a"));
    }

    // **Delete idempotence by id**
    //
    // *For any* number of repeated deletes and local deletes of the same id,
    // zero entries SHALL remain, whether or not the id was ever present.
    #[test]
    fn repeated_deletes_leave_no_entry(
        repeats in 1usize..16,
        present in any::<bool>(),
        local_first in any::<bool>(),
    ) {
        let mut store = BookmarkStore::new();
        let snapshot = if present { vec![bookmark("a")] } else { Vec::new() };
        store.load_snapshot(snapshot);

        for n in 0..repeats {
            if (n % 2 == 0) == local_first {
                store.apply_local_delete("a");
            } else {
                store.apply_deleted("a");
            }
        }

        prop_assert!(!store.contains("a"));
        prop_assert_eq!(store.len(), 0);
    }
}
