//! Property-based tests for head ordering, classification and sorting.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::classify::{classify, Classification, InputEntry};
    use crate::config::Remotes;
    use crate::head::{Head, RepoUrl};
    use crate::index::{CommitIndex, SortIndex};
    use crate::patch::PatchTags;
    use crate::sort::series_sort;
    use proptest::prelude::*;

    const REMOTES: &str = "remotes:\n  - url: torvalds/linux\n  - url: davem/net\n  - url: davem/net-next\n  - url: rdma/rdma\n    ref: for-next\n";

    fn remotes() -> Remotes {
        Remotes::parse(REMOTES).unwrap()
    }

    fn all_heads() -> Vec<Head> {
        remotes().all_heads().collect()
    }

    // ============================================================================
    // Head ordering
    // ============================================================================

    proptest! {
        /// Property: exactly one of a < b, a == b, a > b holds
        #[test]
        fn head_order_is_trichotomous(a in 0usize..5, b in 0usize..5) {
            let heads = all_heads();
            let (x, y) = (&heads[a], &heads[b]);
            let relations = [x < y, x == y, x > y];
            prop_assert_eq!(relations.iter().filter(|r| **r).count(), 1);
            prop_assert_eq!(x == y, a == b);
        }

        /// Property: head order is transitive and follows the remotes list
        #[test]
        fn head_order_is_transitive(a in 0usize..5, b in 0usize..5, c in 0usize..5) {
            let heads = all_heads();
            let (x, y, z) = (&heads[a], &heads[b], &heads[c]);
            if x < y && y < z {
                prop_assert!(x < z);
            }
            prop_assert_eq!(x < y, a < b);
        }

        /// Property: normalizing an already normalized URL changes nothing
        #[test]
        fn repo_url_normalization_is_idempotent(path in "[a-z]{1,8}/[a-z][a-z-]{0,8}") {
            let once = RepoUrl::new(&path);
            let twice = RepoUrl::new(once.full());
            prop_assert_eq!(&once, &twice);
            prop_assert_eq!(once.to_string(), path);
        }
    }

    // ============================================================================
    // Classification of patches without a commit
    // ============================================================================

    proptest! {
        /// Property: a patch without Git-commit is accepted exactly when its
        /// status starts with "Submitted" or "Not yet"
        #[test]
        fn no_commit_status_rule(prefix in "(Submitted|submitted|Not yet|NOT YET|Never|Queued|v4|Pending|)", rest in "[ ,a-z0-9]{0,12}") {
            let remotes = remotes();
            let index = SortIndex::new("test");
            let status = format!("{}{}", prefix, rest);
            let tags = PatchTags {
                mainline: vec![status.clone()],
                ..Default::default()
            };
            let result = classify("p", &tags, remotes.mainline(), &index, &remotes, false);
            let lower = status.to_lowercase();
            let accepted = lower.starts_with("submitted") || lower.starts_with("not yet");
            prop_assert_eq!(result.is_ok(), accepted, "status {:?}", status);
            if let Ok(class) = result {
                prop_assert_eq!(class.dest_head, Head::OutOfTree);
            }
        }
    }

    // ============================================================================
    // Sorting
    // ============================================================================

    fn entries_strategy() -> impl Strategy<Value = Vec<(usize, Option<u64>)>> {
        prop::collection::vec((0usize..5, prop::option::of(0u64..50)), 0..30)
    }

    fn build_entries(spec: &[(usize, Option<u64>)]) -> Vec<InputEntry> {
        let heads = all_heads();
        spec.iter()
            .enumerate()
            .map(|(i, (head, ordinal))| {
                // Indexed heads (the first two) always carry an ordinal.
                let ordinal = if *head < 2 { Some(ordinal.unwrap_or(0)) } else { None };
                InputEntry {
                    value: format!("\tp{}\n", i),
                    name: format!("p{}", i),
                    class: Classification {
                        dest_head: heads[*head].clone(),
                        ordinal,
                        revs: Vec::new(),
                        new_url: None,
                    },
                }
            })
            .collect()
    }

    fn index(remotes: &Remotes) -> SortIndex {
        let mut index = SortIndex::new("test");
        index.add_head(&remotes.heads()[0], Vec::<String>::new());
        index.add_head(&remotes.heads()[1], Vec::<String>::new());
        index
    }

    proptest! {
        /// Property: sorting a sorted series yields the same series
        #[test]
        fn sort_is_idempotent(spec in entries_strategy()) {
            let remotes = remotes();
            let index = index(&remotes);
            let once = series_sort(&index, &remotes, build_entries(&spec)).unwrap();
            let again = series_sort(&index, &remotes, once.entries().cloned().collect()).unwrap();
            prop_assert_eq!(once, again);
        }

        /// Property: sections follow head order and indexed sections are
        /// ordered by ordinal, keeping input order for equal ordinals
        #[test]
        fn sort_orders_sections_and_ordinals(spec in entries_strategy()) {
            let remotes = remotes();
            let index = index(&remotes);
            let input = build_entries(&spec);
            let sorted = series_sort(&index, &remotes, input.clone()).unwrap();

            prop_assert_eq!(sorted.entries().count(), input.len());
            for pair in sorted.sections.windows(2) {
                prop_assert!(pair[0].0 < pair[1].0);
            }
            for (head, entries) in &sorted.sections {
                prop_assert!(!entries.is_empty());
                let position = |e: &InputEntry| input.iter().position(|i| i.name == e.name);
                for pair in entries.windows(2) {
                    let (a, b) = (&pair[0], &pair[1]);
                    if index.is_available(head) && a.class.ordinal != b.class.ordinal {
                        prop_assert!(a.class.ordinal < b.class.ordinal);
                    } else {
                        prop_assert!(position(a) < position(b));
                    }
                }
            }
        }
    }
}
