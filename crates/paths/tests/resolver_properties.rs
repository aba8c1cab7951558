//! Property tests for the string-level resolver helpers.

use paths::{is_descendant_of, normalize_separators, relative_to};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9_.]{1,8}".prop_filter("dot segments", |s| s != "." && s != "..")
}

fn absolute(max: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..max).prop_map(|segments| format!("/{}", segments.join("/")))
}

proptest! {
    #[test]
    fn joined_child_round_trips(ancestor in absolute(4), child in prop::collection::vec(segment(), 1..4)) {
        let child = child.join("/");
        let candidate = format!("{ancestor}/{child}");
        prop_assert_eq!(relative_to(&ancestor, &candidate), child);
        prop_assert!(is_descendant_of(&candidate, &ancestor));
    }

    #[test]
    fn backslash_inputs_match_forward_slash_inputs(ancestor in absolute(4), child in prop::collection::vec(segment(), 1..4)) {
        let candidate = format!("{ancestor}/{}", child.join("/"));
        let windows_ancestor = ancestor.replace('/', "\\");
        let windows_candidate = candidate.replace('/', "\\");
        prop_assert_eq!(
            relative_to(&windows_ancestor, &windows_candidate),
            relative_to(&ancestor, &candidate)
        );
    }

    #[test]
    fn suffixed_sibling_is_never_a_descendant(ancestor in absolute(4), suffix in "[a-z0-9_]{1,4}") {
        let sibling = format!("{ancestor}{suffix}");
        prop_assert!(!is_descendant_of(&sibling, &ancestor));
        prop_assert_eq!(relative_to(&ancestor, &sibling), sibling);
    }

    #[test]
    fn self_relative_is_empty(path in absolute(5)) {
        prop_assert_eq!(relative_to(&path, &path), "");
        prop_assert_eq!(relative_to(&format!("{path}/"), &path), "");
    }

    #[test]
    fn normalization_is_idempotent(raw in "[a-z\\\\/]{0,16}") {
        let once = normalize_separators(&raw);
        prop_assert_eq!(normalize_separators(&once), once.clone());
        prop_assert!(!once.contains('\\'));
    }
}
