//! Integration tests for comparison trees
//!
//! Tests key order, path lookup, pruning, and structural sharing.

use parity_foundation::{ComparisonNode, ComparisonTree, FullAndFilteredComparisons, SupportLevel};
use proptest::prelude::*;

fn leaf_tree(entries: &[(&str, SupportLevel)]) -> ComparisonTree {
    entries.iter().map(|&(k, v)| (k, v)).collect()
}

/// Generates trees up to three levels deep with short lowercase keys.
fn arb_tree() -> impl Strategy<Value = ComparisonTree> {
    let level =
        (0u8..4).prop_map(|v| ComparisonNode::Level(SupportLevel::from_ordinal(v).unwrap()));
    let node = level.prop_recursive(3, 32, 4, |inner| {
        prop::collection::btree_map("[a-e]{1,2}", inner, 0..4)
            .prop_map(|m| ComparisonNode::Tree(m.into_iter().collect::<ComparisonTree>()))
    });
    prop::collection::btree_map("[a-e]{1,2}", node, 0..6)
        .prop_map(|m| m.into_iter().collect::<ComparisonTree>())
}

// =============================================================================
// Structure
// =============================================================================

#[test]
fn insertion_order_does_not_affect_iteration() {
    let a = leaf_tree(&[("zeta", SupportLevel::Full), ("alpha", SupportLevel::None)]);
    let b = leaf_tree(&[("alpha", SupportLevel::None), ("zeta", SupportLevel::Full)]);
    assert_eq!(a, b);
    assert_eq!(a.keys().collect::<Vec<_>>(), vec!["alpha", "zeta"]);
}

#[test]
fn clones_are_independent() {
    let original = leaf_tree(&[("a", SupportLevel::Full)]);
    let mut copy = original.clone();
    copy.insert("b", SupportLevel::None);
    assert_eq!(original.len(), 1);
    assert_eq!(copy.len(), 2);
}

#[test]
fn level_at_does_not_return_containers() {
    let mut tree = ComparisonTree::new();
    tree.insert("Widget", leaf_tree(&[("render", SupportLevel::Full)]));
    assert_eq!(tree.level_at(&["Widget"]), None);
    assert_eq!(tree.level_at(&["Widget", "render"]), Some(SupportLevel::Full));
}

// =============================================================================
// Filtering
// =============================================================================

#[test]
fn filtered_keeps_only_imperfect_paths() {
    let mut full = ComparisonTree::new();
    full.insert(
        "window",
        leaf_tree(&[("show", SupportLevel::Full), ("hide", SupportLevel::Stubbed)]),
    );
    full.insert("Perfect", leaf_tree(&[("x", SupportLevel::Full)]));
    full.insert("Empty", ComparisonTree::new());
    let pair = FullAndFilteredComparisons::from_full(full);

    assert_eq!(pair.filtered.keys().collect::<Vec<_>>(), vec!["window"]);
    assert_eq!(
        pair.filtered.leaves(),
        vec![(vec!["window".to_string(), "hide".to_string()], SupportLevel::Stubbed)]
    );
}

proptest! {
    #[test]
    fn filtered_is_a_subtree_of_full(tree in arb_tree()) {
        let pair = FullAndFilteredComparisons::from_full(tree);
        prop_assert!(pair.filtered.is_subtree_of(&pair.full));
    }

    #[test]
    fn filtered_leaves_are_exactly_the_imperfect_leaves(tree in arb_tree()) {
        let pair = FullAndFilteredComparisons::from_full(tree);
        let expected: Vec<_> = pair
            .full
            .leaves()
            .into_iter()
            .filter(|(_, level)| !level.is_full())
            .collect();
        prop_assert_eq!(pair.filtered.leaves(), expected);
    }

    #[test]
    fn filtering_is_idempotent(tree in arb_tree()) {
        let once = tree.imperfections();
        prop_assert_eq!(once.imperfections(), once);
    }
}
