//! Integration tests for support levels and the column accumulator

use parity_foundation::{ColumnAccumulator, SupportLevel};
use proptest::prelude::*;

fn level() -> impl Strategy<Value = SupportLevel> {
    (0u8..4).prop_map(|v| SupportLevel::from_ordinal(v).unwrap())
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn ordinals_match_the_serialized_values() {
    assert_eq!(SupportLevel::None.ordinal(), 0);
    assert_eq!(SupportLevel::Stubbed.ordinal(), 1);
    assert_eq!(SupportLevel::Partial.ordinal(), 2);
    assert_eq!(SupportLevel::Full.ordinal(), 3);
}

#[test]
fn all_is_sorted() {
    let mut sorted = SupportLevel::ALL;
    sorted.sort();
    assert_eq!(sorted, SupportLevel::ALL);
}

// =============================================================================
// Column Merge
// =============================================================================

#[test]
fn merge_is_order_sensitive() {
    let forward: ColumnAccumulator = [SupportLevel::None, SupportLevel::Full]
        .into_iter()
        .collect();
    let backward: ColumnAccumulator = [SupportLevel::Full, SupportLevel::None]
        .into_iter()
        .collect();
    assert_eq!(forward.value(), Some(SupportLevel::Full));
    assert_eq!(backward.value(), Some(SupportLevel::Partial));
}

#[test]
fn full_demotes_to_partial_on_any_difference() {
    for other in [SupportLevel::None, SupportLevel::Stubbed, SupportLevel::Partial] {
        let acc: ColumnAccumulator = [SupportLevel::Full, other].into_iter().collect();
        assert_eq!(acc.value(), Some(SupportLevel::Partial), "Full then {other:?}");
    }
}

#[test]
fn demoted_column_can_recover_to_full() {
    let acc: ColumnAccumulator = [SupportLevel::Full, SupportLevel::None, SupportLevel::Full]
        .into_iter()
        .collect();
    assert_eq!(acc.value(), Some(SupportLevel::Full));
}

#[test]
fn stubbed_then_none_stays_stubbed() {
    let acc: ColumnAccumulator = [SupportLevel::Stubbed, SupportLevel::None]
        .into_iter()
        .collect();
    assert_eq!(acc.value(), Some(SupportLevel::Stubbed));
}

proptest! {
    #[test]
    fn uniform_columns_keep_their_level(l in level(), n in 1usize..20) {
        let acc: ColumnAccumulator = std::iter::repeat_n(l, n).collect();
        prop_assert_eq!(acc.value(), Some(l));
    }

    #[test]
    fn without_full_the_merge_is_the_maximum(levels in prop::collection::vec(level(), 1..30)) {
        let levels: Vec<_> = levels.into_iter().filter(|l| !l.is_full()).collect();
        prop_assume!(!levels.is_empty());
        let acc: ColumnAccumulator = levels.iter().copied().collect();
        prop_assert_eq!(acc.value(), levels.iter().copied().max());
    }

    #[test]
    fn merge_never_falls_below_its_first_value(levels in prop::collection::vec(level(), 1..30)) {
        let acc: ColumnAccumulator = levels.iter().copied().collect();
        let value = acc.value().unwrap();
        let floor = levels[0].min(SupportLevel::Partial);
        prop_assert!(value >= floor);
    }
}
