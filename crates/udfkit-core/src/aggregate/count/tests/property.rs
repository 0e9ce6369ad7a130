use crate::{
    aggregate::{AggregateFunction, CountAggregate, CountMode, fold_partitions, fold_rows},
    value::{Value, ValueKind},
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn cell(v: Option<i8>) -> Value {
    v.map_or(Value::Null, |v| Value::Int(i64::from(v)))
}

// Small domains so duplicates and nulls are frequent.
fn arb_cell() -> impl Strategy<Value = Option<i8>> {
    prop::option::weighted(0.8, -3i8..4)
}

fn arb_pair_rows() -> impl Strategy<Value = Vec<(Option<i8>, Option<i8>)>> {
    prop::collection::vec((arb_cell(), arb_cell()), 0..48)
}

fn arb_batches() -> impl Strategy<Value = Vec<Option<Vec<Value>>>> {
    prop::collection::vec(prop::option::weighted(0.7, Just(Vec::new())), 0..48)
}

fn single_column(cells: &[Option<i8>]) -> Vec<Option<Vec<Value>>> {
    cells.iter().map(|c| Some(vec![cell(*c)])).collect()
}

proptest! {
    #[test]
    fn star_counts_every_present_batch(batches in arb_batches()) {
        let func = CountAggregate::try_new(&[], CountMode::star()).expect("count(*)");
        let expected = batches.iter().filter(|batch| batch.is_some()).count() as u64;

        prop_assert_eq!(fold_rows(&func, &batches).expect("fold"), expected);
    }

    #[test]
    fn value_count_equals_non_null_rows(cells in prop::collection::vec(arb_cell(), 0..64)) {
        let func = CountAggregate::try_new(&[ValueKind::Int], CountMode::values()).expect("count");
        let expected = cells.iter().filter(|c| c.is_some()).count() as u64;

        prop_assert_eq!(fold_rows(&func, &single_column(&cells)).expect("fold"), expected);
    }

    #[test]
    fn distinct_count_equals_distinct_non_null_rows(pairs in arb_pair_rows()) {
        let func = CountAggregate::try_new(
            &[ValueKind::Int, ValueKind::Int],
            CountMode::distinct(),
        )
        .expect("count distinct");
        let expected = pairs
            .iter()
            .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
            .collect::<BTreeSet<_>>()
            .len() as u64;
        let rows = pairs
            .iter()
            .map(|(a, b)| Some(vec![cell(*a), cell(*b)]))
            .collect::<Vec<_>>();

        prop_assert_eq!(fold_rows(&func, &rows).expect("fold"), expected);
    }

    #[test]
    fn distinct_count_is_order_independent(
        cells in prop::collection::vec(arb_cell(), 0..48),
        rotate in 0usize..48,
    ) {
        let func = CountAggregate::try_new(&[ValueKind::Int], CountMode::distinct())
            .expect("count distinct");
        let mut rotated = cells.clone();
        if !rotated.is_empty() {
            let by = rotate % rotated.len();
            rotated.rotate_left(by);
        }
        rotated.reverse();

        prop_assert_eq!(
            fold_rows(&func, &single_column(&cells)).expect("fold"),
            fold_rows(&func, &single_column(&rotated)).expect("fold"),
        );
    }

    #[test]
    fn split_then_merge_matches_single_state(
        cells in prop::collection::vec(arb_cell(), 0..64),
        split in 0usize..65,
    ) {
        let func = CountAggregate::try_new(&[ValueKind::Int], CountMode::values()).expect("count");
        let rows = single_column(&cells);
        let split = split.min(rows.len());
        let partitions = vec![rows[..split].to_vec(), rows[split..].to_vec()];

        prop_assert_eq!(
            fold_partitions(&func, &partitions).expect("partitioned fold"),
            fold_rows(&func, &rows).expect("single fold"),
        );
    }

    #[test]
    fn restricted_distinct_never_returns_a_partial(
        cells in prop::collection::vec(arb_cell(), 0..16),
        partial in prop::option::of(any::<u64>()),
    ) {
        let func = CountAggregate::try_new(
            &[ValueKind::Int],
            CountMode::distinct().with_restricted_merge(true),
        )
        .expect("windowed count distinct");
        let mut state = func.create_state();
        for row in single_column(&cells) {
            func.accumulate(&mut state, row.as_deref()).expect("accumulate");
        }
        let before = state.count();

        prop_assert!(func.merge(&mut state, partial).expect_err("merge").is_unsupported());
        prop_assert!(func.finalize_partial(&state).expect_err("partial").is_unsupported());
        prop_assert_eq!(state.count(), before);
    }
}
