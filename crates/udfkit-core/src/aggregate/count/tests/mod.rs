mod property;

use crate::{
    aggregate::{
        AggregateFunction, AggregatePhase, CountAggregate, CountMode, CountSpecError,
        fold_partitions,
    },
    error::{Error, ErrorClass, ErrorOrigin},
    obs::{AccumulateOutcome, MetricsEvent, MetricsSink, with_metrics_sink},
    value::{Value, ValueKind},
};
use std::cell::RefCell;

fn count(arguments: &[ValueKind], mode: CountMode) -> CountAggregate {
    CountAggregate::try_new(arguments, mode).expect("count construction should succeed")
}

fn int(v: i64) -> Value {
    Value::Int(v)
}

fn accumulate_all(func: &CountAggregate, rows: &[Vec<Value>]) -> u64 {
    let mut state = func.create_state();
    for row in rows {
        func.accumulate(&mut state, Some(row))
            .expect("accumulate should succeed");
    }

    func.finalize(&state)
}

fn spec_error(arguments: &[ValueKind], mode: CountMode) -> Error {
    CountAggregate::try_new(arguments, mode).expect_err("construction should fail")
}

///
/// Construction
///

#[test]
fn star_requires_count_all_rows() {
    let err = spec_error(&[], CountMode::values());

    assert_eq!(err.class, ErrorClass::Configuration);
    assert_eq!(err.origin, ErrorOrigin::Aggregate);
    assert_eq!(err.message, CountSpecError::ArgumentExpected.to_string());
}

#[test]
fn star_rejects_distinct() {
    let mode = CountMode {
        count_all_rows: true,
        distinct: true,
        restricted_merge: false,
    };
    let err = spec_error(&[], mode);

    assert!(err.is_configuration());
    assert_eq!(err.message, CountSpecError::DistinctWithStar.to_string());
}

#[test]
fn star_rejects_argument_list() {
    let err = spec_error(&[ValueKind::Int], CountMode::star());

    assert_eq!(
        err.message,
        CountSpecError::StarWithArguments { arity: 1 }.to_string()
    );
}

#[test]
fn multi_argument_count_requires_distinct() {
    let err = spec_error(&[ValueKind::Int, ValueKind::Text], CountMode::values());

    assert!(err.is_configuration());
    assert_eq!(
        err.message,
        CountSpecError::DistinctRequired { arity: 2 }.to_string()
    );

    let ok = CountAggregate::try_new(&[ValueKind::Int, ValueKind::Text], CountMode::distinct());
    assert!(ok.is_ok());
}

#[test]
fn signature_reports_partial_emission_and_distinct_set() {
    let plain = count(&[ValueKind::Int], CountMode::values()).signature();
    assert_eq!(plain.output, ValueKind::Int);
    assert!(plain.accumulator.partial_emission);
    assert!(!plain.accumulator.distinct_set);

    let restricted = count(
        &[ValueKind::Text],
        CountMode::distinct().with_restricted_merge(true),
    )
    .signature();
    assert_eq!(restricted.arguments, vec![ValueKind::Text]);
    assert!(restricted.accumulator.distinct_set);
    assert!(!restricted.accumulator.partial_emission);
}

#[test]
fn restricted_merge_alone_does_not_forbid_partials() {
    let func = count(&[ValueKind::Int], CountMode::values().with_restricted_merge(true));
    let mut state = func.create_state();

    func.merge(&mut state, Some(3)).expect("non-distinct merge is allowed");
    assert_eq!(func.finalize_partial(&state).expect("partial"), 3);
}

#[test]
fn phases_are_gated_only_for_restricted_distinct() {
    let restricted = count(
        &[ValueKind::Int],
        CountMode::distinct().with_restricted_merge(true),
    );
    assert!(restricted.ensure_phase_supported(AggregatePhase::Complete).is_ok());
    for phase in [
        AggregatePhase::Partial1,
        AggregatePhase::Partial2,
        AggregatePhase::Final,
    ] {
        let err = restricted
            .ensure_phase_supported(phase)
            .expect_err("partial phases must be rejected");
        assert!(err.is_unsupported(), "{phase} should be unsupported");
    }

    let distinct = count(&[ValueKind::Int], CountMode::distinct());
    assert!(distinct.ensure_phase_supported(AggregatePhase::Partial2).is_ok());
}

///
/// Accumulate
///

#[test]
fn absent_batch_is_a_no_op_but_all_null_row_is_not_absent() {
    let star = count(&[], CountMode::star());
    let mut state = star.create_state();
    star.accumulate(&mut state, None).expect("absent batch");
    assert_eq!(star.finalize(&state), 0);

    let values = count(&[ValueKind::Int], CountMode::values());
    let mut state = values.create_state();
    values.accumulate(&mut state, None).expect("absent batch");
    values
        .accumulate(&mut state, Some(&[Value::Null]))
        .expect("null row");
    assert_eq!(values.finalize(&state), 0);
}

#[test]
fn star_counts_every_row_and_rejects_values() {
    let star = count(&[], CountMode::star());
    let mut state = star.create_state();
    star.accumulate(&mut state, Some(&[])).expect("empty row");

    let err = star
        .accumulate(&mut state, Some(&[int(1)]))
        .expect_err("count(*) rows carry no values");
    assert_eq!(err.class, ErrorClass::InvalidArgument);
    assert_eq!(state.count(), 1);
}

#[test]
fn row_width_must_match_arity() {
    let func = count(&[ValueKind::Int], CountMode::values());
    let mut state = func.create_state();

    let err = func
        .accumulate(&mut state, Some(&[int(1), int(2)]))
        .expect_err("wrong width");
    assert_eq!(err.class, ErrorClass::InvalidArgument);
    assert_eq!(state.count(), 0);
}

#[test]
fn values_must_match_declared_kinds() {
    let func = count(&[ValueKind::Int, ValueKind::Text], CountMode::distinct());
    let mut state = func.create_state();

    let err = func
        .accumulate(&mut state, Some(&[int(1), int(2)]))
        .expect_err("int in a text column");
    assert_eq!(err.class, ErrorClass::InvalidArgument);
    assert_eq!(err.message, "count column 1 expects text, got int");
    assert_eq!(state.count(), 0);
    assert_eq!(state.distinct_len(), 0);
}

#[test]
fn any_null_argument_skips_the_row() {
    let func = count(&[ValueKind::Int, ValueKind::Text], CountMode::distinct());
    let rows = vec![
        vec![int(1), Value::Null],
        vec![Value::Null, Value::Text("a".to_string())],
        vec![int(1), Value::Text("a".to_string())],
    ];

    assert_eq!(accumulate_all(&func, &rows), 1);
}

#[test]
fn composite_with_null_inside_still_counts() {
    let func = count(&[ValueKind::Composite], CountMode::values());
    let rows = vec![vec![Value::List(vec![Value::Null])]];

    assert_eq!(accumulate_all(&func, &rows), 1);
}

#[test]
fn distinct_tracks_fingerprints_structurally() {
    let func = count(&[ValueKind::Composite], CountMode::distinct());
    let left = Value::Map(vec![
        (Value::Text("b".to_string()), int(2)),
        (Value::Text("a".to_string()), int(1)),
    ]);
    let right = Value::Map(vec![
        (Value::Text("a".to_string()), int(1)),
        (Value::Text("b".to_string()), int(2)),
    ]);

    let mut state = func.create_state();
    func.accumulate(&mut state, Some(&[left])).expect("left");
    func.accumulate(&mut state, Some(&[right])).expect("right");

    assert_eq!(func.finalize(&state), 1);
    assert_eq!(state.distinct_len(), 1);
}

#[test]
fn distinct_rejects_invalid_map_without_counting() {
    let func = count(&[ValueKind::Composite], CountMode::distinct());
    let bad = Value::Map(vec![(Value::Null, int(1))]);
    let mut state = func.create_state();

    let err = func
        .accumulate(&mut state, Some(&[bad]))
        .expect_err("null map key");
    assert_eq!(err.class, ErrorClass::InvalidArgument);
    assert_eq!(func.finalize(&state), 0);
}

#[test]
fn reset_clears_count_and_duplicate_set() {
    let func = count(&[ValueKind::Int], CountMode::distinct());
    let mut state = func.create_state();
    func.accumulate(&mut state, Some(&[int(1)])).expect("row");
    func.reset(&mut state);

    assert_eq!(state.count(), 0);
    assert_eq!(state.distinct_len(), 0);

    func.accumulate(&mut state, Some(&[int(1)])).expect("row");
    assert_eq!(func.finalize(&state), 1);
}

#[test]
fn finalize_is_a_pure_read() {
    let func = count(&[ValueKind::Int], CountMode::values());
    let mut state = func.create_state();
    func.accumulate(&mut state, Some(&[int(5)])).expect("row");

    assert_eq!(func.finalize(&state), 1);
    assert_eq!(func.finalize(&state), 1);
    assert_eq!(func.finalize_partial(&state).expect("partial"), 1);
}

///
/// Merge
///

#[test]
fn merge_sums_present_partials_and_ignores_absent() {
    let func = count(&[ValueKind::Int], CountMode::values());
    let mut state = func.create_state();

    func.merge(&mut state, Some(2)).expect("merge");
    func.merge(&mut state, None).expect("merge absent");
    func.merge(&mut state, Some(5)).expect("merge");

    assert_eq!(func.finalize(&state), 7);
}

#[test]
fn merge_saturates_instead_of_overflowing() {
    let func = count(&[], CountMode::star());
    let mut state = func.create_state();

    func.merge(&mut state, Some(u64::MAX)).expect("merge");
    func.merge(&mut state, Some(1)).expect("merge");

    assert_eq!(func.finalize(&state), u64::MAX);
}

#[test]
fn restricted_distinct_rejects_merge_and_partial_even_for_absent_partial() {
    let func = count(
        &[ValueKind::Int],
        CountMode::distinct().with_restricted_merge(true),
    );
    let mut state = func.create_state();
    func.accumulate(&mut state, Some(&[int(1)])).expect("row");

    for partial in [None, Some(0), Some(4)] {
        let err = func
            .merge(&mut state, partial)
            .expect_err("merge must be rejected");
        assert!(err.is_unsupported());
    }
    let err = func
        .finalize_partial(&state)
        .expect_err("partial must be rejected");
    assert!(err.is_unsupported());
    assert_eq!(err.origin, ErrorOrigin::Aggregate);

    // rejected calls never mutate state
    assert_eq!(func.finalize(&state), 1);
}

///
/// Observability
///

#[derive(Default)]
struct CapturingSink {
    events: RefCell<Vec<MetricsEvent>>,
}

impl MetricsSink for CapturingSink {
    fn record(&self, event: MetricsEvent) {
        self.events.borrow_mut().push(event);
    }
}

#[test]
fn accumulate_outcomes_are_reported_to_the_sink() {
    let sink = CapturingSink::default();
    let func = count(&[ValueKind::Int], CountMode::distinct());

    with_metrics_sink(&sink, || {
        let mut state = func.create_state();
        for row in [Some(vec![int(1)]), Some(vec![int(1)]), Some(vec![Value::Null]), None] {
            func.accumulate(&mut state, row.as_deref()).expect("row");
        }
    });

    let outcomes = sink
        .events
        .borrow()
        .iter()
        .filter_map(|event| match event {
            MetricsEvent::RowAccumulated { outcome, .. } => Some(*outcome),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(
        outcomes,
        vec![
            AccumulateOutcome::Counted,
            AccumulateOutcome::Duplicate,
            AccumulateOutcome::NullSkipped,
            AccumulateOutcome::Absent,
        ]
    );
    assert!(matches!(
        sink.events.borrow().first(),
        Some(MetricsEvent::StateCreated { function: "count" })
    ));
}

#[test]
fn rejections_are_reported_to_the_sink() {
    let sink = CapturingSink::default();
    let func = count(
        &[ValueKind::Int],
        CountMode::distinct().with_restricted_merge(true),
    );
    let mut state = func.create_state();

    with_metrics_sink(&sink, || {
        let _ = func.merge(&mut state, Some(1));
        let _ = func.finalize_partial(&state);
    });

    assert_eq!(
        *sink.events.borrow(),
        vec![
            MetricsEvent::Rejected {
                function: "count",
                operation: "merge",
            },
            MetricsEvent::Rejected {
                function: "count",
                operation: "finalize_partial",
            },
        ]
    );
}

///
/// Scenarios
///

#[test]
fn scenario_a_count_star_over_five_batches() {
    let func = count(&[], CountMode::star());
    let mut state = func.create_state();
    for _ in 0..5 {
        func.accumulate(&mut state, Some(&[])).expect("row");
    }

    assert_eq!(func.finalize(&state), 5);
}

#[test]
fn scenario_b_count_skips_nulls() {
    let func = count(&[ValueKind::Int], CountMode::values());
    let rows = vec![vec![int(1)], vec![Value::Null], vec![int(3)]];

    assert_eq!(accumulate_all(&func, &rows), 2);
}

#[test]
fn scenario_c_count_distinct_suppresses_duplicates_and_nulls() {
    let func = count(&[ValueKind::Int], CountMode::distinct());
    let rows = vec![
        vec![int(1)],
        vec![int(1)],
        vec![int(2)],
        vec![Value::Null],
        vec![int(2)],
    ];

    assert_eq!(accumulate_all(&func, &rows), 2);
}

#[test]
fn scenario_d_non_distinct_merge_is_a_plain_sum() {
    let func = count(&[ValueKind::Int], CountMode::values());
    let partitions = vec![
        vec![Some(vec![int(1)]), Some(vec![int(2)])],
        vec![Some(vec![int(2)]), Some(vec![int(3)])],
    ];

    assert_eq!(fold_partitions(&func, &partitions).expect("fold"), 4);
}
