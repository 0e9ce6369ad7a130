//! Module: aggregate::fold
//! Responsibility: reference drivers for the aggregate lifecycle.
//! Boundary: used by hosts without their own partial-aggregation tree, and by
//! tests to check that partitioned and single-state folds agree.

use crate::{
    aggregate::{AggregateFunction, AggregatePhase},
    error::Error,
    value::Value,
};

/// Fold rows into one state and finalize it (the `Complete` phase).
///
/// Each item is one delivered row; `None` is an absent batch.
pub fn fold_rows<A: AggregateFunction>(
    func: &A,
    rows: &[Option<Vec<Value>>],
) -> Result<A::Output, Error> {
    func.ensure_phase_supported(AggregatePhase::Complete)?;

    let mut state = func.create_state();
    for row in rows {
        func.accumulate(&mut state, row.as_deref())?;
    }

    Ok(func.finalize(&state))
}

/// Two-phase fold: one partial state per partition, merged into a final state.
pub fn fold_partitions<A: AggregateFunction>(
    func: &A,
    partitions: &[Vec<Option<Vec<Value>>>],
) -> Result<A::Output, Error> {
    func.ensure_phase_supported(AggregatePhase::Partial1)?;
    func.ensure_phase_supported(AggregatePhase::Final)?;

    let mut partials = Vec::with_capacity(partitions.len());
    for partition in partitions {
        let mut state = func.create_state();
        for row in partition {
            func.accumulate(&mut state, row.as_deref())?;
        }
        partials.push(func.finalize_partial(&state)?);
    }

    let mut merged = func.create_state();
    for partial in partials {
        func.merge(&mut merged, Some(partial))?;
    }

    Ok(func.finalize(&merged))
}

///
/// TESTS
///
