use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for function lifecycle calls.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) functions: BTreeMap<String, EventOps>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Aggregate lifecycle
    pub states_created: u64,
    pub rows_counted: u64,
    pub rows_suppressed: u64,
    pub rows_null_skipped: u64,
    pub batches_absent: u64,
    pub merges: u64,
    pub merged_partial_total: u64,
    pub finalizes: u64,
    pub partial_finalizes: u64,
    pub rejections: u64,

    // Scalar / table functions
    pub scalar_calls: u64,
    pub scalar_null_inputs: u64,
    pub table_rows_forwarded: u64,
}

///
/// EventReport
/// Point-in-time snapshot of all counters.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub functions: BTreeMap<String, EventOps>,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Apply one counter update to the global totals and to one function's totals.
pub(crate) fn update_ops(function: &str, update: impl Fn(&mut EventOps)) {
    with_state_mut(|m| {
        update(&mut m.ops);
        update(m.functions.entry(function.to_string()).or_default());
    });
}

/// Reset all counters (useful in tests).
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

pub(crate) fn report() -> EventReport {
    with_state(|m| EventReport {
        ops: m.ops.clone(),
        functions: m.functions.clone(),
    })
}
