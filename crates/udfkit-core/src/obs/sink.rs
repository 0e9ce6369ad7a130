//! Metrics sink boundary.
//!
//! Function logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between function execution and the
//! thread-local metrics state.
use crate::obs::metrics::{self, EventReport};
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = RefCell::new(None);
}

///
/// AccumulateOutcome
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AccumulateOutcome {
    Counted,
    Duplicate,
    NullSkipped,
    Absent,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    StateCreated {
        function: &'static str,
    },
    RowAccumulated {
        function: &'static str,
        outcome: AccumulateOutcome,
    },
    Merged {
        function: &'static str,
        partial: u64,
    },
    Finalized {
        function: &'static str,
        partial: bool,
    },
    Rejected {
        function: &'static str,
        operation: &'static str,
    },
    ScalarEvaluated {
        function: &'static str,
        null_input: bool,
    },
    TableRowsForwarded {
        function: &'static str,
        rows: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default thread-local sink that writes into global metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::StateCreated { function } => {
                metrics::update_ops(function, |ops| {
                    ops.states_created = ops.states_created.saturating_add(1);
                });
            }

            MetricsEvent::RowAccumulated { function, outcome } => {
                metrics::update_ops(function, |ops| match outcome {
                    AccumulateOutcome::Counted => {
                        ops.rows_counted = ops.rows_counted.saturating_add(1);
                    }
                    AccumulateOutcome::Duplicate => {
                        ops.rows_suppressed = ops.rows_suppressed.saturating_add(1);
                    }
                    AccumulateOutcome::NullSkipped => {
                        ops.rows_null_skipped = ops.rows_null_skipped.saturating_add(1);
                    }
                    AccumulateOutcome::Absent => {
                        ops.batches_absent = ops.batches_absent.saturating_add(1);
                    }
                });
            }

            MetricsEvent::Merged { function, partial } => {
                metrics::update_ops(function, |ops| {
                    ops.merges = ops.merges.saturating_add(1);
                    ops.merged_partial_total = ops.merged_partial_total.saturating_add(partial);
                });
            }

            MetricsEvent::Finalized { function, partial } => {
                metrics::update_ops(function, |ops| {
                    if partial {
                        ops.partial_finalizes = ops.partial_finalizes.saturating_add(1);
                    } else {
                        ops.finalizes = ops.finalizes.saturating_add(1);
                    }
                });
            }

            MetricsEvent::Rejected { function, .. } => {
                metrics::update_ops(function, |ops| {
                    ops.rejections = ops.rejections.saturating_add(1);
                });
            }

            MetricsEvent::ScalarEvaluated {
                function,
                null_input,
            } => {
                metrics::update_ops(function, |ops| {
                    ops.scalar_calls = ops.scalar_calls.saturating_add(1);
                    if null_input {
                        ops.scalar_null_inputs = ops.scalar_null_inputs.saturating_add(1);
                    }
                });
            }

            MetricsEvent::TableRowsForwarded { function, rows } => {
                metrics::update_ops(function, |ops| {
                    ops.table_rows_forwarded = ops.table_rows_forwarded.saturating_add(rows);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // Preconditions:
        // - `ptr` was produced from a valid `&dyn MetricsSink` in `with_metrics_sink`.
        // - `with_metrics_sink` always restores the previous pointer before returning,
        //   including unwind paths via `Guard::drop`.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        //
        // Aliasing:
        // - Only a shared reference is materialized, matching the shared borrow
        //   used to install the override.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> EventReport {
    metrics::report()
}

/// Reset all metrics counters on the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
pub fn with_metrics_sink<T>(sink: &dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - `sink_ptr` is installed only for this dynamic scope.
    // - `Guard` restores the previous slot on all exits, including panic.
    // - `record` only dereferences synchronously and never persists `sink_ptr`.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}
