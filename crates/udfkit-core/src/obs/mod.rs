//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Function logic never touches metrics state directly; every event flows
//! through `sink::record`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport};
pub use sink::{
    AccumulateOutcome, MetricsEvent, MetricsSink, metrics_report, metrics_reset_all,
    with_metrics_sink,
};
