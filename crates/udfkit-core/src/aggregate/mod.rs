//! Module: aggregate
//! Responsibility: the accumulate/merge/finalize contract and its phases.
//! Does not own: grouping, row dispatch or plan placement (host engine).
//! Boundary: aggregate functions hosted by row- or column-oriented engines.

pub mod count;
pub mod fold;

use crate::{error::Error, value::Value, value::ValueKind};
use std::fmt;

// re-exports
pub use count::{CountAggregate, CountMode, CountSpecError, CountState};
pub use fold::{fold_partitions, fold_rows};

///
/// AggregatePhase
///
/// Evaluation phase the host engine runs an aggregate in. Partial phases emit
/// a mergeable sub-result; final phases emit the terminal scalar.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AggregatePhase {
    /// raw rows → partial
    Partial1,
    /// partials → partial
    Partial2,
    /// partials → output
    Final,
    /// raw rows → output
    Complete,
}

impl AggregatePhase {
    #[must_use]
    pub const fn consumes_raw_rows(self) -> bool {
        matches!(self, Self::Partial1 | Self::Complete)
    }

    #[must_use]
    pub const fn consumes_partials(self) -> bool {
        !self.consumes_raw_rows()
    }

    #[must_use]
    pub const fn emits_partial(self) -> bool {
        matches!(self, Self::Partial1 | Self::Partial2)
    }
}

impl fmt::Display for AggregatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Partial1 => "partial1",
            Self::Partial2 => "partial2",
            Self::Final => "final",
            Self::Complete => "complete",
        };
        write!(f, "{label}")
    }
}

///
/// AccumulatorType
///
/// Physical accumulator layout reported to the host during type negotiation.
/// The running count is always one 64-bit integer.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AccumulatorType {
    /// State also carries an opaque duplicate-fingerprint set.
    pub distinct_set: bool,
    /// The host may request partial results and merge them.
    pub partial_emission: bool,
}

///
/// AggregateSignature
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AggregateSignature {
    pub arguments: Vec<ValueKind>,
    pub accumulator: AccumulatorType,
    pub output: ValueKind,
}

///
/// AggregateFunction
///
/// Canonical aggregate state-machine contract. One state per group; a state
/// is mutated by one worker at a time and terminated by exactly one
/// `finalize` or `finalize_partial`.
///

pub trait AggregateFunction {
    type State;
    type Partial;
    type Output;

    fn name(&self) -> &'static str;

    fn signature(&self) -> AggregateSignature;

    /// Reject phases this configuration cannot run in.
    fn ensure_phase_supported(&self, _phase: AggregatePhase) -> Result<(), Error> {
        Ok(())
    }

    fn create_state(&self) -> Self::State;

    fn reset(&self, state: &mut Self::State);

    /// Feed one row. `None` signals that the batch/partition had no rows.
    fn accumulate(&self, state: &mut Self::State, row: Option<&[Value]>) -> Result<(), Error>;

    fn merge(&self, state: &mut Self::State, partial: Option<Self::Partial>) -> Result<(), Error>;

    fn finalize(&self, state: &Self::State) -> Self::Output;

    fn finalize_partial(&self, state: &Self::State) -> Result<Self::Partial, Error>;
}
