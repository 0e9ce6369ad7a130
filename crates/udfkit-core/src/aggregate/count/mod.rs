//! Module: aggregate::count
//! Responsibility: SQL COUNT over rows: count(*), count(expr) and
//! count(DISTINCT expr[, expr...]).
//! Does not own: distinct elimination across partitions (host engine).

mod error;

#[cfg(test)]
mod tests;

use crate::{
    aggregate::{AccumulatorType, AggregateFunction, AggregatePhase, AggregateSignature},
    error::Error,
    fingerprint::FingerprintSet,
    obs::sink::{self, AccumulateOutcome, MetricsEvent},
    value::{Value, ValueKind},
};

pub use error::CountSpecError;

const COUNT: &str = "count";

///
/// CountMode
///
/// Flags fixed at construction.
/// `restricted_merge` marks contexts (windowed/ordered aggregation) where a
/// DISTINCT count cannot take part in the partial/merge protocol.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CountMode {
    pub count_all_rows: bool,
    pub distinct: bool,
    pub restricted_merge: bool,
}

impl CountMode {
    /// `count(*)`
    #[must_use]
    pub const fn star() -> Self {
        Self {
            count_all_rows: true,
            distinct: false,
            restricted_merge: false,
        }
    }

    /// `count(expr)`
    #[must_use]
    pub const fn values() -> Self {
        Self {
            count_all_rows: false,
            distinct: false,
            restricted_merge: false,
        }
    }

    /// `count(DISTINCT expr[, expr...])`
    #[must_use]
    pub const fn distinct() -> Self {
        Self {
            count_all_rows: false,
            distinct: true,
            restricted_merge: false,
        }
    }

    #[must_use]
    pub const fn with_restricted_merge(mut self, restricted_merge: bool) -> Self {
        self.restricted_merge = restricted_merge;
        self
    }

    /// Merge and partial finalization are unavailable in this mode.
    #[must_use]
    pub const fn forbids_partials(self) -> bool {
        self.distinct && self.restricted_merge
    }
}

///
/// CountState
///
/// Per-group accumulation state. `seen` is allocated on the first counted
/// DISTINCT row and is never bounded.
///

#[derive(Clone, Debug, Default)]
pub struct CountState {
    count: u64,
    seen: Option<FingerprintSet>,
}

impl CountState {
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Number of distinct fingerprints tracked so far.
    #[must_use]
    pub fn distinct_len(&self) -> usize {
        self.seen.as_ref().map_or(0, FingerprintSet::len)
    }
}

///
/// CountAggregate
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CountAggregate {
    arguments: Vec<ValueKind>,
    mode: CountMode,
}

impl CountAggregate {
    /// Validate the argument list against the mode flags.
    pub fn try_new(arguments: &[ValueKind], mode: CountMode) -> Result<Self, Error> {
        Self::validate(arguments.len(), mode)?;

        Ok(Self {
            arguments: arguments.to_vec(),
            mode,
        })
    }

    const fn validate(arity: usize, mode: CountMode) -> Result<(), CountSpecError> {
        if arity == 0 {
            if !mode.count_all_rows {
                return Err(CountSpecError::ArgumentExpected);
            }
            if mode.distinct {
                return Err(CountSpecError::DistinctWithStar);
            }

            return Ok(());
        }

        if mode.count_all_rows {
            return Err(CountSpecError::StarWithArguments { arity });
        }
        if arity > 1 && !mode.distinct {
            return Err(CountSpecError::DistinctRequired { arity });
        }

        Ok(())
    }

    #[must_use]
    pub const fn mode(&self) -> CountMode {
        self.mode
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    fn reject(operation: &'static str) -> Error {
        sink::record(MetricsEvent::Rejected {
            function: COUNT,
            operation,
        });

        Error::aggregate_unsupported(format!(
            "distinct count with restricted merge does not support {operation}"
        ))
    }

    fn record_row(outcome: AccumulateOutcome) {
        sink::record(MetricsEvent::RowAccumulated {
            function: COUNT,
            outcome,
        });
    }

    // Decide whether one delivered row counts, updating the duplicate set.
    fn qualifies(&self, state: &mut CountState, row: &[Value]) -> Result<AccumulateOutcome, Error> {
        if self.mode.count_all_rows {
            if !row.is_empty() {
                return Err(Error::aggregate_invalid_argument(format!(
                    "count(*) expects empty rows, got {} values",
                    row.len()
                )));
            }

            return Ok(AccumulateOutcome::Counted);
        }

        if row.len() != self.arguments.len() {
            return Err(Error::aggregate_invalid_argument(format!(
                "count expects {} values per row, got {}",
                self.arguments.len(),
                row.len()
            )));
        }

        if let Some((column, (kind, value))) = self
            .arguments
            .iter()
            .zip(row)
            .enumerate()
            .find(|(_, (kind, value))| !kind.accepts(value))
        {
            return Err(Error::aggregate_invalid_argument(format!(
                "count column {column} expects {kind}, got {}",
                value.kind()
            )));
        }

        // any null argument skips the whole row
        if row.iter().any(Value::is_null) {
            return Ok(AccumulateOutcome::NullSkipped);
        }

        if self.mode.distinct {
            let seen = state.seen.get_or_insert_with(FingerprintSet::default);
            if !seen.insert_row(row)? {
                return Ok(AccumulateOutcome::Duplicate);
            }
        }

        Ok(AccumulateOutcome::Counted)
    }
}

impl AggregateFunction for CountAggregate {
    type State = CountState;
    type Partial = u64;
    type Output = u64;

    fn name(&self) -> &'static str {
        COUNT
    }

    fn signature(&self) -> AggregateSignature {
        AggregateSignature {
            arguments: self.arguments.clone(),
            accumulator: AccumulatorType {
                distinct_set: self.mode.distinct,
                partial_emission: !self.mode.forbids_partials(),
            },
            output: ValueKind::Int,
        }
    }

    fn ensure_phase_supported(&self, phase: AggregatePhase) -> Result<(), Error> {
        if self.mode.forbids_partials() && (phase.emits_partial() || phase.consumes_partials()) {
            return Err(Error::aggregate_unsupported(format!(
                "distinct count with restricted merge cannot run in the {phase} phase"
            )));
        }

        Ok(())
    }

    fn create_state(&self) -> CountState {
        sink::record(MetricsEvent::StateCreated { function: COUNT });

        CountState::default()
    }

    fn reset(&self, state: &mut CountState) {
        state.count = 0;
        state.seen = None;
    }

    fn accumulate(&self, state: &mut CountState, row: Option<&[Value]>) -> Result<(), Error> {
        let Some(row) = row else {
            Self::record_row(AccumulateOutcome::Absent);
            return Ok(());
        };

        let outcome = self.qualifies(state, row)?;
        if outcome == AccumulateOutcome::Counted {
            state.count = state.count.saturating_add(1);
        }
        Self::record_row(outcome);

        Ok(())
    }

    fn merge(&self, state: &mut CountState, partial: Option<u64>) -> Result<(), Error> {
        if self.mode.forbids_partials() {
            return Err(Self::reject("merge"));
        }

        if let Some(partial) = partial {
            state.count = state.count.saturating_add(partial);
            sink::record(MetricsEvent::Merged {
                function: COUNT,
                partial,
            });
        }

        Ok(())
    }

    fn finalize(&self, state: &CountState) -> u64 {
        sink::record(MetricsEvent::Finalized {
            function: COUNT,
            partial: false,
        });

        state.count
    }

    fn finalize_partial(&self, state: &CountState) -> Result<u64, Error> {
        if self.mode.forbids_partials() {
            return Err(Self::reject("finalize_partial"));
        }

        sink::record(MetricsEvent::Finalized {
            function: COUNT,
            partial: true,
        });

        Ok(state.count)
    }
}
