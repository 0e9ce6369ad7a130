//! Module: aggregate::count::error
//! Responsibility: COUNT construction error taxonomy.

use crate::error::Error;
use thiserror::Error as ThisError;

///
/// CountSpecError
///
/// Malformed COUNT argument/flag combinations. Detected once at construction,
/// before any row is processed.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CountSpecError {
    #[error("count requires an argument or '*'")]
    ArgumentExpected,

    #[error("DISTINCT is not supported with count(*)")]
    DistinctWithStar,

    #[error("'*' is not supported in an expression list ({arity} arguments given)")]
    StarWithArguments { arity: usize },

    #[error("DISTINCT keyword must be specified for count over {arity} arguments")]
    DistinctRequired { arity: usize },
}

impl From<CountSpecError> for Error {
    fn from(err: CountSpecError) -> Self {
        Self::aggregate_configuration(err.to_string())
    }
}
