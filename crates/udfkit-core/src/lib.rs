//! Core runtime for udfkit: the aggregate contract with its COUNT
//! implementation, scalar and table functions, row fingerprints, the function
//! registry, and the ergonomics exported via the `prelude`.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod aggregate;
pub mod error;
pub mod fingerprint;
pub mod obs;
pub mod registry;
pub mod scalar;
pub mod table;
pub mod value;

pub use error::Error;

///
/// Prelude
///
/// Prelude contains only domain vocabulary and the function traits.
/// No errors, metrics or registries are re-exported here.
///

pub mod prelude {
    pub use crate::{
        aggregate::{AggregateFunction as _, AggregatePhase, CountAggregate, CountMode},
        scalar::ScalarFunction as _,
        table::{RowCollector as _, TableFunction as _},
        value::{Value, ValueKind},
    };
}
