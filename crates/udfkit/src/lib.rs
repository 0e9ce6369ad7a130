//! ## Crate layout
//! - `core`: aggregate contract, COUNT, scalar and table functions, row
//!   fingerprints, the function registry and observability.
//! - `config`: TOML function-registration config.
//!
//! The `prelude` module mirrors the surface a host engine needs to resolve and
//! drive functions.

pub use udfkit_config as config;
pub use udfkit_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use core::Error;

///
/// Host Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::config::{BuiltinFunction, FunctionKind, FunctionsConfig};
    pub use crate::core::{
        aggregate::{
            AggregateFunction as _, AggregatePhase, CountAggregate, CountMode, fold_partitions,
            fold_rows,
        },
        registry::FunctionRegistry,
        scalar::ScalarFunction as _,
        table::{RowCollector as _, TableFunction as _},
        value::{Value, ValueKind},
    };
}
