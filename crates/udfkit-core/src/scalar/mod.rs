//! Module: scalar
//! Responsibility: one-row-in, one-value-out functions.

mod double;

use crate::{error::Error, value::Value, value::ValueKind};

pub use double::DoubleInt;

///
/// ScalarFunction
///
/// `initialize` negotiates argument kinds once and reports the output kind;
/// `evaluate` is then called per row with values of the negotiated kinds.
///

pub trait ScalarFunction {
    fn name(&self) -> &'static str;

    fn initialize(&mut self, arguments: &[ValueKind]) -> Result<ValueKind, Error>;

    fn evaluate(&self, arguments: &[Value]) -> Result<Value, Error>;

    /// Human-readable call rendering for plan explain output.
    fn display(&self, arguments: &[String]) -> String {
        format!("{}({})", self.name(), arguments.join(", "))
    }
}
