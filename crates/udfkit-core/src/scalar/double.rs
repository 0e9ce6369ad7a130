use crate::{
    error::Error,
    obs::sink::{self, MetricsEvent},
    scalar::ScalarFunction,
    value::{Value, ValueKind},
};

const DOUBLE: &str = "double";

///
/// DoubleInt
///
/// `double(x)`: returns `x * 2` for one integer argument, null for null.
///

#[derive(Clone, Debug, Default)]
pub struct DoubleInt {
    initialized: bool,
}

impl DoubleInt {
    #[must_use]
    pub const fn new() -> Self {
        Self { initialized: false }
    }
}

impl ScalarFunction for DoubleInt {
    fn name(&self) -> &'static str {
        DOUBLE
    }

    fn initialize(&mut self, arguments: &[ValueKind]) -> Result<ValueKind, Error> {
        match arguments {
            [ValueKind::Int] => {
                self.initialized = true;
                Ok(ValueKind::Int)
            }
            [other] => Err(Error::scalar_configuration(format!(
                "{DOUBLE} expects an int argument, got {other}"
            ))),
            _ => Err(Error::scalar_configuration(format!(
                "{DOUBLE} takes exactly one argument, got {}",
                arguments.len()
            ))),
        }
    }

    fn evaluate(&self, arguments: &[Value]) -> Result<Value, Error> {
        if !self.initialized {
            return Err(Error::scalar_configuration(format!(
                "{DOUBLE} evaluated before initialize"
            )));
        }

        let [argument] = arguments else {
            return Err(Error::scalar_invalid_argument(format!(
                "{DOUBLE} takes exactly one argument, got {}",
                arguments.len()
            )));
        };

        let output = match argument {
            Value::Null => Value::Null,
            Value::Int(value) => value.checked_mul(2).map(Value::Int).ok_or_else(|| {
                Error::scalar_invalid_argument(format!("{DOUBLE}({value}) overflows int"))
            })?,
            other => {
                return Err(Error::scalar_invalid_argument(format!(
                    "{DOUBLE} expects an int value, got {}",
                    other.kind()
                )));
            }
        };

        sink::record(MetricsEvent::ScalarEvaluated {
            function: DOUBLE,
            null_input: argument.is_null(),
        });

        Ok(output)
    }
}

///
/// TESTS
///
