use crate::{
    error::Error,
    obs::sink::{self, MetricsEvent},
    table::{RowCollector, TableField, TableFunction, TableSchema},
    value::{Value, ValueKind},
};

const SPLIT_NAME: &str = "split_name";

///
/// SplitName
///
/// `split_name(full)`: forwards one `(name, surname)` row where `name` is the
/// first character of `full` and `surname` is the rest. Null or empty input
/// forwards nothing.
///

#[derive(Clone, Debug, Default)]
pub struct SplitName {
    initialized: bool,
}

impl SplitName {
    #[must_use]
    pub const fn new() -> Self {
        Self { initialized: false }
    }

    #[must_use]
    pub fn schema() -> TableSchema {
        TableSchema::new(vec![
            TableField::new("name", ValueKind::Text),
            TableField::new("surname", ValueKind::Text),
        ])
    }
}

impl TableFunction for SplitName {
    fn name(&self) -> &'static str {
        SPLIT_NAME
    }

    fn initialize(&mut self, arguments: &[ValueKind]) -> Result<TableSchema, Error> {
        match arguments {
            [ValueKind::Text] => {
                self.initialized = true;
                Ok(Self::schema())
            }
            [other] => Err(Error::table_configuration(format!(
                "{SPLIT_NAME} expects a text argument, got {other}"
            ))),
            _ => Err(Error::table_configuration(format!(
                "{SPLIT_NAME} takes exactly one argument, got {}",
                arguments.len()
            ))),
        }
    }

    fn process(&mut self, arguments: &[Value], out: &mut dyn RowCollector) -> Result<(), Error> {
        if !self.initialized {
            return Err(Error::table_configuration(format!(
                "{SPLIT_NAME} processed before initialize"
            )));
        }

        let [argument] = arguments else {
            return Err(Error::table_invalid_argument(format!(
                "{SPLIT_NAME} takes exactly one argument, got {}",
                arguments.len()
            )));
        };

        let full = match argument {
            Value::Null => return Ok(()),
            Value::Text(full) => full,
            other => {
                return Err(Error::table_invalid_argument(format!(
                    "{SPLIT_NAME} expects a text value, got {}",
                    other.kind()
                )));
            }
        };

        let mut chars = full.chars();
        let Some(first) = chars.next() else {
            return Ok(());
        };

        out.collect(vec![
            Value::Text(first.to_string()),
            Value::Text(chars.as_str().to_string()),
        ]);
        sink::record(MetricsEvent::TableRowsForwarded {
            function: SPLIT_NAME,
            rows: 1,
        });

        Ok(())
    }
}

///
/// TESTS
///
