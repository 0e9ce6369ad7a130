//! Module: table
//! Responsibility: one-row-in, many-rows-out functions and their output schema.
//! Does not own: row batching or lateral-view joins (host engine).

mod split_name;

use crate::{
    error::Error,
    value::{Value, ValueKind},
};
use derive_more::Deref;

pub use split_name::SplitName;

///
/// TableField
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableField {
    pub name: &'static str,
    pub kind: ValueKind,
}

impl TableField {
    #[must_use]
    pub const fn new(name: &'static str, kind: ValueKind) -> Self {
        Self { name, kind }
    }
}

///
/// TableSchema
///
/// Ordered output columns declared by `TableFunction::initialize`.
///

#[derive(Clone, Debug, Default, Deref, Eq, PartialEq)]
pub struct TableSchema(Vec<TableField>);

impl TableSchema {
    #[must_use]
    pub const fn new(fields: Vec<TableField>) -> Self {
        Self(fields)
    }

    #[must_use]
    pub fn field_names(&self) -> Vec<&'static str> {
        self.0.iter().map(|field| field.name).collect()
    }
}

///
/// RowCollector
///
/// Receives every row a table function forwards.
///

pub trait RowCollector {
    fn collect(&mut self, row: Vec<Value>);
}

impl RowCollector for Vec<Vec<Value>> {
    fn collect(&mut self, row: Vec<Value>) {
        self.push(row);
    }
}

///
/// TableFunction
///

pub trait TableFunction {
    fn name(&self) -> &'static str;

    /// Validate argument kinds and declare the output schema.
    fn initialize(&mut self, arguments: &[ValueKind]) -> Result<TableSchema, Error>;

    /// Process one input row, forwarding zero or more output rows.
    fn process(&mut self, arguments: &[Value], out: &mut dyn RowCollector) -> Result<(), Error>;

    /// Called once after the last input row.
    fn close(&mut self, _out: &mut dyn RowCollector) -> Result<(), Error> {
        Ok(())
    }
}
