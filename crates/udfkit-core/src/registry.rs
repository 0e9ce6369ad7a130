//! Module: registry
//! Responsibility: name → function factory lookup for every function kind.
//! Does not own: SQL name resolution or schema binding (host engine).
//! Boundary: hosts resolve functions here, then drive the returned instance.

use crate::{
    aggregate::{CountAggregate, CountMode},
    error::Error,
    scalar::{DoubleInt, ScalarFunction},
    table::{SplitName, TableFunction},
    value::ValueKind,
};
use std::collections::{BTreeMap, BTreeSet};
use udfkit_config::{BuiltinFunction, FunctionKind, FunctionsConfig};

type ScalarFactory = Box<dyn Fn() -> Box<dyn ScalarFunction>>;
type TableFactory = Box<dyn Fn() -> Box<dyn TableFunction>>;

///
/// FunctionRegistry
///
/// One namespace per `FunctionKind`. Names are stored lowercased and looked up
/// case-insensitively; each lookup returns a fresh, uninitialized instance.
///

#[derive(Default)]
pub struct FunctionRegistry {
    scalars: BTreeMap<String, ScalarFactory>,
    tables: BTreeMap<String, TableFactory>,
    counts: BTreeSet<String>,
}

impl FunctionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every builtin under its default name.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for builtin in BuiltinFunction::ALL {
            let registered = registry.register_builtin(builtin.default_name(), builtin);
            debug_assert!(
                registered.is_ok(),
                "builtin default names collide: {registered:?}"
            );
        }

        registry
    }

    /// Registry holding exactly the aliases a validated config declares.
    /// An empty config falls back to the builtins under their default names.
    pub fn from_config(config: &FunctionsConfig) -> Result<Self, Error> {
        if config.is_empty() {
            return Ok(Self::with_builtins());
        }

        let mut registry = Self::new();
        for entry in config.entries() {
            registry.register_builtin(&entry.name, entry.builtin)?;
        }

        Ok(registry)
    }

    pub fn register_builtin(&mut self, name: &str, builtin: BuiltinFunction) -> Result<(), Error> {
        match builtin {
            BuiltinFunction::Double => self.register_scalar(name, DoubleInt::new),
            BuiltinFunction::SplitName => self.register_table(name, SplitName::new),
            BuiltinFunction::Count => self.register_count(name),
        }
    }

    pub fn register_scalar<F, S>(&mut self, name: &str, init: F) -> Result<(), Error>
    where
        F: Fn() -> S + 'static,
        S: ScalarFunction + 'static,
    {
        let key = Self::claim(FunctionKind::Scalar, name, |key| {
            self.scalars.contains_key(key)
        })?;
        self.scalars.insert(
            key,
            Box::new(move || Box::new(init()) as Box<dyn ScalarFunction>),
        );

        Ok(())
    }

    pub fn register_table<F, T>(&mut self, name: &str, init: F) -> Result<(), Error>
    where
        F: Fn() -> T + 'static,
        T: TableFunction + 'static,
    {
        let key = Self::claim(FunctionKind::Table, name, |key| self.tables.contains_key(key))?;
        self.tables.insert(
            key,
            Box::new(move || Box::new(init()) as Box<dyn TableFunction>),
        );

        Ok(())
    }

    pub fn register_count(&mut self, name: &str) -> Result<(), Error> {
        let key = Self::claim(FunctionKind::Aggregate, name, |key| self.counts.contains(key))?;
        self.counts.insert(key);

        Ok(())
    }

    pub fn scalar(&self, name: &str) -> Result<Box<dyn ScalarFunction>, Error> {
        self.scalars
            .get(&Self::normalize(name))
            .map(|init| init())
            .ok_or_else(|| Error::unknown_function(FunctionKind::Scalar, name))
    }

    pub fn table(&self, name: &str) -> Result<Box<dyn TableFunction>, Error> {
        self.tables
            .get(&Self::normalize(name))
            .map(|init| init())
            .ok_or_else(|| Error::unknown_function(FunctionKind::Table, name))
    }

    /// Resolve a count alias and build it for the given argument kinds.
    pub fn count(
        &self,
        name: &str,
        arguments: &[ValueKind],
        mode: CountMode,
    ) -> Result<CountAggregate, Error> {
        if !self.counts.contains(&Self::normalize(name)) {
            return Err(Error::unknown_function(FunctionKind::Aggregate, name));
        }

        CountAggregate::try_new(arguments, mode)
    }

    /// Every registration as `(kind, lowercased name)`, ordered by kind then name.
    #[must_use]
    pub fn names(&self) -> Vec<(FunctionKind, String)> {
        let scalars = self.scalars.keys().map(|n| (FunctionKind::Scalar, n.clone()));
        let tables = self.tables.keys().map(|n| (FunctionKind::Table, n.clone()));
        let counts = self.counts.iter().map(|n| (FunctionKind::Aggregate, n.clone()));

        scalars.chain(tables).chain(counts).collect()
    }

    fn normalize(name: &str) -> String {
        name.trim().to_ascii_lowercase()
    }

    // Validate a new name against one namespace and return its stored key.
    fn claim(
        kind: FunctionKind,
        name: &str,
        taken: impl FnOnce(&str) -> bool,
    ) -> Result<String, Error> {
        let key = Self::normalize(name);
        if key.is_empty() {
            return Err(Error::registry_configuration(format!(
                "{kind} function name must be non-empty"
            )));
        }
        if taken(&key) {
            return Err(Error::registry_configuration(format!(
                "{kind} function '{key}' is already registered"
            )));
        }

        Ok(key)
    }
}

///
/// TESTS
///
