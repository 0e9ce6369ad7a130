//! Function-registration config for udfkit hosts.
//!
//! A config file maps host-visible function names onto builtin
//! implementations, the same way a SQL host binds `CREATE FUNCTION` aliases.

mod error;

use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, fs, path::Path};

pub use error::ConfigError;

///
/// FunctionKind
///
/// Invocation shape of a function. Names are unique per kind.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    Scalar,
    Table,
    Aggregate,
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Scalar => "scalar",
            Self::Table => "table",
            Self::Aggregate => "aggregate",
        };
        write!(f, "{label}")
    }
}

///
/// BuiltinFunction
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinFunction {
    Double,
    SplitName,
    Count,
}

impl BuiltinFunction {
    pub const ALL: [Self; 3] = [Self::Double, Self::SplitName, Self::Count];

    /// Canonical registration name used when no alias is configured.
    #[must_use]
    pub const fn default_name(self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::SplitName => "split_name",
            Self::Count => "count",
        }
    }

    #[must_use]
    pub const fn kind(self) -> FunctionKind {
        match self {
            Self::Double => FunctionKind::Scalar,
            Self::SplitName => FunctionKind::Table,
            Self::Count => FunctionKind::Aggregate,
        }
    }
}

///
/// FunctionEntry
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionEntry {
    pub name: String,
    pub builtin: BuiltinFunction,
}

///
/// FunctionsConfig
///
/// Validated list of function aliases. Names are trimmed and compared
/// case-insensitively.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionsConfig {
    #[serde(default, rename = "function")]
    functions: Vec<FunctionEntry>,
}

impl FunctionsConfig {
    /// Parse and validate one TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let raw: Self = toml::from_str(source)?;

        raw.validated()
    }

    /// Read, parse and validate one TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&source)
    }

    #[must_use]
    pub fn entries(&self) -> &[FunctionEntry] {
        &self.functions
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        let mut seen = BTreeSet::new();

        for (index, entry) in self.functions.iter_mut().enumerate() {
            let name = entry.name.trim().to_string();
            if name.is_empty() {
                return Err(ConfigError::EmptyName { index });
            }
            entry.name.clone_from(&name);

            let kind = entry.builtin.kind();
            if !seen.insert((kind, name.to_ascii_lowercase())) {
                return Err(ConfigError::DuplicateName {
                    kind,
                    name: entry.name.clone(),
                });
            }
        }

        Ok(self)
    }
}

///
/// TESTS
///
