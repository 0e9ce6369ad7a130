use crate::FunctionKind;
use std::path::PathBuf;
use thiserror::Error as ThisError;

///
/// ConfigError
///
/// Failures while loading or validating a function-registration config.
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("function entry at index {index} has an empty name")]
    EmptyName { index: usize },

    #[error("{kind} function '{name}' is registered more than once")]
    DuplicateName { kind: FunctionKind, name: String },
}
