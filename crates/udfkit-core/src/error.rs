use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Structured function error with a stable classification.
/// Every failure raised by a function is deterministic for its configuration
/// and inputs; hosts must propagate it rather than retry.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct Error {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct an aggregate-origin configuration error.
    pub(crate) fn aggregate_configuration(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::Configuration,
            ErrorOrigin::Aggregate,
            message.into(),
        )
    }

    /// Construct an aggregate-origin unsupported-operation error.
    pub(crate) fn aggregate_unsupported(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::Unsupported,
            ErrorOrigin::Aggregate,
            message.into(),
        )
    }

    /// Construct an aggregate-origin invalid-argument error.
    pub(crate) fn aggregate_invalid_argument(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvalidArgument,
            ErrorOrigin::Aggregate,
            message.into(),
        )
    }

    /// Construct a scalar-origin configuration error.
    pub(crate) fn scalar_configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Configuration, ErrorOrigin::Scalar, message.into())
    }

    /// Construct a scalar-origin invalid-argument error.
    pub(crate) fn scalar_invalid_argument(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvalidArgument,
            ErrorOrigin::Scalar,
            message.into(),
        )
    }

    /// Construct a table-origin configuration error.
    pub(crate) fn table_configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Configuration, ErrorOrigin::Table, message.into())
    }

    /// Construct a table-origin invalid-argument error.
    pub(crate) fn table_invalid_argument(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvalidArgument,
            ErrorOrigin::Table,
            message.into(),
        )
    }

    /// Construct a registry-origin configuration error.
    pub(crate) fn registry_configuration(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::Configuration,
            ErrorOrigin::Registry,
            message.into(),
        )
    }

    /// Construct a standardized unknown-function error.
    pub(crate) fn unknown_function(kind: impl fmt::Display, name: &str) -> Self {
        Self::new(
            ErrorClass::NotFound,
            ErrorOrigin::Registry,
            format!("unknown {kind} function: '{name}'"),
        )
    }

    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self.class, ErrorClass::Configuration)
    }

    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self.class, ErrorClass::Unsupported)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorClass
///
/// Configuration errors surface once, at function setup, before any row is
/// processed. Unsupported errors surface when a lifecycle call is illegal for
/// the configured mode.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Configuration,
    Unsupported,
    InvalidArgument,
    NotFound,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::Unsupported => "unsupported",
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Aggregate,
    Scalar,
    Table,
    Registry,
    Value,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Aggregate => "aggregate",
            Self::Scalar => "scalar",
            Self::Table => "table",
            Self::Registry => "registry",
            Self::Value => "value",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
