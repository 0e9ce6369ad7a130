mod compare;
mod tag;


use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

pub use tag::ValueTag;

///
/// MapValueError
///
/// Invariant violations for `Value::Map` normalization.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum MapValueError {
    #[error("map key at index {index} must be non-null")]
    EmptyKey { index: usize },

    #[error("map key at index {index} is not scalar: {key:?}")]
    NonScalarKey { index: usize, key: Value },

    #[error(
        "map contains duplicate keys at normalized positions {left_index} and {right_index}"
    )]
    DuplicateKey {
        left_index: usize,
        right_index: usize,
    },
}

///
/// ValueKind
///
/// Semantic kind of one argument column, negotiated once when a function is
/// initialized and never re-inspected per row.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum ValueKind {
    #[display("null")]
    Null,
    #[display("bool")]
    Bool,
    #[display("int")]
    Int,
    #[display("text")]
    Text,
    #[display("composite")]
    Composite,
}

impl ValueKind {
    /// Return true when a runtime value is acceptable for a column of this kind.
    /// Null is acceptable everywhere.
    #[must_use]
    pub const fn accepts(self, value: &Value) -> bool {
        match value {
            Value::Null => true,
            _ => matches!(
                (self, value.kind()),
                (Self::Bool, Self::Bool)
                    | (Self::Int, Self::Int)
                    | (Self::Text, Self::Text)
                    | (Self::Composite, Self::Composite)
            ),
        }
    }
}

///
/// Value
///
/// Row value handed to functions by the host engine.
///
/// Null        → SQL NULL.
/// List        → ordered composite; order is significant for equality.
/// Map         → unordered composite; equality is over canonical key order.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<Self>),
    Map(Vec<(Self, Self)>),
}

impl Value {
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Text(_) => ValueKind::Text,
            Self::List(_) | Self::Map(_) => ValueKind::Composite,
        }
    }

    /// Top-level null check. A composite holding nulls is itself non-null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Self::List(_) | Self::Map(_))
    }

    #[must_use]
    pub const fn canonical_tag(&self) -> ValueTag {
        tag::canonical_tag(self)
    }

    /// Sort map entries into canonical key order and reject invalid keys.
    pub fn normalize_map_entries(
        entries: Vec<(Self, Self)>,
    ) -> Result<Vec<(Self, Self)>, MapValueError> {
        for (index, (key, _)) in entries.iter().enumerate() {
            if key.is_null() {
                return Err(MapValueError::EmptyKey { index });
            }
            if !key.is_scalar() {
                return Err(MapValueError::NonScalarKey {
                    index,
                    key: key.clone(),
                });
            }
        }

        let mut entries = entries;
        entries.sort_by(|(left, _), (right, _)| Self::canonical_cmp(left, right));

        for (left_index, pair) in entries.windows(2).enumerate() {
            if Self::canonical_cmp(&pair[0].0, &pair[1].0).is_eq() {
                return Err(MapValueError::DuplicateKey {
                    left_index,
                    right_index: left_index + 1,
                });
            }
        }

        Ok(entries)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
