use crate::value::Value;

///
/// ValueTag
///
/// Stable canonical value-variant tag used by fingerprint and ordering surfaces.
///
/// IMPORTANT:
/// Tag values feed persisted fingerprints and must never be renumbered.
///
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum ValueTag {
    Null = 1,
    Bool = 2,
    Int = 3,
    Text = 4,
    List = 5,
    Map = 6,
}

impl ValueTag {
    /// Stable hash byte tag for this variant.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Stable canonical variant tag used by fingerprint encodings.
#[must_use]
pub(super) const fn canonical_tag(value: &Value) -> ValueTag {
    match value {
        Value::Null => ValueTag::Null,
        Value::Bool(_) => ValueTag::Bool,
        Value::Int(_) => ValueTag::Int,
        Value::Text(_) => ValueTag::Text,
        Value::List(_) => ValueTag::List,
        Value::Map(_) => ValueTag::Map,
    }
}
