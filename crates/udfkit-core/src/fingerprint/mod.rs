//! Module: fingerprint
//! Responsibility: canonical row keys and the duplicate-suppression set.
//! Does not own: null-skipping policy (callers decide which rows qualify).
//! Boundary: value-equality dedup for DISTINCT aggregation.

mod hash;

use crate::{
    error::{Error, ErrorClass, ErrorOrigin},
    value::{MapValueError, Value},
};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

use hash::{StableHash, stable_hash_row};

#[cfg(test)]
pub(crate) use hash::with_test_hash_override;

///
/// FingerprintError
///
/// Canonicalization failures while materializing one row fingerprint.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum FingerprintError {
    #[error("row fingerprint rejected map value in column {column}: {source}")]
    InvalidMapValue {
        column: usize,
        #[source]
        source: MapValueError,
    },
}

impl From<FingerprintError> for Error {
    fn from(err: FingerprintError) -> Self {
        Self::new(ErrorClass::InvalidArgument, ErrorOrigin::Value, err.to_string())
    }
}

///
/// RowFingerprint
///
/// Canonical, structurally comparable key for one row of argument values.
/// Equal rows (under canonical value equality) always share a stable hash.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RowFingerprint {
    row: Vec<Value>,
    hash: StableHash,
}

impl RowFingerprint {
    /// Canonicalize one row and compute its stable hash.
    pub fn from_row(values: &[Value]) -> Result<Self, FingerprintError> {
        let row = values
            .iter()
            .enumerate()
            .map(|(column, value)| {
                canonicalize_value(value)
                    .map_err(|source| FingerprintError::InvalidMapValue { column, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let hash = stable_hash_row(&row);

        Ok(Self { row, hash })
    }

    #[must_use]
    pub const fn hash(&self) -> u64 {
        self.hash
    }
}

///
/// FingerprintSet
///
/// Tracks fingerprints by stable-hash bucket while keeping canonical-value
/// equality checks inside each bucket, so a hash collision never suppresses a
/// distinct row. Memory is unbounded; spilling belongs to the host engine.
///

#[derive(Clone, Debug, Default)]
pub struct FingerprintSet {
    buckets: BTreeMap<StableHash, Vec<RowFingerprint>>,
    len: usize,
}

impl FingerprintSet {
    /// Insert one fingerprint and return true if it was newly observed.
    pub fn insert(&mut self, fingerprint: RowFingerprint) -> bool {
        let bucket = self.buckets.entry(fingerprint.hash).or_default();
        if bucket.iter().any(|existing| existing.row == fingerprint.row) {
            return false;
        }

        bucket.push(fingerprint);
        self.len += 1;
        true
    }

    /// Fingerprint+insert one raw row and return true when it is new.
    pub fn insert_row(&mut self, values: &[Value]) -> Result<bool, FingerprintError> {
        let fingerprint = RowFingerprint::from_row(values)?;

        Ok(self.insert(fingerprint))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

fn canonicalize_value(value: &Value) -> Result<Value, MapValueError> {
    match value {
        Value::List(items) => items
            .iter()
            .map(canonicalize_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        Value::Map(entries) => {
            let mut canonical_entries = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                canonical_entries.push((canonicalize_value(key)?, canonicalize_value(value)?));
            }

            Value::normalize_map_entries(canonical_entries).map(Value::Map)
        }
        _ => Ok(value.clone()),
    }
}

///
/// TESTS
///
