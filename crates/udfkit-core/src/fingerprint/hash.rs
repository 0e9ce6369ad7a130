//! Stable row hashing for distinct fingerprints.
//!
//! The encoding is tagged and length-framed so that structurally different
//! rows never share a byte stream. Version and seed are part of the contract.

use crate::value::Value;
use xxhash_rust::xxh3::Xxh3;

/// Row-hash format version byte used by canonical digest encoding.
pub(crate) const ROW_HASH_VERSION: u8 = 1;

/// Stable XXH3 seed used by canonical row hashing.
pub(crate) const ROW_HASH_SEED: u64 = 0;

///
/// StableHash
///
/// Fixed-width bucket identifier for fingerprint sets: the leading 64 bits of
/// the canonical row digest.
///

pub(crate) type StableHash = u64;

fn feed_u8(h: &mut Xxh3, x: u8) {
    h.update(&[x]);
}
fn feed_u32(h: &mut Xxh3, x: u32) {
    h.update(&x.to_be_bytes());
}
fn feed_i64(h: &mut Xxh3, x: i64) {
    h.update(&x.to_be_bytes());
}
fn feed_bytes(h: &mut Xxh3, b: &[u8]) {
    h.update(b);
}

#[expect(clippy::cast_possible_truncation)]
fn feed_len(h: &mut Xxh3, len: usize) {
    feed_u32(h, len as u32);
}

#[cfg(test)]
thread_local! {
    static TEST_HASH_OVERRIDE: std::cell::Cell<Option<[u8; 16]>> =
        const { std::cell::Cell::new(None) };
}

// Execute one closure with a thread-local test hash override and always restore
// the previous override state, even if the closure panics.
#[cfg(test)]
pub(crate) fn with_test_hash_override<T>(
    override_hash: [u8; 16],
    f: impl FnOnce() -> T + std::panic::UnwindSafe,
) -> T {
    let previous = TEST_HASH_OVERRIDE.with(|cell| cell.replace(Some(override_hash)));
    let result = std::panic::catch_unwind(f);
    TEST_HASH_OVERRIDE.with(|cell| cell.set(previous));
    match result {
        Ok(value) => value,
        Err(payload) => std::panic::resume_unwind(payload),
    }
}

// Map entries hash under canonical key order even when a caller hands in an
// un-normalized map.
fn write_map_entries_to_hasher(entries: &[(Value, Value)], h: &mut Xxh3) {
    let mut ordered = entries.iter().collect::<Vec<_>>();
    ordered.sort_by(|(left_key, left_value), (right_key, right_value)| {
        Value::canonical_cmp(left_key, right_key)
            .then_with(|| Value::canonical_cmp(left_value, right_value))
    });

    feed_len(h, ordered.len());
    for (key, value) in ordered {
        feed_u8(h, 0xFD);
        write_to_hasher(key, h);
        feed_u8(h, 0xFE);
        write_to_hasher(value, h);
    }
}

fn write_to_hasher(value: &Value, h: &mut Xxh3) {
    feed_u8(h, value.canonical_tag().to_u8());

    match value {
        Value::Null => {
            // No payload beyond the canonical tag.
        }
        Value::Bool(b) => feed_u8(h, u8::from(*b)),
        Value::Int(i) => feed_i64(h, *i),
        Value::Text(s) => {
            feed_len(h, s.len());
            feed_bytes(h, s.as_bytes());
        }
        Value::List(xs) => {
            feed_len(h, xs.len());
            for x in xs {
                feed_u8(h, 0xFF);
                write_to_hasher(x, h);
            }
        }
        Value::Map(entries) => write_map_entries_to_hasher(entries, h),
    }
}

/// Canonical 128-bit digest of one row of argument values.
pub(crate) fn hash_row(values: &[Value]) -> [u8; 16] {
    #[cfg(test)]
    if let Some(override_hash) = TEST_HASH_OVERRIDE.with(std::cell::Cell::get) {
        return override_hash;
    }

    let mut h = Xxh3::with_seed(ROW_HASH_SEED);
    feed_u8(&mut h, ROW_HASH_VERSION);

    feed_len(&mut h, values.len());
    for value in values {
        feed_u8(&mut h, 0xFF);
        write_to_hasher(value, &mut h);
    }

    h.digest128().to_be_bytes()
}

/// Derive one stable 64-bit hash from the canonical row digest.
#[must_use]
pub(crate) const fn stable_hash_from_digest(digest: [u8; 16]) -> StableHash {
    u64::from_be_bytes([
        digest[0], digest[1], digest[2], digest[3], digest[4], digest[5], digest[6], digest[7],
    ])
}

pub(crate) fn stable_hash_row(values: &[Value]) -> StableHash {
    stable_hash_from_digest(hash_row(values))
}

///
/// TESTS
///
