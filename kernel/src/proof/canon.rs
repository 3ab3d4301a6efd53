//! Canonical JSON bytes for digests.
//!
//! Rules:
//!
//! 1. Object keys are sorted (serde_json's default `Map` is a `BTreeMap`).
//! 2. Compact form, no whitespace.
//! 3. Numbers must be integers. Floats format differently across platforms
//!    and are rejected, so every costed quantity in a hashed artifact is
//!    carried in integer units.

use serde::Serialize;
use serde_json::Value;

/// Failure to produce canonical bytes.
#[derive(Debug, thiserror::Error)]
pub enum CanonError {
    /// A number was not representable as `i64` or `u64`.
    #[error("non-integer number at {path}: {raw}")]
    NonIntegerNumber { path: String, raw: String },

    /// The value could not be converted to JSON at all.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Canonical bytes for an already-built JSON value.
///
/// # Errors
///
/// [`CanonError::NonIntegerNumber`] if any number in `value` is fractional.
pub fn canonical_json_bytes(value: &Value) -> Result<Vec<u8>, CanonError> {
    reject_non_integers(value, &mut String::from("$"))?;
    Ok(serde_json::to_vec(value)?)
}

/// Serialize `value` and return its canonical bytes.
///
/// # Errors
///
/// See [`canonical_json_bytes`]; also fails if `T`'s `Serialize` impl does.
pub fn to_canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CanonError> {
    let value = serde_json::to_value(value)?;
    canonical_json_bytes(&value)
}

fn reject_non_integers(value: &Value, path: &mut String) -> Result<(), CanonError> {
    match value {
        Value::Number(n) if !(n.is_i64() || n.is_u64()) => Err(CanonError::NonIntegerNumber {
            path: path.clone(),
            raw: n.to_string(),
        }),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                let len = path.len();
                path.push_str(&format!("[{i}]"));
                reject_non_integers(item, path)?;
                path.truncate(len);
            }
            Ok(())
        }
        Value::Object(map) => {
            for (key, item) in map {
                let len = path.len();
                path.push('.');
                path.push_str(key);
                reject_non_integers(item, path)?;
                path.truncate(len);
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
