//! Canonical model encoding
//!
//! `serde_json::Map` keeps keys ordered, so routing a value through
//! `serde_json::Value` yields one compact byte string per logical value.
//! The BLAKE3 digest of those bytes identifies a fitted model.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanonicalError {
    #[error("canonical encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Compact JSON with object keys in sorted order
pub fn to_canonical_json<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    let tree = serde_json::to_value(value)?;
    Ok(serde_json::to_string(&tree)?)
}

/// Hex BLAKE3 digest of [`to_canonical_json`]
pub fn hash_canonical_hex<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    let encoded = to_canonical_json(value)?;
    let digest = blake3::hash(encoded.as_bytes());
    Ok(hex::encode(digest.as_bytes()))
}
