//! Deterministic artifact rendering.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Render the compiled collection to canonical artifact bytes.
///
/// Two-space indentation, keys in insertion order (metadata fields
/// first, record array last; keys are never re-sorted), terminated by
/// exactly one trailing newline. Identical input values always produce
/// identical bytes.
pub fn to_artifact_bytes(collection: &Map<String, Value>) -> serde_json::Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(collection)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Lowercase hex SHA-256 of the artifact bytes.
///
/// Used for debug logging and quick equality checks; never persisted.
#[must_use]
pub fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
