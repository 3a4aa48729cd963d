//! Content hashing for synthesized designs.
//!
//! A design is fingerprinted by hashing its `serde_json` serialization with
//! SHA-256. Two designs with identical sizing produce identical fingerprints.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// A 32-byte SHA-256 content hash.
pub type ContentHash = [u8; 32];

/// Compute the SHA-256 content hash of any serializable value.
pub fn content_hash<T: Serialize>(value: &T) -> serde_json::Result<ContentHash> {
    let json = serde_json::to_vec(value)?;
    let mut hasher = Sha256::new();
    hasher.update(&json);
    Ok(hasher.finalize().into())
}

/// Format a content hash as a hex string.
pub fn hash_hex(hash: &ContentHash) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

/// The first `len` hex digits of a fingerprint, for compact display.
pub fn short_hex(hex: &str, len: usize) -> &str {
    &hex[..len.min(hex.len())]
}
