//! SHA-256 checksum utility for tamper detection.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 checksum of raw migration bytes as lowercase hex.
///
/// Bytes are hashed exactly as read from disk; no line-ending or encoding
/// normalization happens first, so the same file yields the same checksum on
/// every platform.
pub fn compute_checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    format!("{:x}", result)
}

#[cfg(test)]
#[path = "checksum_test.rs"]
mod tests;
