//! Stable posting identifiers.

use sha2::{Digest, Sha256};

/// Separates the source from the line so `("a", "bc")` and `("ab", "c")`
/// hash differently.
const SEPARATOR: u8 = 0x1f;

/// SHA-256 of `source`, a unit separator, and the trimmed line, hex encoded.
///
/// Stable across runs, processes and platforms, so ids persisted in the seen
/// set remain valid after a restart.
pub fn posting_id(source: &str, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update([SEPARATOR]);
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
