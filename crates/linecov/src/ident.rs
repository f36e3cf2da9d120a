//! Per-file symbol suffixes for generated C identifiers.

use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::path::Path;

/// Hex digits of the path hash kept in the suffix
const HASH_DIGITS: usize = 8;

/// Derive the symbol suffix for a translation unit.
///
/// The result is the file stem with every character outside `[A-Za-z0-9]`
/// replaced by `_` (and a `_` in front of a leading digit), followed by `_`
/// and the first eight hex digits of the SHA-256 of the full path. It is a
/// valid C identifier fragment and differs for equal basenames in different
/// directories.
///
/// ```
/// let a = linecov::derive_id("/src/util/io.c");
/// let b = linecov::derive_id("/src/net/io.c");
/// assert!(a.starts_with("io_"));
/// assert_ne!(a, b);
/// ```
#[must_use]
pub fn derive_id(path: &str) -> String {
    let stem = Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let mut id: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if id.is_empty() || id.starts_with(|c: char| c.is_ascii_digit()) {
        id.insert(0, '_');
    }

    let digest = Sha256::digest(path.as_bytes());
    id.push('_');
    for byte in digest.iter().take(HASH_DIGITS / 2) {
        // Writing to a String cannot fail.
        let _ = write!(id, "{byte:02x}");
    }
    id
}
