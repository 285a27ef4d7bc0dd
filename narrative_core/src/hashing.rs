//! Content hashing for deterministic identifiers.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// SHA-256 over length-prefixed parts, truncated to 128 bits.
///
/// Identical parts in identical order always give the same id, across runs
/// and processes. Callers are responsible for sorting unordered inputs.
pub(crate) fn content_hash<I, S>(parts: I) -> Uuid
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = Sha256::new();
    for part in parts {
        let part = part.as_ref();
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part.as_bytes());
    }
    let digest = hasher.finalize();

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    Uuid::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable() {
        let a = content_hash(["MOVE", "MOVER:harry", "ch1"]);
        let b = content_hash(vec!["MOVE".to_string(), "MOVER:harry".into(), "ch1".into()]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_respects_part_boundaries() {
        assert_ne!(content_hash(["ab", "c"]), content_hash(["a", "bc"]));
        assert_ne!(content_hash(["a", "b"]), content_hash(["b", "a"]));
    }
}
