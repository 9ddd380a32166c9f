//! CRC32 partitioner implementation.

use crate::partitioner::traits::Partitioner;

/// CRC32 (IEEE) partitioner, the default for the ring.
///
/// CRC32 is not a cryptographic hash, but it is fast, deterministic, and
/// uniform enough for replica placement on a 32-bit ring.
#[derive(Clone, Copy, Debug, Default)]
pub struct Crc32Partitioner;

impl Partitioner for Crc32Partitioner {
    fn position(&self, key: &[u8]) -> u32 {
        crc32fast::hash(key)
    }

    fn name(&self) -> &'static str {
        "Crc32Partitioner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_is_deterministic() {
        let p = Crc32Partitioner;
        assert_eq!(p.position(b"user:42"), p.position(b"user:42"));
    }

    #[test]
    fn distinct_keys_usually_differ() {
        let p = Crc32Partitioner;
        assert_ne!(p.position(b"0cacheA"), p.position(b"1cacheA"));
        assert_ne!(p.position(b"0cacheA"), p.position(b"0cacheB"));
    }
}
