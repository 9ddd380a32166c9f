//! Core partitioner trait definitions.

/// A partitioner converts keys into positions on the hash ring.
///
/// Partitioners are stateless and thread-safe, allowing concurrent
/// position generation without synchronization overhead. Any deterministic,
/// reasonably uniform 32-bit hash works; a poor one degrades distribution
/// but never correctness.
pub trait Partitioner: Send + Sync + 'static {
    /// Converts a key into a position on the ring.
    fn position(&self, key: &[u8]) -> u32;

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}
