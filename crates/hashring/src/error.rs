//! Error types for the ring.

use thiserror::Error;

/// Result type alias for ring operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when querying the ring.
///
/// Queries against a non-empty ring always succeed: the ring wraps
/// circularly, so every key has *some* nearest node. The only failure is
/// querying before any node has been registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// No node is registered on the ring.
    #[error("empty ring")]
    EmptyRing,
}
