//! Node handle abstractions for the consistent hash ring.
//!
//! The ring does not own backends; it holds caller-supplied handles. A handle
//! only needs a stable name (used to derive replica positions) and cheap
//! equality (used to deduplicate results during neighbor walks). Keep handles
//! small and cheap to clone; heavy mutable state (connections, buffers,
//! metrics) should live elsewhere, indexed by the handle.

use std::sync::Arc;

/// Caller-supplied identity for a backend target.
///
/// # Contract
///
/// - `name()` must be stable for the lifetime of the handle and unique across
///   distinct backends: the ring derives replica positions from it, so two
///   different backends sharing a name are indistinguishable.
/// - Equality is *handle* equality. Membership reconciliation and distinct-N
///   walks compare handles, not names.
pub trait RingNode: Clone + Eq + std::hash::Hash + Send + Sync + 'static {
    /// Stable, unique name used to derive this node's ring positions.
    fn name(&self) -> &str;
}

impl RingNode for String {
    fn name(&self) -> &str {
        self
    }
}

impl RingNode for &'static str {
    fn name(&self) -> &str {
        self
    }
}

/// Shared handles work directly, so callers can keep one allocation per
/// backend and hand out clones.
impl<N: RingNode> RingNode for Arc<N> {
    fn name(&self) -> &str {
        (**self).name()
    }
}
