//! Consistent hash ring implementation.
//!
//! The ring manages replica positions and provides efficient lookup
//! operations for finding the nodes responsible for keys.
//!
//! # Structure
//!
//! Three pieces of state move in lock-step under one read-write lock:
//!
//! - a position table mapping each occupied 32-bit position to its node,
//! - the membership set of registered node handles,
//! - a sorted cache of all occupied positions, rebuilt on every mutation.
//!
//! Queries binary-search the sorted cache for the first position strictly
//! greater than the key's hash, wrapping to the smallest position when none
//! is greater ("clockwise nearest"). Multi-node queries continue walking the
//! cache forward, collecting distinct handles.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{Error, Result};
use crate::node::RingNode;
use crate::partitioner::{Crc32Partitioner, Partitioner};

/// Default number of virtual positions placed per node.
pub const DEFAULT_REPLICAS: usize = 20;

/// Lock-guarded ring state.
///
/// Invariants (maintained by every mutation before the write lock drops):
/// - every `circle` entry corresponds to a (member, replica index) pair;
/// - a node is in `members` iff all its replica positions are in `circle`
///   (modulo hash collisions between different nodes' replicas, which
///   silently overwrite and are accepted as a bounded-probability loss);
/// - `sorted` is exactly `circle`'s key set in ascending order.
struct RingState<N> {
    circle: HashMap<u32, N>,
    members: HashSet<N>,
    sorted: Vec<u32>,
}

/// A consistent hash ring over caller-supplied node handles.
///
/// The ring is a passive shared structure: all methods take `&self` and
/// synchronize internally, so it can sit behind an `Arc` and be used from
/// many threads. Mutations hold an exclusive lock for the full
/// mutate-then-rebuild sequence; queries hold a shared lock.
///
/// The replica count is fixed at construction so every node is placed with
/// the same number of virtual positions for the ring's whole lifetime.
pub struct HashRing<N: RingNode, P: Partitioner = Crc32Partitioner> {
    replicas: usize,
    partitioner: P,
    state: RwLock<RingState<N>>,
}

impl<N: RingNode> HashRing<N> {
    /// Creates an empty ring with [`DEFAULT_REPLICAS`] virtual positions per
    /// node and the CRC32 partitioner.
    pub fn new() -> Self {
        Self::with_replicas(DEFAULT_REPLICAS)
    }

    /// Creates an empty ring with a custom replica count.
    ///
    /// # Panics
    ///
    /// Panics if `replicas` is zero.
    pub fn with_replicas(replicas: usize) -> Self {
        RingBuilder::new().replicas(replicas).build()
    }
}

impl<N: RingNode> Default for HashRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: RingNode, P: Partitioner> HashRing<N, P> {
    /// Registers a node, placing all its replica positions on the ring.
    ///
    /// Returns `false` without touching the ring if an equal handle is
    /// already a member, so repeated adds can never skew the member count.
    pub fn add(&self, node: N) -> bool {
        let mut state = self.state.write();
        if state.members.contains(&node) {
            return false;
        }
        debug!(node = node.name(), replicas = self.replicas, "adding node");
        self.insert_replicas(&mut state, node);
        self.rebuild_sorted(&mut state);
        true
    }

    /// Deregisters a node, deleting all its replica positions.
    ///
    /// Returns `false` if the handle was not a member; membership and query
    /// results are left unchanged in that case.
    pub fn remove(&self, node: &N) -> bool {
        let mut state = self.state.write();
        if !state.members.contains(node) {
            return false;
        }
        debug!(node = node.name(), "removing node");
        self.remove_replicas(&mut state, node);
        self.rebuild_sorted(&mut state);
        true
    }

    /// Reconciles membership to exactly `nodes` in a single critical section:
    /// current members not in `nodes` are removed, listed nodes not yet
    /// members are added, and nodes present in both are untouched.
    ///
    /// Comparison is handle equality, not name equality.
    pub fn set(&self, nodes: &[N]) {
        let mut state = self.state.write();
        let stale: Vec<N> = state
            .members
            .iter()
            .filter(|member| !nodes.contains(member))
            .cloned()
            .collect();
        for node in &stale {
            self.remove_replicas(&mut state, node);
        }
        for node in nodes {
            if !state.members.contains(node) {
                self.insert_replicas(&mut state, node.clone());
            }
        }
        self.rebuild_sorted(&mut state);
        debug!(members = state.members.len(), "membership reconciled");
    }

    /// Returns the current members as an unordered snapshot.
    pub fn members(&self) -> Vec<N> {
        self.state.read().members.iter().cloned().collect()
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.state.read().members.len()
    }

    /// True if no node is registered.
    pub fn is_empty(&self) -> bool {
        self.state.read().members.is_empty()
    }

    /// Number of occupied ring positions.
    ///
    /// Usually `len() * replicas()`; fewer if replica hashes collided.
    pub fn position_count(&self) -> usize {
        self.state.read().circle.len()
    }

    /// Virtual positions placed per node.
    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Name of the partitioner in use.
    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }

    /// Returns the node owning the first ring position clockwise from
    /// `key`'s hash.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyRing`] if no node is registered.
    pub fn get(&self, key: &str) -> Result<N> {
        let state = self.state.read();
        if state.circle.is_empty() {
            return Err(Error::EmptyRing);
        }
        let start = search(&state.sorted, self.partitioner.position(key.as_bytes()));
        Ok(state.circle[&state.sorted[start]].clone())
    }

    /// Returns the primary node for `key` plus the next distinct node on the
    /// ring. The second result is `None` when only one node is registered.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyRing`] if no node is registered.
    pub fn get_two(&self, key: &str) -> Result<(N, Option<N>)> {
        let state = self.state.read();
        if state.circle.is_empty() {
            return Err(Error::EmptyRing);
        }
        let start = search(&state.sorted, self.partitioner.position(key.as_bytes()));
        let first = state.circle[&state.sorted[start]].clone();
        if state.members.len() == 1 {
            return Ok((first, None));
        }

        let mut index = start;
        let second = loop {
            index = (index + 1) % state.sorted.len();
            if index == start {
                // full lap without a distinct node; unreachable with >1 member
                break None;
            }
            let candidate = &state.circle[&state.sorted[index]];
            if *candidate != first {
                break Some(candidate.clone());
            }
        };
        Ok((first, second))
    }

    /// Returns up to `n` distinct nodes for `key`: the primary first, then
    /// the walk order of the ring. The result is clamped to the member
    /// count, so `n >= len()` yields every member exactly once.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyRing`] if no node is registered.
    pub fn get_n(&self, key: &str, n: usize) -> Result<Vec<N>> {
        let state = self.state.read();
        if state.circle.is_empty() {
            return Err(Error::EmptyRing);
        }
        let wanted = n.min(state.members.len());
        let mut found = Vec::with_capacity(wanted);
        if wanted == 0 {
            return Ok(found);
        }

        let start = search(&state.sorted, self.partitioner.position(key.as_bytes()));
        found.push(state.circle[&state.sorted[start]].clone());

        let mut index = start;
        while found.len() < wanted {
            index = (index + 1) % state.sorted.len();
            if index == start {
                break;
            }
            let candidate = &state.circle[&state.sorted[index]];
            if !found.contains(candidate) {
                found.push(candidate.clone());
            }
        }
        Ok(found)
    }

    // Membership mutators. Callers hold the write lock and rebuild the
    // sorted cache before releasing it.

    fn insert_replicas(&self, state: &mut RingState<N>, node: N) {
        for index in 0..self.replicas {
            let position = self.replica_position(index, node.name());
            state.circle.insert(position, node.clone());
        }
        state.members.insert(node);
    }

    fn remove_replicas(&self, state: &mut RingState<N>, node: &N) {
        for index in 0..self.replicas {
            let position = self.replica_position(index, node.name());
            state.circle.remove(&position);
        }
        state.members.remove(node);
    }

    /// Position of a node's `index`-th replica: hash of the replica index
    /// concatenated before the node name. The order is arbitrary but must
    /// stay consistent between insertion and removal.
    fn replica_position(&self, index: usize, name: &str) -> u32 {
        self.partitioner
            .position(format!("{index}{name}").as_bytes())
    }

    /// Rebuilds the sorted position cache from the position table.
    ///
    /// The backing buffer is reused across rebuilds; when its capacity has
    /// grown past roughly 4x the occupied positions (a shrunken ring), a
    /// fresh allocation releases the excess.
    fn rebuild_sorted(&self, state: &mut RingState<N>) {
        if state.sorted.capacity() / (self.replicas * 4) > state.circle.len() {
            state.sorted = Vec::with_capacity(state.circle.len());
        } else {
            state.sorted.clear();
        }
        state.sorted.extend(state.circle.keys().copied());
        state.sorted.sort_unstable();
    }
}

/// Index of the first position strictly greater than `key`, wrapping to 0
/// when `key` is at or past the largest position.
fn search(sorted: &[u32], key: u32) -> usize {
    let index = sorted.partition_point(|&position| position <= key);
    if index == sorted.len() {
        0
    } else {
        index
    }
}

/// Builder for [`HashRing`], following the ring's construct-then-mutate
/// lifecycle: replica count and partitioner are fixed at build time, initial
/// members are optional.
///
/// ```rust
/// use hashring::{HashRing, RingBuilder};
///
/// let ring: HashRing<&'static str> = RingBuilder::new()
///     .replicas(40)
///     .add_node("cacheA")
///     .add_node("cacheB")
///     .build();
/// assert_eq!(ring.len(), 2);
/// ```
pub struct RingBuilder<N: RingNode, P: Partitioner = Crc32Partitioner> {
    replicas: usize,
    partitioner: P,
    nodes: Vec<N>,
}

impl<N: RingNode> RingBuilder<N> {
    /// Starts a builder with the default replica count and partitioner.
    pub fn new() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            partitioner: Crc32Partitioner,
            nodes: Vec::new(),
        }
    }
}

impl<N: RingNode> Default for RingBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: RingNode, P: Partitioner> RingBuilder<N, P> {
    /// Sets the number of virtual positions per node.
    ///
    /// # Panics
    ///
    /// Panics if `replicas` is zero.
    pub fn replicas(mut self, replicas: usize) -> Self {
        assert!(replicas > 0, "replica count must be positive");
        self.replicas = replicas;
        self
    }

    /// Swaps in a different partitioner.
    pub fn partitioner<Q: Partitioner>(self, partitioner: Q) -> RingBuilder<N, Q> {
        RingBuilder {
            replicas: self.replicas,
            partitioner,
            nodes: self.nodes,
        }
    }

    /// Queues a node to be registered when the ring is built.
    pub fn add_node(mut self, node: N) -> Self {
        self.nodes.push(node);
        self
    }

    /// Builds the ring and registers the queued nodes.
    pub fn build(self) -> HashRing<N, P> {
        let ring = HashRing {
            replicas: self.replicas,
            partitioner: self.partitioner,
            state: RwLock::new(RingState {
                circle: HashMap::new(),
                members: HashSet::new(),
                sorted: Vec::new(),
            }),
        };
        for node in self.nodes {
            ring.add(node);
        }
        ring
    }
}
