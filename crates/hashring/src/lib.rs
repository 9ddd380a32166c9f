//! Consistent hashing for a dynamic set of backend nodes.
//!
//! A [`HashRing`] maps arbitrary string keys to one of a changing set of
//! nodes so that adding or removing a node remaps only a small, bounded
//! fraction of keys. Each node is placed on the ring at several virtual
//! positions ("replicas"), which smooths load and spreads the remapped
//! ranges when membership changes.
//!
//! This crate provides the fundamental abstractions:
//! - Node handle trait and convenience implementations
//! - Partitioner algorithms (key to ring position)
//! - The ring itself: placement, binary search, and neighbor walks
//!
//! # Example
//!
//! ```rust
//! use hashring::HashRing;
//!
//! let ring: HashRing<String> = HashRing::new();
//! ring.add("cacheA".to_string());
//! ring.add("cacheB".to_string());
//! ring.add("cacheC".to_string());
//!
//! let primary = ring.get("user:42").unwrap();
//! assert!(ring.members().contains(&primary));
//! ```

pub mod error;
pub mod node;
pub mod partitioner;
pub mod ring;

pub use error::{Error, Result};
pub use node::RingNode;
pub use partitioner::{Crc32Partitioner, Partitioner};
pub use ring::{HashRing, RingBuilder};
