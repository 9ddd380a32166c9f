//! Partitioner algorithms.
//!
//! A partitioner converts keys into 32-bit ring positions. The specific hash
//! is not load-bearing for correctness, only for distribution quality, so it
//! sits behind a trait seam.

pub mod crc32;
pub mod traits;

pub use crc32::Crc32Partitioner;
pub use traits::Partitioner;
