//! # smallworld
//!
//! An in-memory approximate nearest neighbor index over fixed-dimension
//! `f32` vectors, built on a Hierarchical Navigable Small World (HNSW)
//! graph.
//!
//! ## Features
//!
//! - **Two operations**: `insert` a vector, `search` the k nearest neighbors
//! - **Pluggable distance**: L2 or squared L2, chosen at construction
//! - **Single-writer / multi-reader** concurrency via a reader/writer lock
//! - **Snapshots**: the whole index serializes to one bincode + CRC32 blob
//! - **Deterministic builds** for tests via an injectable level sampler
//!
//! ## Example
//!
//! ```
//! use smallworld::{HnswConfig, HnswIndex};
//!
//! # fn main() -> smallworld::Result<()> {
//! let index = HnswIndex::new(HnswConfig {
//!     dim: 2,
//!     ..HnswConfig::default()
//! });
//!
//! index.insert(&[1.0, 2.0])?;
//! index.insert(&[3.0, 4.0])?;
//!
//! let (ids, distances) = index.search(&[1.0, 2.0], 1)?;
//! assert_eq!(ids, vec![0]);
//! assert_eq!(distances, vec![0.0]);
//! # Ok(())
//! # }
//! ```

/// Default tuning parameters.
pub mod config;
/// Error types surfaced by index operations.
pub mod error;
/// The HNSW graph: structure, search, insertion, distance, level sampling.
pub mod hnsw;
/// The thread-safe index handle.
pub mod index;
/// Snapshot serialization with CRC32 integrity checking.
pub mod snapshot;

pub use error::{IndexError, Result};
pub use hnsw::distance::DistanceKind;
pub use hnsw::graph::{HnswConfig, HnswGraph, Node};
pub use hnsw::level::{EntropyUniform, StaticUniform, UniformSource};
pub use index::HnswIndex;
