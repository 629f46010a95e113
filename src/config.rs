//! Default tuning parameters for the index.
//!
//! These are compile-time constants; per-index values are set through
//! [`HnswConfig`](crate::hnsw::graph::HnswConfig) at construction.

/// Default number of bidirectional links per node per layer.
///
/// Higher values improve recall but increase memory and build time.
/// Typical range: 8–64.
pub const DEFAULT_M: usize = 16;

/// Default beam width during index construction.
///
/// Controls the size of the dynamic candidate list during insertion.
/// Higher values produce a better graph but slow down build time.
pub const DEFAULT_EF_CONSTRUCTION: usize = 200;

/// Default beam width during search.
///
/// Higher values improve recall at the cost of latency.
pub const DEFAULT_EF_SEARCH: usize = 20;

/// Hard ceiling for sampled node levels.
pub const DEFAULT_MAX_LEVEL_CAP: usize = 16;

/// Default vector dimension.
pub const DEFAULT_DIM: usize = 128;

/// Default capacity reserve for the node and vector sequences.
///
/// Not a hard limit (the sequences grow past it), but a good hint avoids
/// reallocation during bulk loads.
pub const DEFAULT_SIZE_HINT: usize = 1000;
