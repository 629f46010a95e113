//! The concurrent index handle.
//!
//! [`HnswIndex`] wraps the graph in a reader/writer lock: any number of
//! concurrent searches, one writer at a time. Cloning the handle produces
//! another reference to the same shared index. Ids are assigned in the
//! order inserts acquire the write lock, and a reader never observes a
//! partially linked node.

use crate::error::{IndexError, Result};
use crate::hnsw::graph::{HnswConfig, HnswGraph};
use crate::hnsw::level::UniformSource;
use crate::hnsw::search::knn_search;
use crate::snapshot;
use parking_lot::RwLock;
use std::io;
use std::sync::Arc;

/// A thread-safe HNSW index over fixed-dimension `f32` vectors.
#[derive(Debug, Clone)]
pub struct HnswIndex {
    graph: Arc<RwLock<HnswGraph>>,
}

impl HnswIndex {
    /// Create an empty index with an entropy-seeded level sampler.
    pub fn new(config: HnswConfig) -> Self {
        Self::from_graph(HnswGraph::new(config))
    }

    /// Create an empty index with default configuration.
    pub fn with_default_config() -> Self {
        Self::new(HnswConfig::default())
    }

    /// Create an empty index with a caller-supplied draw source for level
    /// sampling. Deterministic sources make builds reproducible.
    pub fn with_rng(config: HnswConfig, rng: Box<dyn UniformSource>) -> Self {
        Self::from_graph(HnswGraph::with_rng(config, rng))
    }

    fn from_graph(graph: HnswGraph) -> Self {
        Self {
            graph: Arc::new(RwLock::new(graph)),
        }
    }

    /// Insert a vector; returns its id. Ids are dense and assigned in
    /// insertion order.
    pub fn insert(&self, vector: &[f32]) -> Result<u32> {
        self.graph.write().insert(vector)
    }

    /// Find the `k` nearest neighbors of `query`.
    ///
    /// Returns ids and distances sorted ascending by distance; at most `k`
    /// entries and never more than the number of inserted vectors. An empty
    /// index yields empty results before any validation of `query` itself.
    pub fn search(&self, query: &[f32], k: usize) -> Result<(Vec<u32>, Vec<f32>)> {
        if k == 0 {
            return Err(IndexError::InvalidArgument(
                "k must be at least 1".to_string(),
            ));
        }
        let graph = self.graph.read();
        if graph.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }
        if query.len() != graph.config.dim {
            return Err(IndexError::DimensionMismatch {
                expected: graph.config.dim,
                actual: query.len(),
            });
        }

        let found = knn_search(&graph, query, k);
        let mut ids = Vec::with_capacity(found.len());
        let mut distances = Vec::with_capacity(found.len());
        for (distance, id) in found {
            ids.push(id);
            distances.push(distance);
        }
        Ok((ids, distances))
    }

    /// Serialize the whole index to `writer`.
    pub fn save<W: io::Write>(&self, writer: W) -> Result<()> {
        snapshot::save(&self.graph.read(), writer)
    }

    /// Deserialize an index from `reader`. The level RNG is freshly seeded.
    pub fn load<R: io::Read>(reader: R) -> Result<Self> {
        Ok(Self::from_graph(snapshot::load(reader)?))
    }

    /// Number of vectors in the index.
    pub fn len(&self) -> usize {
        self.graph.read().len()
    }

    /// Returns `true` if nothing has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.graph.read().is_empty()
    }

    /// A copy of the index configuration.
    pub fn config(&self) -> HnswConfig {
        self.graph.read().config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hnsw::level::StaticUniform;

    fn tiny_config() -> HnswConfig {
        HnswConfig {
            m: 5,
            ef_construction: 16,
            ef_search: 16,
            max_level_cap: 5,
            dim: 2,
            size_hint: 16,
            ..HnswConfig::default()
        }
    }

    #[test]
    fn test_single_insert_search() {
        let index = HnswIndex::new(tiny_config());
        let id = index.insert(&[1.0, 2.0]).unwrap();
        assert_eq!(id, 0);

        let (ids, distances) = index.search(&[1.0, 2.0], 1).unwrap();
        assert_eq!(ids, vec![0]);
        assert_eq!(distances, vec![0.0]);
    }

    #[test]
    fn test_search_empty_index() {
        let index = HnswIndex::new(tiny_config());
        let (ids, distances) = index.search(&[0.0, 0.0], 3).unwrap();
        assert!(ids.is_empty());
        assert!(distances.is_empty());
    }

    #[test]
    fn test_search_rejects_zero_k() {
        let index = HnswIndex::new(tiny_config());
        let err = index.search(&[0.0, 0.0], 0).unwrap_err();
        assert!(matches!(err, IndexError::InvalidArgument(_)));
    }

    #[test]
    fn test_search_rejects_wrong_dimension() {
        let index = HnswIndex::new(tiny_config());
        index.insert(&[0.0, 0.0]).unwrap();
        let err = index.search(&[0.0, 0.0, 0.0], 1).unwrap_err();
        assert!(matches!(err, IndexError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_empty_index_wins_over_wrong_dimension() {
        // Emptiness is checked before the query is validated, so even a
        // wrong-length query gets the empty result, not an error.
        let index = HnswIndex::new(tiny_config());
        let (ids, distances) = index.search(&[0.0, 0.0, 0.0], 1).unwrap();
        assert!(ids.is_empty());
        assert!(distances.is_empty());
    }

    #[test]
    fn test_results_sorted_and_capped() {
        let index = HnswIndex::with_rng(tiny_config(), Box::new(StaticUniform(0.03)));
        for i in 0..8u32 {
            index.insert(&[i as f32, 0.0]).unwrap();
        }

        let (ids, distances) = index.search(&[0.0, 0.0], 4).unwrap();
        assert_eq!(ids.len(), 4);
        assert_eq!(ids[0], 0);
        for window in distances.windows(2) {
            assert!(window[0] <= window[1]);
        }

        // k larger than the index: every node comes back.
        let (ids, _) = index.search(&[0.0, 0.0], 50).unwrap();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn test_clone_shares_state() {
        let index = HnswIndex::new(tiny_config());
        let other = index.clone();
        index.insert(&[1.0, 1.0]).unwrap();
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn test_concurrent_readers_during_inserts() {
        let index = HnswIndex::new(HnswConfig {
            dim: 2,
            ..tiny_config()
        });
        for i in 0..50u32 {
            index.insert(&[(i % 10) as f32, (i / 10) as f32]).unwrap();
        }

        let mut handles = Vec::new();
        for t in 0..4 {
            let reader = index.clone();
            handles.push(std::thread::spawn(move || {
                for i in 0..200 {
                    let probe = [((i + t) % 10) as f32, 1.0];
                    let (ids, _) = reader.search(&probe, 5).unwrap();
                    assert!(!ids.is_empty());
                    assert!(ids.len() <= 5);
                }
            }));
        }
        let writer = index.clone();
        handles.push(std::thread::spawn(move || {
            for i in 0..50u32 {
                writer.insert(&[(i % 10) as f32, 5.0 + (i / 10) as f32]).unwrap();
            }
        }));

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(index.len(), 100);
    }

    #[test]
    fn test_ids_dense_in_insert_order() {
        let index = HnswIndex::new(tiny_config());
        for i in 0..5u32 {
            let id = index.insert(&[i as f32, i as f32]).unwrap();
            assert_eq!(id, i);
        }
        assert_eq!(index.len(), 5);
    }
}
