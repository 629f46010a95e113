//! Graph structure and configuration.
//!
//! [`HnswConfig`] holds the tuning parameters; [`HnswGraph`] owns the vector
//! arena and the node records. Vector data is stored contiguously with a
//! stride of `dim` so lookups are a slice into the arena. Adjacency stores
//! node ids, never node handles: the graph is cyclic and ids keep lifetime
//! management flat.

use crate::config;
use crate::hnsw::distance::DistanceKind;
use crate::hnsw::level::{EntropyUniform, UniformSource};
use serde::{Deserialize, Serialize};

/// Configuration parameters for an index.
///
/// Controls the trade-off between build speed, search speed, recall, and
/// memory usage. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HnswConfig {
    /// Target number of bidirectional links per node per layer.
    pub m: usize,
    /// Beam width during construction.
    pub ef_construction: usize,
    /// Beam width during search (higher = better recall, slower).
    pub ef_search: usize,
    /// Hard ceiling for sampled node levels.
    pub max_level_cap: usize,
    /// Vector dimension.
    pub dim: usize,
    /// Capacity reserve for the node and vector sequences.
    pub size_hint: usize,
    /// Distance function for vector comparison.
    pub distance: DistanceKind,
}

impl Default for HnswConfig {
    fn default() -> Self {
        Self {
            m: config::DEFAULT_M,
            ef_construction: config::DEFAULT_EF_CONSTRUCTION,
            ef_search: config::DEFAULT_EF_SEARCH,
            max_level_cap: config::DEFAULT_MAX_LEVEL_CAP,
            dim: config::DEFAULT_DIM,
            size_hint: config::DEFAULT_SIZE_HINT,
            distance: DistanceKind::L2,
        }
    }
}

/// A node in the graph. The id doubles as the index into the node sequence
/// and the vector arena; both are immutable after insertion, as is
/// `max_level`. Only the adjacency lists mutate, and only during inserts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: u32,
    /// Topmost layer this node participates in.
    pub max_level: usize,
    /// Neighbor ids per layer; always `max_level + 1` entries so layer 0
    /// exists for every node.
    pub neighbors: Vec<Vec<u32>>,
}

fn default_level_rng() -> Box<dyn UniformSource> {
    Box::new(EntropyUniform::new())
}

/// The HNSW graph: vector arena, node records, and entry point.
///
/// `HnswGraph` is the single-threaded core; it performs no locking itself.
/// [`HnswIndex`](crate::index::HnswIndex) wraps it in a reader/writer lock
/// for concurrent use.
#[derive(Debug, Serialize, Deserialize)]
pub struct HnswGraph {
    pub config: HnswConfig,
    /// Level-sampling scale, `1 / ln(m)`.
    pub(crate) m_l: f64,
    /// Layer of the current entry point.
    pub(crate) cur_max_level: usize,
    /// Entry point for all searches; `None` iff the graph is empty.
    pub(crate) entry_point: Option<u32>,
    pub(crate) nodes: Vec<Node>,
    /// Contiguous vector arena, stride `config.dim`.
    pub(crate) vectors: Vec<f32>,
    /// Draw source for level sampling. Not part of the snapshot; a loaded
    /// graph gets a fresh entropy-seeded source.
    #[serde(skip, default = "default_level_rng")]
    rng: Box<dyn UniformSource>,
}

impl HnswGraph {
    /// Create an empty graph with an entropy-seeded level sampler.
    pub fn new(config: HnswConfig) -> Self {
        Self::with_rng(config, default_level_rng())
    }

    /// Create an empty graph with a caller-supplied draw source.
    pub fn with_rng(config: HnswConfig, rng: Box<dyn UniformSource>) -> Self {
        let m_l = 1.0 / (config.m as f64).ln();
        let mut graph = Self {
            m_l,
            cur_max_level: 0,
            entry_point: None,
            nodes: Vec::new(),
            vectors: Vec::new(),
            rng,
            config,
        };
        graph.nodes.reserve(graph.config.size_hint);
        graph
            .vectors
            .reserve(graph.config.size_hint * graph.config.dim);
        graph
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no vector has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The vector stored for `id`. O(1) slice into the arena.
    #[inline]
    pub fn vector(&self, id: u32) -> &[f32] {
        let start = id as usize * self.config.dim;
        &self.vectors[start..start + self.config.dim]
    }

    /// Distance from `query` to the vector stored for `id`.
    #[inline]
    pub(crate) fn distance_to(&self, query: &[f32], id: u32) -> f32 {
        self.config.distance.distance(query, self.vector(id))
    }

    /// Neighbor ids of `id` at `layer`; empty when the node does not reach
    /// that layer.
    #[inline]
    pub fn neighbors(&self, id: u32, layer: usize) -> &[u32] {
        self.nodes[id as usize]
            .neighbors
            .get(layer)
            .map_or(&[], Vec::as_slice)
    }

    /// Replace the adjacency of `id` at `layer`. The list must already
    /// respect the degree cap.
    pub fn set_neighbors(&mut self, id: u32, layer: usize, list: Vec<u32>) {
        debug_assert!(list.len() <= self.config.m);
        self.nodes[id as usize].neighbors[layer] = list;
    }

    /// Append a vector and a fresh node with empty adjacency for
    /// `max_level + 1` layers. Returns the new id. Caller holds the writer
    /// lock.
    pub fn append_node(&mut self, vector: &[f32], max_level: usize) -> u32 {
        let id = self.nodes.len() as u32;
        self.vectors.extend_from_slice(vector);
        self.nodes.push(Node {
            id,
            max_level,
            neighbors: vec![Vec::new(); max_level + 1],
        });
        id
    }

    /// Sample a level for a new node: `floor(-ln(u) * m_l)` clamped to the
    /// configured cap.
    pub fn random_level(&mut self) -> usize {
        let u = self.rng.next_uniform();
        let level = (-u.ln() * self.m_l).floor() as usize;
        level.min(self.config.max_level_cap)
    }

    /// Check every structural invariant. Used by tests and after
    /// deserializing a snapshot.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.nodes.len();

        if self.vectors.len() != n * self.config.dim {
            return Err(format!(
                "vector arena length {} != node_count({}) * dim({})",
                self.vectors.len(),
                n,
                self.config.dim
            ));
        }

        match self.entry_point {
            None => {
                if n > 0 {
                    return Err(format!("no entry point with {n} nodes"));
                }
            }
            Some(ep) => {
                if n == 0 {
                    return Err("entry point set on an empty graph".to_string());
                }
                if ep as usize >= n {
                    return Err(format!("entry point {ep} >= node_count {n}"));
                }
                if self.nodes[ep as usize].max_level != self.cur_max_level {
                    return Err(format!(
                        "entry point {} has max_level {} but cur_max_level is {}",
                        ep, self.nodes[ep as usize].max_level, self.cur_max_level
                    ));
                }
                let highest = self.nodes.iter().map(|node| node.max_level).max();
                if highest != Some(self.cur_max_level) {
                    return Err(format!(
                        "cur_max_level {} != highest node level {:?}",
                        self.cur_max_level, highest
                    ));
                }
            }
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            if node.id as usize != idx {
                return Err(format!("node at index {idx} has id {}", node.id));
            }
            if node.neighbors.len() != node.max_level + 1 {
                return Err(format!(
                    "node {} has {} adjacency layers, expected {}",
                    node.id,
                    node.neighbors.len(),
                    node.max_level + 1
                ));
            }
            for (layer, list) in node.neighbors.iter().enumerate() {
                if list.len() > self.config.m {
                    return Err(format!(
                        "node {} layer {layer} has {} neighbors (cap {})",
                        node.id,
                        list.len(),
                        self.config.m
                    ));
                }
                let mut seen = std::collections::HashSet::with_capacity(list.len());
                for &neighbor in list {
                    if neighbor == node.id {
                        return Err(format!("node {} links to itself at layer {layer}", node.id));
                    }
                    if neighbor as usize >= n {
                        return Err(format!(
                            "node {} layer {layer} links to {neighbor} >= node_count {n}",
                            node.id
                        ));
                    }
                    if !seen.insert(neighbor) {
                        return Err(format!(
                            "node {} layer {layer} links to {neighbor} twice",
                            node.id
                        ));
                    }
                    if self.nodes[neighbor as usize].max_level < layer {
                        return Err(format!(
                            "edge {} -> {neighbor} at layer {layer} but target tops out at {}",
                            node.id, self.nodes[neighbor as usize].max_level
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hnsw::level::StaticUniform;

    fn small_config() -> HnswConfig {
        HnswConfig {
            m: 4,
            ef_construction: 8,
            ef_search: 8,
            max_level_cap: 4,
            dim: 2,
            size_hint: 16,
            ..HnswConfig::default()
        }
    }

    #[test]
    fn test_new_empty() {
        let graph = HnswGraph::new(HnswConfig::default());
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
        assert!(graph.entry_point.is_none());
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_default_config_values() {
        let cfg = HnswConfig::default();
        assert_eq!(cfg.m, 16);
        assert_eq!(cfg.ef_construction, 200);
        assert_eq!(cfg.ef_search, 20);
        assert_eq!(cfg.max_level_cap, 16);
        assert_eq!(cfg.dim, 128);
        assert_eq!(cfg.size_hint, 1000);
        assert_eq!(cfg.distance, DistanceKind::L2);
    }

    #[test]
    fn test_append_node_allocates_all_layers() {
        let mut graph = HnswGraph::new(small_config());
        let id = graph.append_node(&[1.0, 2.0], 3);
        assert_eq!(id, 0);
        assert_eq!(graph.nodes[0].neighbors.len(), 4);
        assert_eq!(graph.vector(0), &[1.0, 2.0]);
    }

    #[test]
    fn test_neighbors_above_max_level_is_empty() {
        let mut graph = HnswGraph::new(small_config());
        let id = graph.append_node(&[0.0, 0.0], 1);
        assert!(graph.neighbors(id, 0).is_empty());
        assert!(graph.neighbors(id, 7).is_empty());
    }

    #[test]
    fn test_random_level_respects_cap() {
        let mut graph = HnswGraph::new(HnswConfig {
            max_level_cap: 3,
            ..small_config()
        });
        for _ in 0..500 {
            assert!(graph.random_level() <= 3);
        }
    }

    #[test]
    fn test_random_level_static_formula() {
        // m = 4: m_l = 1/ln(4); u = 0.03 gives floor(3.5066 * 0.7213) = 2.
        let mut graph = HnswGraph::with_rng(
            HnswConfig {
                m: 4,
                ..small_config()
            },
            Box::new(StaticUniform(0.03)),
        );
        assert_eq!(graph.random_level(), 2);
        assert_eq!(graph.random_level(), 2);
    }

    #[test]
    fn test_validate_rejects_self_loop() {
        let mut graph = HnswGraph::new(small_config());
        graph.append_node(&[0.0, 0.0], 0);
        graph.entry_point = Some(0);
        graph.nodes[0].neighbors[0] = vec![0];
        assert!(graph.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_edge() {
        let mut graph = HnswGraph::new(small_config());
        graph.append_node(&[0.0, 0.0], 0);
        graph.append_node(&[1.0, 1.0], 0);
        graph.entry_point = Some(0);
        graph.nodes[0].neighbors[0] = vec![1, 1];
        assert!(graph.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_edge_above_target_level() {
        let mut graph = HnswGraph::new(small_config());
        graph.append_node(&[0.0, 0.0], 1);
        graph.append_node(&[1.0, 1.0], 0);
        graph.cur_max_level = 1;
        graph.entry_point = Some(0);
        // Node 1 only reaches layer 0, so a layer-1 edge to it is invalid.
        graph.nodes[0].neighbors[1] = vec![1];
        assert!(graph.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_stale_entry_point() {
        let mut graph = HnswGraph::new(small_config());
        graph.append_node(&[0.0, 0.0], 0);
        graph.append_node(&[1.0, 1.0], 2);
        graph.entry_point = Some(0);
        graph.cur_max_level = 0;
        assert!(graph.validate().is_err());
    }
}
