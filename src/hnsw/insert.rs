//! Insertion into the graph.
//!
//! A new node samples a level, descends the hierarchy greedily above that
//! level, then runs a construction-width beam at each layer it joins. The
//! closest beam members become its neighbors and each of those is
//! back-linked under the degree cap, so all links stay bidirectional.

use crate::error::{IndexError, Result};
use crate::hnsw::graph::HnswGraph;
use crate::hnsw::search::search_layer;
use crate::hnsw::visited::VisitedSet;
use std::cell::RefCell;

thread_local! {
    /// Reusable traversal scratch for the writer path.
    static INSERT_VISITED: RefCell<VisitedSet> = RefCell::new(VisitedSet::default());
}

impl HnswGraph {
    /// Insert a vector and wire it into every layer up to its sampled
    /// level. Returns the new node's id.
    ///
    /// Fails with [`IndexError::DimensionMismatch`] before any state
    /// changes if the vector has the wrong length.
    pub fn insert(&mut self, vector: &[f32]) -> Result<u32> {
        if vector.len() != self.config.dim {
            return Err(IndexError::DimensionMismatch {
                expected: self.config.dim,
                actual: vector.len(),
            });
        }

        let level = self.random_level();
        let id = self.append_node(vector, level);

        // First node: it is the entry point, nothing to wire.
        let Some(entry_point) = self.entry_point else {
            self.entry_point = Some(id);
            self.cur_max_level = level;
            return Ok(id);
        };

        INSERT_VISITED.with(|cell| {
            let mut visited = cell.borrow_mut();
            let mut entries: Vec<u32> = vec![entry_point];

            for layer in (0..=self.cur_max_level).rev() {
                if layer > level {
                    // Above the node's level: greedy step, carry the single
                    // closest node down.
                    let found = search_layer(self, vector, &entries, 1, layer, &mut visited);
                    entries = found.iter().map(|&(_, nearest)| nearest).collect();
                } else {
                    let found = search_layer(
                        self,
                        vector,
                        &entries,
                        self.config.ef_construction,
                        layer,
                        &mut visited,
                    );
                    let take = found.len().min(self.config.m);
                    let selected: Vec<u32> =
                        found.iter().take(take).map(|&(_, peer)| peer).collect();
                    for &peer in &selected {
                        self.link(id, peer, layer);
                    }
                    self.nodes[id as usize].neighbors[layer] = selected;

                    // The full beam seeds the next layer down.
                    entries = found.iter().map(|&(_, peer)| peer).collect();
                }
                if entries.is_empty() {
                    entries.push(entry_point);
                }
            }
        });

        if level > self.cur_max_level {
            self.cur_max_level = level;
            self.entry_point = Some(id);
        }

        Ok(id)
    }

    /// Add `src` to the neighborhood of `dst` at `layer`, keeping only the
    /// `m` closest of the existing neighbors plus `src` (by distance to
    /// `dst`, ties by ascending id).
    pub(crate) fn link(&mut self, src: u32, dst: u32, layer: usize) {
        if src == dst {
            return;
        }

        let mut candidates: Vec<(f32, u32)> = Vec::with_capacity(self.config.m + 1);
        candidates.push((
            self.config.distance.distance(self.vector(src), self.vector(dst)),
            src,
        ));
        for &neighbor in self.neighbors(dst, layer) {
            if neighbor == src {
                continue;
            }
            candidates.push((
                self.config
                    .distance
                    .distance(self.vector(neighbor), self.vector(dst)),
                neighbor,
            ));
        }

        candidates.sort_unstable_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.cmp(&b.1))
        });
        candidates.truncate(self.config.m);
        self.nodes[dst as usize].neighbors[layer] =
            candidates.into_iter().map(|(_, peer)| peer).collect();
    }
}
