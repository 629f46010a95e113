//! Beam search over the graph.
//!
//! [`search_layer`] is the layer-local primitive: a best-first expansion
//! bounded by the beam width `ef`, keeping pending candidates in a
//! min-ordered frontier and the current beam in a max-ordered frontier so
//! the worst member is cheap to evict. [`knn_search`] strings it together
//! across layers: greedy single-entry descent from the top, then a full
//! beam at layer 0.

use crate::hnsw::graph::HnswGraph;
use crate::hnsw::queue::{FrontierItem, MaxFrontier, MinFrontier};
use crate::hnsw::visited::VisitedSet;
use std::cell::RefCell;

thread_local! {
    /// Reusable traversal scratch; avoids a per-search allocation.
    static SEARCH_VISITED: RefCell<VisitedSet> = RefCell::new(VisitedSet::default());
}

/// Search a single layer of the graph.
///
/// Expands closest-first from `entries` and returns up to `ef` node ids with
/// their distances, sorted ascending. Entry distances are computed here;
/// callers pass ids only. `visited` is reset at the start of each call.
pub fn search_layer(
    graph: &HnswGraph,
    query: &[f32],
    entries: &[u32],
    ef: usize,
    layer: usize,
    visited: &mut VisitedSet,
) -> Vec<(f32, u32)> {
    visited.reset();
    let mut candidates = MinFrontier::with_capacity(ef * 2);
    let mut results = MaxFrontier::with_capacity(ef + 1);
    // Cached distance of the worst beam member; avoids heap peeks in the
    // hot loop.
    let mut worst_dist = f32::INFINITY;

    for &entry in entries {
        if !visited.mark(entry) {
            continue;
        }
        let dist = graph.distance_to(query, entry);
        candidates.push(FrontierItem::new(entry, dist));
        results.push(FrontierItem::new(entry, dist));
        if results.len() > ef {
            results.pop();
        }
        if results.len() >= ef {
            worst_dist = results.peek().map_or(f32::INFINITY, |item| item.distance.0);
        }
    }

    while let Some(closest) = candidates.pop() {
        // No pending candidate can improve a full beam: done.
        if results.len() >= ef && closest.distance.0 > worst_dist {
            break;
        }

        for &neighbor in graph.neighbors(closest.id, layer) {
            if !visited.mark(neighbor) {
                continue;
            }
            let dist = graph.distance_to(query, neighbor);
            if results.len() < ef || dist < worst_dist {
                candidates.push(FrontierItem::new(neighbor, dist));
                results.push(FrontierItem::new(neighbor, dist));
                if results.len() > ef {
                    results.pop();
                }
                if results.len() >= ef {
                    worst_dist = results.peek().map_or(f32::INFINITY, |item| item.distance.0);
                }
            }
        }
    }

    results
        .into_ascending()
        .into_iter()
        .map(|item| (item.distance.0, item.id))
        .collect()
}

/// Multi-layer k-nearest-neighbor search.
///
/// Greedy `ef = 1` descent from the entry point down to layer 1, then a
/// beam of `max(ef_search, k)` at layer 0, truncated to `k`. An empty graph
/// yields an empty result.
pub fn knn_search(graph: &HnswGraph, query: &[f32], k: usize) -> Vec<(f32, u32)> {
    let Some(entry_point) = graph.entry_point else {
        return Vec::new();
    };

    SEARCH_VISITED.with(|cell| {
        let mut visited = cell.borrow_mut();
        let mut current = entry_point;

        for layer in (1..=graph.cur_max_level).rev() {
            let found = search_layer(
                graph,
                query,
                std::slice::from_ref(&current),
                1,
                layer,
                &mut visited,
            );
            if let Some(&(_, nearest)) = found.first() {
                current = nearest;
            }
        }

        let ef = graph.config.ef_search.max(k);
        let mut found = search_layer(
            graph,
            query,
            std::slice::from_ref(&current),
            ef,
            0,
            &mut visited,
        );
        found.truncate(k);
        found
    })
}
