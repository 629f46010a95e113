//! Priority frontiers for beam search.
//!
//! A layer search keeps two frontiers over `(node id, distance)` pairs: a
//! min-ordered queue of pending candidates and a max-ordered queue of current
//! results, pruned at the beam width. Both are thin wrappers over
//! `BinaryHeap` with [`OrderedFloat`] keys; ties break on id so pop order is
//! deterministic for a given input order. Neither frontier deduplicates;
//! callers keep a visited set.

use ordered_float::OrderedFloat;
use std::collections::BinaryHeap;

/// A node id paired with its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontierItem {
    pub id: u32,
    pub distance: OrderedFloat<f32>,
}

impl FrontierItem {
    #[inline]
    pub fn new(id: u32, distance: f32) -> Self {
        Self {
            id,
            distance: OrderedFloat(distance),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MinOrd(FrontierItem);

impl Ord for MinOrd {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reversed so the heap's max is the smallest distance; equal
        // distances pop lowest id first.
        other
            .0
            .distance
            .cmp(&self.0.distance)
            .then_with(|| other.0.id.cmp(&self.0.id))
    }
}

impl PartialOrd for MinOrd {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MaxOrd(FrontierItem);

impl Ord for MaxOrd {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0
            .distance
            .cmp(&other.0.distance)
            .then_with(|| self.0.id.cmp(&other.0.id))
    }
}

impl PartialOrd for MaxOrd {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Frontier whose `pop` yields the item with the smallest distance.
#[derive(Debug, Default)]
pub struct MinFrontier {
    heap: BinaryHeap<MinOrd>,
}

impl MinFrontier {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, item: FrontierItem) {
        self.heap.push(MinOrd(item));
    }

    #[inline]
    pub fn pop(&mut self) -> Option<FrontierItem> {
        self.heap.pop().map(|MinOrd(item)| item)
    }

    #[inline]
    pub fn peek(&self) -> Option<&FrontierItem> {
        self.heap.peek().map(|ord| &ord.0)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Frontier whose `pop` yields the item with the largest distance.
#[derive(Debug, Default)]
pub struct MaxFrontier {
    heap: BinaryHeap<MaxOrd>,
}

impl MaxFrontier {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, item: FrontierItem) {
        self.heap.push(MaxOrd(item));
    }

    #[inline]
    pub fn pop(&mut self) -> Option<FrontierItem> {
        self.heap.pop().map(|MaxOrd(item)| item)
    }

    #[inline]
    pub fn peek(&self) -> Option<&FrontierItem> {
        self.heap.peek().map(|ord| &ord.0)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drain into a vector sorted ascending by distance.
    pub fn into_ascending(self) -> Vec<FrontierItem> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|MaxOrd(item)| item)
            .collect()
    }
}
