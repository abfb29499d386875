//! Frontier strategies.
//!
//! The search engine runs one loop body for every search flavor. What
//! differs is the container holding discovered-but-unexpanded nodes and the
//! order in which it hands them back.

use crate::node::SearchNode;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};
use std::rc::Rc;
use tessera_core::Weighted;

/// The exploration container driving which node the engine expands next.
pub trait Frontier<T> {
    /// Adds a discovered node.
    fn insert(&mut self, node: Rc<SearchNode<T>>);

    /// Removes the next node to expand, or `None` when empty.
    fn remove_next(&mut self) -> Option<Rc<SearchNode<T>>>;
}

/// First in, first out. Expands nodes in discovery order, which yields
/// fewest-step paths.
#[derive(Debug)]
pub struct Fifo<T> {
    queue: VecDeque<Rc<SearchNode<T>>>,
}

impl<T> Default for Fifo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Fifo<T> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }
}

impl<T> Frontier<T> for Fifo<T> {
    fn insert(&mut self, node: Rc<SearchNode<T>>) {
        self.queue.push_back(node);
    }

    fn remove_next(&mut self) -> Option<Rc<SearchNode<T>>> {
        self.queue.pop_front()
    }
}

/// Min-priority by node weight. Lighter nodes come out first, unweighted
/// nodes before any weighted one, and equal weights in insertion order.
#[derive(Debug)]
pub struct MinWeight<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    inserted: u64,
}

impl<T> Default for MinWeight<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MinWeight<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            inserted: 0,
        }
    }
}

impl<T: Weighted> Frontier<T> for MinWeight<T> {
    fn insert(&mut self, node: Rc<SearchNode<T>>) {
        let entry = Entry {
            weight: node.value().weight(),
            seq: self.inserted,
            node,
        };
        self.inserted += 1;
        self.heap.push(Reverse(entry));
    }

    fn remove_next(&mut self) -> Option<Rc<SearchNode<T>>> {
        self.heap.pop().map(|Reverse(entry)| entry.node)
    }
}

/// Heap entry ordered by `(weight, seq)`; the node itself never takes part
/// in the comparison.
#[derive(Debug)]
struct Entry<T> {
    weight: Option<i32>,
    seq: u64,
    node: Rc<SearchNode<T>>,
}

impl<T> Entry<T> {
    fn key(&self) -> (Option<i32>, u64) {
        // Option orders None below Some, which is the rule we want for
        // undefined weights.
        (self.weight, self.seq)
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}
