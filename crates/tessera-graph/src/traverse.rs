//! The search engine.
//!
//! One loop serves every search flavor: seed the frontier with the origin,
//! expand nodes in frontier order, and stop as soon as a neighbor equals the
//! target. The frontier decides what "next" means.
//!
//! The weighted flavor is best-first, not Dijkstra: a node is inserted once
//! and never re-queued when a cheaper route to it turns up later. Its paths
//! favour light cells but are not guaranteed to be the lightest.

use crate::frontier::{Fifo, Frontier, MinWeight};
use crate::node::SearchNode;
use std::collections::HashSet;
use std::hash::Hash;
use std::rc::Rc;
use tessera_core::Weighted;
use tracing::trace;

/// A graph the engine can search.
pub trait Traversable<T> {
    /// The node the search starts from.
    fn origin(&self) -> SearchNode<T>;

    /// The node the search is looking for.
    fn target(&self) -> SearchNode<T>;

    /// The nodes reachable in one step from `node`, each linked back to it.
    fn reachable_nodes(&self, node: &Rc<SearchNode<T>>) -> Vec<SearchNode<T>>;
}

/// Per-call search state. Every `traverse` call owns a fresh one, so
/// concurrent searches never share anything.
struct Exploration<T, F> {
    frontier: F,
    visited: HashSet<T>,
    expanded: usize,
}

impl<T, F> Exploration<T, F>
where
    T: Clone + Eq + Hash,
    F: Frontier<T>,
{
    fn new(frontier: F) -> Self {
        Self {
            frontier,
            visited: HashSet::new(),
            expanded: 0,
        }
    }

    /// Queues `node` unless its value was seen before.
    fn discover(&mut self, node: SearchNode<T>) {
        if self.visited.insert(node.value().clone()) {
            self.frontier.insert(Rc::new(node));
        }
    }

    fn next(&mut self) -> Option<Rc<SearchNode<T>>> {
        let node = self.frontier.remove_next()?;
        self.expanded += 1;
        Some(node)
    }
}

/// Searches `graph` from its origin to its target, expanding nodes in the
/// order `frontier` dictates.
///
/// Returns the values along the path, origin first and target last, or
/// `None` if the target cannot be reached.
pub fn traverse<T, G, F>(graph: &G, frontier: F) -> Option<Vec<T>>
where
    T: Clone + Eq + Hash,
    G: Traversable<T> + ?Sized,
    F: Frontier<T>,
{
    let target = graph.target();
    let mut exploration = Exploration::new(frontier);
    exploration.discover(graph.origin());

    while let Some(current) = exploration.next() {
        for neighbor in graph.reachable_nodes(&current) {
            if neighbor == target {
                trace!("Target reached after {} expansions", exploration.expanded);
                return Some(neighbor.path());
            }
            exploration.discover(neighbor);
        }
    }

    trace!(
        "Frontier exhausted after {} expansions, target unreachable",
        exploration.expanded
    );
    None
}

/// Breadth-first search. Returns a path with the fewest steps.
pub fn bfs<T, G>(graph: &G) -> Option<Vec<T>>
where
    T: Clone + Eq + Hash,
    G: Traversable<T> + ?Sized,
{
    traverse(graph, Fifo::new())
}

/// Best-first search that always expands the lightest queued node.
pub fn best_first<T, G>(graph: &G) -> Option<Vec<T>>
where
    T: Clone + Eq + Hash + Weighted,
    G: Traversable<T> + ?Sized,
{
    traverse(graph, MinWeight::new())
}
