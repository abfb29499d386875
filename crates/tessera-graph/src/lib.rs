//! Tessera Graph - Path search and region analysis over grids
//!
//! This crate treats a [`Grid`](tessera_core::Grid) as a graph whose nodes
//! are non-zero cells and whose edges join 4-adjacent cells. It provides:
//!
//! - A generic search engine ([`traverse`]) parameterized over the frontier
//!   that decides which node to expand next. [`bfs`] uses a FIFO frontier and
//!   finds fewest-step paths; [`best_first`] pops the lightest cell first.
//! - Connected-component discovery fanned out over a tokio runtime, and the
//!   rectangle-based pattern count derived from it.
//!
//! # Example
//!
//! ```
//! use tessera_core::{Cell, Grid};
//! use tessera_graph::{bfs, GridTraversal};
//!
//! let grid = Grid::new(vec![vec![1, 1, 0], vec![0, 1, 0], vec![0, 1, 1]]);
//! let traversal = GridTraversal::new(&grid, Cell::new(0, 0), Cell::new(2, 2));
//!
//! let path = bfs(&traversal).expect("reachable");
//! assert_eq!(path.len(), 5);
//! ```

mod components;
mod error;
mod frontier;
mod grid_traversal;
mod node;
mod traverse;

pub use components::{
    all_components, discover_component, is_rectangle, pattern_count, Component,
};
pub use error::AnalysisError;
pub use frontier::{Fifo, Frontier, MinWeight};
pub use grid_traversal::GridTraversal;
pub use node::SearchNode;
pub use traverse::{best_first, bfs, traverse, Traversable};
