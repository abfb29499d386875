//! Tessera Core - Grids and the values that flow between sessions
//!
//! This crate holds the data model shared by the analysis engine and the
//! server: positioned cells, immutable weighted grids, and the
//! single-assignment [`Promise`] used to hand background results to
//! request handlers.
//!
//! # Example
//!
//! ```
//! use tessera_core::{Cell, Grid};
//!
//! let grid = Grid::new(vec![vec![1, 1, 0], vec![0, 1, 0]]);
//! let reachable = grid.reachable_neighbors(&Cell::new(0, 1));
//!
//! assert_eq!(reachable.len(), 2);
//! ```

mod cell;
mod error;
mod grid;
pub mod promise;

pub use cell::{Cell, Weighted};
pub use error::PromiseError;
pub use grid::Grid;
pub use promise::{Promise, Resolver};
