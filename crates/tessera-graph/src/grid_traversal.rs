//! Grids as searchable graphs.

use crate::node::SearchNode;
use crate::traverse::Traversable;
use std::rc::Rc;
use tessera_core::{Cell, Grid};

/// A view of a grid with fixed endpoints. Steps go to 4-adjacent non-zero
/// cells.
#[derive(Debug, Clone, Copy)]
pub struct GridTraversal<'a> {
    grid: &'a Grid,
    start: Cell,
    end: Cell,
}

impl<'a> GridTraversal<'a> {
    pub fn new(grid: &'a Grid, start: Cell, end: Cell) -> Self {
        Self { grid, start, end }
    }
}

impl Traversable<Cell> for GridTraversal<'_> {
    fn origin(&self) -> SearchNode<Cell> {
        SearchNode::root(self.start)
    }

    fn target(&self) -> SearchNode<Cell> {
        SearchNode::root(self.end)
    }

    fn reachable_nodes(&self, node: &Rc<SearchNode<Cell>>) -> Vec<SearchNode<Cell>> {
        self.grid
            .reachable_neighbors(node.value())
            .into_iter()
            .map(|cell| SearchNode::discovered(cell, node))
            .collect()
    }
}
