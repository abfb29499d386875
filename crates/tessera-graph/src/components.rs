//! Connected-component discovery and pattern counting.
//!
//! Every non-zero cell gets its own discovery task on the runtime's blocking
//! pool. Cells in the same region all rebuild the same component, and the
//! results are deduplicated at the end.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tessera_core::{Cell, Grid, Promise};
use tokio::runtime::Handle;
use tracing::debug;

/// A maximal set of 4-connected non-zero cells.
///
/// Cells are kept sorted by position without duplicates, so equal regions
/// compare and hash equal no matter which cell they were grown from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Component {
    cells: Vec<Cell>,
}

impl Component {
    /// Builds a component from cells in any order.
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Self {
        let mut cells: Vec<Cell> = cells.into_iter().collect();
        cells.sort_by_key(Cell::position);
        cells.dedup_by_key(|c| c.position());
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells
            .binary_search_by_key(&cell.position(), Cell::position)
            .is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Returns the top-left and bottom-right corners of the smallest
    /// rectangle covering every cell.
    pub fn bounding_box(&self) -> Option<((usize, usize), (usize, usize))> {
        let first = self.cells.first()?;
        let init = (first.row, first.row, first.col, first.col);
        let (min_row, max_row, min_col, max_col) =
            self.cells.iter().fold(init, |(r0, r1, c0, c1), cell| {
                (
                    r0.min(cell.row),
                    r1.max(cell.row),
                    c0.min(cell.col),
                    c1.max(cell.col),
                )
            });
        Some(((min_row, min_col), (max_row, max_col)))
    }
}

/// Grows the region containing `seed` until it stops changing.
///
/// Starts from `seed` and its reachable neighbors, then keeps adding the
/// reachable neighbors of every member.
pub fn discover_component(grid: &Grid, seed: Cell) -> Component {
    let mut region: HashSet<Cell> = grid.reachable_neighbors(&seed).into_iter().collect();
    region.insert(seed);

    loop {
        let added: HashSet<Cell> = region
            .iter()
            .flat_map(|cell| grid.reachable_neighbors(cell))
            .filter(|cell| !region.contains(cell))
            .collect();

        if added.is_empty() {
            break;
        }
        region.extend(added);
    }

    Component::from_cells(region)
}

/// Finds every connected component of non-zero cells.
///
/// One discovery task per non-zero cell is scheduled on `executor`'s
/// blocking pool; each hands its result back through a [`Promise`]. The
/// returned components are distinct and ordered by their first cell.
pub async fn all_components(
    grid: Arc<Grid>,
    executor: &Handle,
) -> Result<Vec<Component>, AnalysisError> {
    let mut pending = Vec::new();

    for seed in grid.non_zero_cells() {
        let (resolver, promise) = Promise::pending();
        let grid = Arc::clone(&grid);
        executor.spawn_blocking(move || resolver.resolve(discover_component(&grid, seed)));
        pending.push(promise);
    }

    let tasks = pending.len();
    let mut unique = HashSet::new();
    for promise in pending {
        unique.insert(promise.get().await?);
    }

    let mut components: Vec<Component> = unique.into_iter().collect();
    components.sort_by_key(|c| c.cells().first().map(Cell::position));

    debug!(
        "Discovered {} components from {} seed tasks",
        components.len(),
        tasks
    );
    Ok(components)
}

/// Returns true if the component fills its bounding rectangle exactly.
pub fn is_rectangle(component: &Component) -> bool {
    match component.bounding_box() {
        Some(((min_row, min_col), (max_row, max_col))) => {
            let area = (max_row - min_row + 1) * (max_col - min_col + 1);
            area == component.len()
        }
        None => false,
    }
}

/// Counts the patterns in a grid.
///
/// A pattern is a filled rectangle of at least two cells. The count is
/// all-or-nothing: if any component is not a pattern the result is 0.
pub async fn pattern_count(grid: Arc<Grid>, executor: &Handle) -> Result<usize, AnalysisError> {
    let components = all_components(grid, executor).await?;
    let valid = components
        .iter()
        .filter(|c| c.len() > 1 && is_rectangle(c))
        .count();

    if valid == components.len() {
        Ok(valid)
    } else {
        debug!(
            "{} of {} components are not patterns, count is 0",
            components.len() - valid,
            components.len()
        );
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::PromiseError;

    fn component(positions: &[(usize, usize)]) -> Component {
        Component::from_cells(positions.iter().map(|&(r, c)| Cell::new(r, c)))
    }

    /// Deterministic pseudo-random 0/1 grid.
    fn noise_grid(seed: u64, rows: usize, cols: usize) -> Grid {
        let mut state = seed;
        let mut next = move || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 33) % 3 != 0
        };
        Grid::new(
            (0..rows)
                .map(|_| (0..cols).map(|_| i32::from(next())).collect())
                .collect(),
        )
    }

    #[test]
    fn test_component_is_canonical() {
        let a = component(&[(1, 1), (0, 0), (0, 1), (0, 0)]);
        let b = component(&[(0, 1), (1, 1), (0, 0)]);

        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert!(a.contains(&Cell::new(1, 1)));
        assert!(!a.contains(&Cell::new(1, 0)));
    }

    #[test]
    fn test_discover_follows_chains() {
        let grid = Grid::new(vec![
            vec![1, 1, 0, 0],
            vec![0, 1, 0, 1],
            vec![0, 1, 1, 1],
            vec![0, 0, 0, 0],
        ]);

        let found = discover_component(&grid, grid.cell_at(0, 0).unwrap());
        assert_eq!(
            found,
            component(&[(0, 0), (0, 1), (1, 1), (1, 3), (2, 1), (2, 2), (2, 3)])
        );
    }

    #[test]
    fn test_discover_is_seed_independent() {
        let grid = noise_grid(7, 8, 8);

        for seed in grid.non_zero_cells() {
            let from_seed = discover_component(&grid, seed);
            for member in from_seed.iter() {
                assert_eq!(discover_component(&grid, *member), from_seed);
            }
        }
    }

    #[test]
    fn test_isolated_cell() {
        let grid = Grid::new(vec![vec![0, 0, 0], vec![0, 4, 0]]);
        let found = discover_component(&grid, grid.cell_at(1, 1).unwrap());
        assert_eq!(found, component(&[(1, 1)]));
    }

    #[test]
    fn test_rectangles() {
        assert!(is_rectangle(&component(&[(0, 0), (0, 1), (1, 0), (1, 1)])));
        assert!(is_rectangle(&component(&[(3, 2), (4, 2), (5, 2)])));
        assert!(is_rectangle(&component(&[(2, 2)])));

        // L-shape: bounding box of 4, only 3 cells.
        assert!(!is_rectangle(&component(&[(0, 0), (0, 1), (1, 1)])));
        assert!(!is_rectangle(&Component::default()));
    }

    #[test]
    fn test_rectangle_off_origin_and_wide() {
        let wide = component(&[(5, 3), (5, 4), (5, 5), (6, 3), (6, 4), (6, 5)]);
        assert_eq!(wide.bounding_box(), Some(((5, 3), (6, 5))));
        assert!(is_rectangle(&wide));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_all_components_partition() {
        for seed in [1, 2, 3, 42] {
            let grid = Arc::new(noise_grid(seed, 9, 7));
            let components = all_components(Arc::clone(&grid), &Handle::current())
                .await
                .unwrap();

            let non_zero: HashSet<Cell> = grid.non_zero_cells().collect();
            let mut covered = HashSet::new();
            for component in &components {
                for cell in component.iter() {
                    assert!(covered.insert(*cell), "{} is in two components", cell);
                }
            }
            assert_eq!(covered, non_zero);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_all_components_empty_grid() {
        let grid = Arc::new(Grid::new(vec![vec![0, 0], vec![0, 0]]));
        let components = all_components(grid, &Handle::current()).await.unwrap();
        assert!(components.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_all_components_ordered_by_first_cell() {
        let grid = Arc::new(Grid::new(vec![
            vec![1, 1, 0, 0],
            vec![0, 0, 0, 1],
            vec![1, 0, 0, 1],
            vec![1, 0, 0, 0],
        ]));
        let components = all_components(grid, &Handle::current()).await.unwrap();

        assert_eq!(
            components,
            vec![
                component(&[(0, 0), (0, 1)]),
                component(&[(1, 3), (2, 3)]),
                component(&[(2, 0), (3, 0)]),
            ]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_pattern_count_all_valid() {
        let grid = Arc::new(Grid::new(vec![
            vec![1, 1, 0, 0],
            vec![0, 0, 0, 1],
            vec![1, 0, 0, 1],
            vec![1, 0, 0, 0],
        ]));
        let handle = Handle::current();

        assert_eq!(pattern_count(Arc::clone(&grid), &handle).await, Ok(3));
        // Same grid, same answer.
        assert_eq!(pattern_count(grid, &handle).await, Ok(3));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_pattern_count_singleton_zeroes() {
        let grid = Arc::new(Grid::new(vec![vec![1, 1, 0], vec![0, 0, 0], vec![0, 0, 1]]));
        assert_eq!(pattern_count(grid, &Handle::current()).await, Ok(0));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_pattern_count_l_shape_zeroes() {
        let grid = Arc::new(Grid::new(vec![
            vec![1, 1, 0, 1],
            vec![0, 1, 0, 1],
            vec![0, 0, 0, 0],
        ]));
        assert_eq!(pattern_count(grid, &Handle::current()).await, Ok(0));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_pattern_count_weighted_blocks() {
        let grid = Arc::new(Grid::new(vec![
            vec![3, 7, 0, 0],
            vec![2, 9, 0, 5],
            vec![0, 0, 0, 5],
        ]));
        assert_eq!(pattern_count(grid, &Handle::current()).await, Ok(2));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_pattern_count_no_components() {
        let grid = Arc::new(Grid::default());
        assert_eq!(pattern_count(grid, &Handle::current()).await, Ok(0));
    }

    /// A handle to a runtime that has already been shut down. Work spawned
    /// on it is dropped without running.
    fn dead_executor() -> Handle {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .build()
            .unwrap();
        let handle = runtime.handle().clone();
        runtime.shutdown_background();
        handle
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_dead_executor_abandons_discovery() {
        let grid = Arc::new(Grid::new(vec![vec![1, 1], vec![0, 1]]));
        let executor = dead_executor();

        assert_eq!(
            all_components(Arc::clone(&grid), &executor).await,
            Err(AnalysisError::Abandoned(PromiseError::Abandoned))
        );
        assert_eq!(
            pattern_count(grid, &executor).await,
            Err(AnalysisError::Abandoned(PromiseError::Abandoned))
        );
    }

    #[test]
    fn test_component_serializes_as_cell_list() {
        let found = Component::from_cells([Cell::weighted(1, 0, 4), Cell::weighted(0, 0, 2)]);
        let json = serde_json::to_value(&found).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"row": 0, "col": 0, "weight": 2},
                {"row": 1, "col": 0, "weight": 4}
            ])
        );

        let back: Component = serde_json::from_value(json).unwrap();
        assert_eq!(back, found);
    }
}
