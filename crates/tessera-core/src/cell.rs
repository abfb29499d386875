//! Grid cells.
//!
//! A cell is a position plus the weight found there. Two cells at the same
//! position are the same cell, whatever weights they carry, so sets and
//! visited maps key on position alone.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Anything that can be ordered by an optional weight.
///
/// The min-weight frontier pops lighter values first. `None` counts as the
/// lightest possible weight.
pub trait Weighted {
    fn weight(&self) -> Option<i32>;
}

/// A position in a grid together with its weight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    #[serde(default)]
    pub weight: Option<i32>,
}

impl Cell {
    /// Creates a cell with no weight attached.
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            weight: None,
        }
    }

    /// Creates a cell carrying a weight.
    pub fn weighted(row: usize, col: usize, weight: i32) -> Self {
        Self {
            row,
            col,
            weight: Some(weight),
        }
    }

    /// The `(row, col)` pair that identifies this cell.
    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Compares two cells by weight, lightest first.
    ///
    /// An undefined weight sorts below every defined one. This deliberately
    /// disagrees with `==`, which only looks at the position, so it is not
    /// exposed as `Ord`.
    pub fn cmp_weight(&self, other: &Self) -> Ordering {
        match (self.weight, other.weight) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => a.cmp(&b),
        }
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.position() == other.position()
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position().hash(state);
    }
}

impl Weighted for Cell {
    fn weight(&self) -> Option<i32> {
        self.weight
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_ignores_weight() {
        let a = Cell::weighted(2, 3, 10);
        let b = Cell::weighted(2, 3, 99);
        assert_eq!(a, b);

        let set: HashSet<Cell> = [a, b, Cell::new(2, 3)].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert_ne!(a, Cell::weighted(3, 2, 10));
    }

    #[test]
    fn test_undefined_weight_sorts_lowest() {
        let unweighted = Cell::new(0, 0);
        let light = Cell::weighted(0, 1, i32::MIN);
        let heavy = Cell::weighted(0, 2, i32::MAX);

        assert_eq!(unweighted.cmp_weight(&light), Ordering::Less);
        assert_eq!(light.cmp_weight(&unweighted), Ordering::Greater);
        assert_eq!(unweighted.cmp_weight(&Cell::new(5, 5)), Ordering::Equal);
        // Extreme values compare without overflowing.
        assert_eq!(light.cmp_weight(&heavy), Ordering::Less);
        assert_eq!(heavy.cmp_weight(&light), Ordering::Greater);
    }

    #[test]
    fn test_weight_is_optional_on_the_wire() {
        let cell: Cell = serde_json::from_str(r#"{"row": 1, "col": 4}"#).unwrap();
        assert_eq!(cell.position(), (1, 4));
        assert_eq!(cell.weight, None);

        let json = serde_json::to_string(&Cell::weighted(1, 4, 7)).unwrap();
        assert!(json.contains("\"weight\":7"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Cell::weighted(3, 1, 8).to_string(), "(3,1)");
    }
}
