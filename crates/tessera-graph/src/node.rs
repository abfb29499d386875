//! Search nodes.
//!
//! A node wraps a value and remembers which node discovered it. Following
//! those links from the target back to the origin yields the path.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A value reached during a search, linked to the node it was reached from.
///
/// Equality and hashing look only at the wrapped value. Nodes belong to a
/// single traversal and are never shared across threads.
#[derive(Debug, Clone)]
pub struct SearchNode<T> {
    value: T,
    discovered_by: Option<Rc<SearchNode<T>>>,
}

impl<T> SearchNode<T> {
    /// Creates a root node with no predecessor.
    pub fn root(value: T) -> Self {
        Self {
            value,
            discovered_by: None,
        }
    }

    /// Creates a node discovered from `parent`.
    pub fn discovered(value: T, parent: &Rc<SearchNode<T>>) -> Self {
        Self {
            value,
            discovered_by: Some(Rc::clone(parent)),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn discovered_by(&self) -> Option<&Rc<SearchNode<T>>> {
        self.discovered_by.as_ref()
    }
}

impl<T: Clone> SearchNode<T> {
    /// Walks the discovery links back to the root and returns the values
    /// in root-to-self order.
    pub fn path(&self) -> Vec<T> {
        let mut path = vec![self.value.clone()];
        let mut current = self.discovered_by.as_deref();

        while let Some(node) = current {
            path.push(node.value.clone());
            current = node.discovered_by.as_deref();
        }

        path.reverse();
        path
    }
}

impl<T: PartialEq> PartialEq for SearchNode<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq> Eq for SearchNode<T> {}

impl<T: Hash> Hash for SearchNode<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: fmt::Display> fmt::Display for SearchNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}
