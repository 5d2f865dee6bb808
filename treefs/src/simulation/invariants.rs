//! Invariant checking for deterministic simulation testing.
//!
//! Compares a [`BTree`] against a `std::collections::BTreeSet` model after
//! every operation, in addition to the tree's own structural checks.

use std::collections::BTreeSet;

use crate::index::{self, BTree};

/// Reference model of the names a tree should hold.
#[derive(Debug, Default)]
pub struct Model {
    names: BTreeSet<String>,
}

impl Model {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an insert; returns whether the name was new.
    pub fn insert(&mut self, name: &str) -> bool {
        self.names.insert(name.to_owned())
    }

    /// Record a delete; returns whether the name was present.
    pub fn delete(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A disagreement between the tree and the model, or a broken tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The tree failed its own structural check.
    Structure(index::InvariantViolation),
    /// An operation's result differs from the model's.
    WrongResult { op: String, expected: bool },
    /// In-order traversal differs from the model.
    Contents { expected: usize, found: usize },
    /// Deleting an absent name changed the tree's shape.
    ShapeChanged { name: String },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Structure(e) => write!(f, "structure: {e}"),
            Self::WrongResult { op, expected } => {
                write!(f, "{op}: expected success={expected}")
            }
            Self::Contents { expected, found } => write!(
                f,
                "traversal does not match model ({expected} expected, {found} found)"
            ),
            Self::ShapeChanged { name } => {
                write!(f, "deleting absent name {name} changed the tree")
            }
        }
    }
}

/// Checks a tree against the model.
pub struct InvariantChecker;

impl InvariantChecker {
    /// Check structure, then compare traversal with the model.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check(tree: &BTree<String>, model: &Model) -> Result<(), InvariantViolation> {
        tree.check_invariants()
            .map_err(InvariantViolation::Structure)?;

        if !tree.iter().eq(model.names.iter()) {
            return Err(InvariantViolation::Contents {
                expected: model.len(),
                found: tree.iter().count(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Order;

    #[test]
    fn test_matching_tree_passes() {
        let mut tree = BTree::with_order(Order::new(2).unwrap());
        let mut model = Model::new();
        for name in ["m", "c", "x", "a"] {
            tree.insert(name.to_owned()).unwrap();
            assert!(model.insert(name));
        }
        assert!(InvariantChecker::check(&tree, &model).is_ok());
    }

    #[test]
    fn test_missing_name_is_reported() {
        let mut tree = BTree::new();
        let mut model = Model::new();
        tree.insert("a".to_owned()).unwrap();
        model.insert("a");
        model.insert("b");

        assert_eq!(
            InvariantChecker::check(&tree, &model),
            Err(InvariantViolation::Contents {
                expected: 2,
                found: 1
            })
        );
    }
}
