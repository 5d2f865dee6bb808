//! Structural invariant checks for [`BTree`](super::BTree).
//!
//! These walk the whole tree and are meant for tests and the simulation
//! harness, not for the hot path.

use crate::index::node::{Named, Node, Order};

/// A broken B-tree invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The root exists but holds no entries.
    EmptyRoot,
    /// A non-root node holds fewer than `t - 1` entries.
    Underfull { depth: usize, count: usize, min: usize },
    /// A node holds more than `2t - 1` entries.
    Overfull { depth: usize, count: usize, max: usize },
    /// An internal node does not have exactly one more child than entries.
    ChildCount {
        depth: usize,
        entries: usize,
        children: usize,
    },
    /// An entry is not strictly between its neighbours and its subtree bounds.
    OutOfOrder { depth: usize, name: String },
    /// Leaves at different depths.
    UnevenLeaves { expected: usize, found: usize },
    /// The cached entry count disagrees with the tree contents.
    LengthMismatch { cached: usize, counted: usize },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRoot => write!(f, "root node holds no entries"),
            Self::Underfull { depth, count, min } => {
                write!(f, "node at depth {depth} holds {count} entries (min {min})")
            }
            Self::Overfull { depth, count, max } => {
                write!(f, "node at depth {depth} holds {count} entries (max {max})")
            }
            Self::ChildCount {
                depth,
                entries,
                children,
            } => write!(
                f,
                "internal node at depth {depth} has {entries} entries but {children} children"
            ),
            Self::OutOfOrder { depth, name } => {
                write!(f, "entry '{name}' at depth {depth} is out of order")
            }
            Self::UnevenLeaves { expected, found } => {
                write!(f, "leaf at depth {found}, expected all leaves at depth {expected}")
            }
            Self::LengthMismatch { cached, counted } => {
                write!(f, "tree reports {cached} entries but holds {counted}")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Exclusive name bounds inherited from ancestors.
#[derive(Clone, Copy)]
struct Bounds<'a> {
    lower: Option<&'a str>,
    upper: Option<&'a str>,
}

struct Walk {
    order: Order,
    leaf_depth: Option<usize>,
    counted: usize,
}

pub(super) fn check<E: Named>(
    root: Option<&Node<E>>,
    order: Order,
    len: usize,
) -> Result<(), InvariantViolation> {
    let Some(root) = root else {
        return if len == 0 {
            Ok(())
        } else {
            Err(InvariantViolation::LengthMismatch {
                cached: len,
                counted: 0,
            })
        };
    };

    if root.is_empty() {
        return Err(InvariantViolation::EmptyRoot);
    }

    let mut walk = Walk {
        order,
        leaf_depth: None,
        counted: 0,
    };
    let unbounded = Bounds {
        lower: None,
        upper: None,
    };
    walk.node(root, 0, unbounded)?;

    if walk.counted != len {
        return Err(InvariantViolation::LengthMismatch {
            cached: len,
            counted: walk.counted,
        });
    }
    Ok(())
}

impl Walk {
    fn node<E: Named>(
        &mut self,
        node: &Node<E>,
        depth: usize,
        bounds: Bounds<'_>,
    ) -> Result<(), InvariantViolation> {
        let count = node.len();
        if depth > 0 && count < self.order.min_entries() {
            return Err(InvariantViolation::Underfull {
                depth,
                count,
                min: self.order.min_entries(),
            });
        }
        if count > self.order.max_entries() {
            return Err(InvariantViolation::Overfull {
                depth,
                count,
                max: self.order.max_entries(),
            });
        }

        let mut previous = bounds.lower;
        for entry in node.entries() {
            let name = entry.name();
            let above_previous = previous.is_none_or(|p| p < name);
            let below_upper = bounds.upper.is_none_or(|u| name < u);
            if !above_previous || !below_upper {
                return Err(InvariantViolation::OutOfOrder {
                    depth,
                    name: name.to_owned(),
                });
            }
            previous = Some(name);
        }
        self.counted += count;

        if node.is_leaf() {
            return match self.leaf_depth {
                Some(expected) if expected != depth => Err(InvariantViolation::UnevenLeaves {
                    expected,
                    found: depth,
                }),
                _ => {
                    self.leaf_depth = Some(depth);
                    Ok(())
                }
            };
        }

        if node.children().len() != count + 1 {
            return Err(InvariantViolation::ChildCount {
                depth,
                entries: count,
                children: node.children().len(),
            });
        }

        for (i, child) in node.children().iter().enumerate() {
            let lower = if i == 0 {
                bounds.lower
            } else {
                node.entries().get(i - 1).map(Named::name)
            };
            let upper = node.entries().get(i).map(Named::name).or(bounds.upper);
            self.node(child, depth + 1, Bounds { lower, upper })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::BTree;

    #[test]
    fn test_valid_tree_passes() {
        let mut tree = BTree::with_order(Order::new(2).unwrap());
        for name in ["d", "b", "f", "a", "c", "e", "g", "h"] {
            tree.insert(name.to_owned()).unwrap();
        }
        assert_eq!(check(tree.root(), tree.order(), tree.len()), Ok(()));
    }

    #[test]
    fn test_length_mismatch_detected() {
        let mut tree = BTree::with_order(Order::new(2).unwrap());
        tree.insert("a".to_owned()).unwrap();
        assert_eq!(
            check(tree.root(), tree.order(), 2),
            Err(InvariantViolation::LengthMismatch {
                cached: 2,
                counted: 1
            })
        );
        assert_eq!(
            check::<String>(None, tree.order(), 1),
            Err(InvariantViolation::LengthMismatch {
                cached: 1,
                counted: 0
            })
        );
    }

    #[test]
    fn test_violation_display() {
        let violation = InvariantViolation::Underfull {
            depth: 2,
            count: 0,
            min: 1,
        };
        assert_eq!(
            violation.to_string(),
            "node at depth 2 holds 0 entries (min 1)"
        );
    }
}
