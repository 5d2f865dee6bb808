//! B-tree node and the structural moves that keep it balanced.
//!
//! A node holds `k` entries in ascending name order and, when internal,
//! exactly `k + 1` children. `children[i]` holds names below `entries[i]`,
//! `children[i + 1]` holds names above it.
//!
//! The moves in this file (split, borrow, merge) preserve order and shape.
//! Deciding *when* a move is needed is done by the insert and remove
//! descents, which only ever move into a child that can absorb the change.

use std::mem;

/// Something stored in a B-tree, keyed by its name.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for String {
    fn name(&self) -> &str {
        self
    }
}

/// Minimum degree `t` of a B-tree.
///
/// Every node other than the root holds between `t - 1` and `2t - 1`
/// entries. The root holds at most `2t - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Order(usize);

impl Order {
    /// Smallest minimum degree that still forms a B-tree.
    pub const MIN_DEGREE: usize = 2;
    /// Order used when none is configured.
    pub const DEFAULT: Self = Self(3);

    /// Create an order with the given minimum degree.
    ///
    /// # Errors
    ///
    /// Returns an error if `min_degree` is below [`Order::MIN_DEGREE`].
    pub const fn new(min_degree: usize) -> Result<Self, InvalidOrder> {
        if min_degree < Self::MIN_DEGREE {
            Err(InvalidOrder(min_degree))
        } else {
            Ok(Self(min_degree))
        }
    }

    #[must_use]
    pub const fn min_degree(self) -> usize {
        self.0
    }

    /// Most entries any node may hold.
    #[must_use]
    pub const fn max_entries(self) -> usize {
        2 * self.0 - 1
    }

    /// Fewest entries a non-root node may hold at rest.
    #[must_use]
    pub const fn min_entries(self) -> usize {
        self.0 - 1
    }
}

impl Default for Order {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Error returned for a minimum degree below two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidOrder(pub usize);

impl std::fmt::Display for InvalidOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid B-tree order {}: minimum degree must be at least {}",
            self.0,
            Order::MIN_DEGREE
        )
    }
}

impl std::error::Error for InvalidOrder {}

/// A B-tree node.
///
/// A node is a leaf exactly when it has no children.
#[derive(Debug)]
pub struct Node<E> {
    entries: Vec<E>,
    children: Vec<Self>,
}

impl<E> Node<E> {
    /// Entries in ascending name order.
    #[must_use]
    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    /// Child nodes; empty for a leaf.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of entries held directly by this node.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_full(&self, order: Order) -> bool {
        self.entries.len() >= order.max_entries()
    }

    /// Whether this node sits at the minimum and must be filled before a
    /// removal descends into it.
    fn is_minimal(&self, order: Order) -> bool {
        self.entries.len() < order.min_degree()
    }

    /// Consume an emptied root and return what replaces it.
    ///
    /// An empty leaf root leaves the tree empty; an empty internal root has
    /// exactly one child, which becomes the new root.
    pub(super) fn into_only_child(mut self) -> Option<Self> {
        debug_assert!(self.entries.is_empty());
        debug_assert!(self.children.len() <= 1);
        self.children.pop()
    }

    fn first_entry(&self) -> Option<&E> {
        let mut node = self;
        while let Some(first) = node.children.first() {
            node = first;
        }
        node.entries.first()
    }

    fn last_entry(&self) -> Option<&E> {
        let mut node = self;
        while let Some(last) = node.children.last() {
            node = last;
        }
        node.entries.last()
    }

    /// Split the full child at `i` around its median.
    ///
    /// # Pre-conditions
    ///
    /// - `children[i]` holds exactly `2t - 1` entries
    /// - `self` is not full
    ///
    /// # Post-conditions
    ///
    /// - `children[i]` keeps the lower `t - 1` entries (and `t` children)
    /// - a new node at `children[i + 1]` holds the upper `t - 1` entries
    ///   (and `t` children)
    /// - the median sits at `entries[i]`
    pub(super) fn split_child(&mut self, i: usize, order: Order) {
        let t = order.min_degree();
        let child = &mut self.children[i];
        debug_assert!(child.is_full(order));

        let mut upper_entries = child.entries.split_off(t - 1);
        let median = upper_entries.remove(0);
        let upper_children = if child.is_leaf() {
            Vec::new()
        } else {
            child.children.split_off(t)
        };

        self.entries.insert(i, median);
        self.children.insert(
            i + 1,
            Self {
                entries: upper_entries,
                children: upper_children,
            },
        );
    }

    /// Move the previous sibling's last entry up into the separator slot and
    /// the old separator down to the front of `children[idx]`.
    fn borrow_from_prev(&mut self, idx: usize) {
        let (before, after) = self.children.split_at_mut(idx);
        let (Some(sibling), Some(child)) = (before.last_mut(), after.first_mut()) else {
            return;
        };
        let Some(raised) = sibling.entries.pop() else {
            return;
        };

        let lowered = mem::replace(&mut self.entries[idx - 1], raised);
        child.entries.insert(0, lowered);
        if let Some(grandchild) = sibling.children.pop() {
            child.children.insert(0, grandchild);
        }
    }

    /// Mirror of [`Self::borrow_from_prev`] through `entries[idx]`.
    fn borrow_from_next(&mut self, idx: usize) {
        let (before, after) = self.children.split_at_mut(idx + 1);
        let (Some(child), Some(sibling)) = (before.last_mut(), after.first_mut()) else {
            return;
        };
        if sibling.entries.is_empty() {
            return;
        }

        let raised = sibling.entries.remove(0);
        let lowered = mem::replace(&mut self.entries[idx], raised);
        child.entries.push(lowered);
        if !sibling.children.is_empty() {
            child.children.push(sibling.children.remove(0));
        }
    }

    /// Fold `entries[idx]` and `children[idx + 1]` into `children[idx]`.
    ///
    /// The absorbed sibling is dropped here; `self` loses one entry and one
    /// child.
    fn merge(&mut self, idx: usize) {
        let separator = self.entries.remove(idx);
        let sibling = self.children.remove(idx + 1);
        let child = &mut self.children[idx];

        child.entries.push(separator);
        child.entries.extend(sibling.entries);
        child.children.extend(sibling.children);
    }

    /// Bring `children[idx]` up from `t - 1` entries before a removal descends
    /// into it.
    ///
    /// Returns the index of the child that now covers the range previously
    /// covered by `children[idx]`. That is `idx - 1` after a merge into the
    /// previous sibling, `idx` otherwise.
    fn fill(&mut self, idx: usize, order: Order) -> usize {
        let t = order.min_degree();
        let has_next = idx + 1 < self.children.len();

        if idx > 0 && self.children[idx - 1].entries.len() >= t {
            self.borrow_from_prev(idx);
            idx
        } else if has_next && self.children[idx + 1].entries.len() >= t {
            self.borrow_from_next(idx);
            idx
        } else if has_next {
            self.merge(idx);
            idx
        } else {
            self.merge(idx - 1);
            idx - 1
        }
    }
}

impl<E: Named> Node<E> {
    pub(super) fn leaf(entry: E) -> Self {
        Self {
            entries: vec![entry],
            children: Vec::new(),
        }
    }

    /// Wrap a full root in a new root and split it. This is the only way a
    /// tree gains height.
    pub(super) fn grow(old_root: Self, order: Order) -> Self {
        let mut root = Self {
            entries: Vec::new(),
            children: vec![old_root],
        };
        root.split_child(0, order);
        root
    }

    /// `Ok(i)` when `entries[i]` is named `name`, otherwise `Err(i)` where
    /// `i` is the first entry ordered after `name` (and the child to descend
    /// into).
    fn find_index(&self, name: &str) -> Result<usize, usize> {
        self.entries.binary_search_by(|entry| entry.name().cmp(name))
    }

    pub(super) fn get(&self, name: &str) -> Option<&E> {
        let mut node = self;
        loop {
            match node.find_index(name) {
                Ok(i) => return node.entries.get(i),
                Err(i) => node = node.children.get(i)?,
            }
        }
    }

    pub(super) fn get_mut(&mut self, name: &str) -> Option<&mut E> {
        match self.find_index(name) {
            Ok(i) => self.entries.get_mut(i),
            Err(i) => self.children.get_mut(i)?.get_mut(name),
        }
    }

    /// Whether the root must be grown before the next insert.
    pub(super) fn needs_growth(&self, order: Order) -> bool {
        self.is_full(order)
    }

    /// Insert into a node known to have room, splitting full children on the
    /// way down.
    ///
    /// # Pre-conditions
    ///
    /// - `self` is not full
    /// - no entry named `entry.name()` exists below `self`
    pub(super) fn insert_non_full(&mut self, entry: E, order: Order) {
        let mut idx = self.find_index(entry.name()).unwrap_or_else(|i| i);

        if self.is_leaf() {
            self.entries.insert(idx, entry);
            return;
        }

        if self.children[idx].is_full(order) {
            self.split_child(idx, order);
            if entry.name() > self.entries[idx].name() {
                idx += 1;
            }
        }
        self.children[idx].insert_non_full(entry, order);
    }

    /// Remove the entry named `name` from the subtree rooted here.
    ///
    /// Every child is brought to at least `t` entries before the descent
    /// enters it, so no underflow is ever left behind below `self`. `self`
    /// itself may drop to `t - 2` entries only when it is the root.
    pub(super) fn remove(&mut self, name: &str, order: Order) -> Option<E> {
        match self.find_index(name) {
            Ok(idx) if self.is_leaf() => Some(self.entries.remove(idx)),
            Ok(idx) => self.remove_separator(idx, name, order),
            Err(_) if self.is_leaf() => None,
            Err(idx) => {
                let idx = if self.children[idx].is_minimal(order) {
                    self.fill(idx, order)
                } else {
                    idx
                };
                self.children[idx].remove(name, order)
            }
        }
    }

    /// Remove `entries[idx]` (named `name`) from an internal node.
    fn remove_separator(&mut self, idx: usize, name: &str, order: Order) -> Option<E> {
        if !self.children[idx].is_minimal(order) {
            let predecessor = self.children[idx].last_entry()?.name().to_owned();
            let replacement = self.children[idx].remove(&predecessor, order)?;
            Some(mem::replace(&mut self.entries[idx], replacement))
        } else if !self.children[idx + 1].is_minimal(order) {
            let successor = self.children[idx + 1].first_entry()?.name().to_owned();
            let replacement = self.children[idx + 1].remove(&successor, order)?;
            Some(mem::replace(&mut self.entries[idx], replacement))
        } else {
            self.merge(idx);
            self.children[idx].remove(name, order)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(t: usize) -> Order {
        Order::new(t).unwrap()
    }

    fn leaf(names: &[&str]) -> Node<String> {
        Node {
            entries: names.iter().map(|n| (*n).to_owned()).collect(),
            children: Vec::new(),
        }
    }

    fn internal(names: &[&str], children: Vec<Node<String>>) -> Node<String> {
        Node {
            entries: names.iter().map(|n| (*n).to_owned()).collect(),
            children,
        }
    }

    fn names(node: &Node<String>) -> Vec<&str> {
        node.entries.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_order_bounds() {
        let t = order(3);
        assert_eq!(t.min_degree(), 3);
        assert_eq!(t.max_entries(), 5);
        assert_eq!(t.min_entries(), 2);
        assert_eq!(Order::default(), Order::DEFAULT);
    }

    #[test]
    fn test_order_rejects_degree_below_two() {
        assert_eq!(Order::new(1), Err(InvalidOrder(1)));
        assert_eq!(Order::new(0), Err(InvalidOrder(0)));
        assert_eq!(
            InvalidOrder(1).to_string(),
            "invalid B-tree order 1: minimum degree must be at least 2"
        );
    }

    #[test]
    fn test_find_index() {
        let node = leaf(&["b", "d", "f"]);
        assert_eq!(node.find_index("a"), Err(0));
        assert_eq!(node.find_index("b"), Ok(0));
        assert_eq!(node.find_index("c"), Err(1));
        assert_eq!(node.find_index("f"), Ok(2));
        assert_eq!(node.find_index("g"), Err(3));
    }

    #[test]
    fn test_split_leaf_child() {
        let mut parent = internal(&[], vec![leaf(&["a", "b", "c", "d", "e"])]);
        parent.split_child(0, order(3));

        assert_eq!(names(&parent), vec!["c"]);
        assert_eq!(names(&parent.children[0]), vec!["a", "b"]);
        assert_eq!(names(&parent.children[1]), vec!["d", "e"]);
        assert!(parent.children[1].is_leaf());
    }

    #[test]
    fn test_split_internal_child_moves_upper_children() {
        let full = internal(
            &["b", "d", "f"],
            vec![leaf(&["a"]), leaf(&["c"]), leaf(&["e"]), leaf(&["g"])],
        );
        let mut parent = internal(&["m"], vec![full, leaf(&["n"])]);
        parent.split_child(0, order(2));

        assert_eq!(names(&parent), vec!["d", "m"]);
        let left = &parent.children[0];
        let right = &parent.children[1];
        assert_eq!(names(left), vec!["b"]);
        assert_eq!(left.children.len(), 2);
        assert_eq!(names(right), vec!["f"]);
        assert_eq!(names(&right.children[0]), vec!["e"]);
        assert_eq!(names(&right.children[1]), vec!["g"]);
        assert_eq!(names(&parent.children[2]), vec!["n"]);
    }

    #[test]
    fn test_borrow_from_prev_rotates_through_parent() {
        let mut parent = internal(&["d"], vec![leaf(&["a", "b", "c"]), leaf(&["e"])]);
        parent.borrow_from_prev(1);

        assert_eq!(names(&parent), vec!["c"]);
        assert_eq!(names(&parent.children[0]), vec!["a", "b"]);
        assert_eq!(names(&parent.children[1]), vec!["d", "e"]);
    }

    #[test]
    fn test_borrow_from_next_moves_grandchild() {
        let left = internal(&["b"], vec![leaf(&["a"]), leaf(&["c"])]);
        let right = internal(
            &["f", "h"],
            vec![leaf(&["e"]), leaf(&["g"]), leaf(&["i"])],
        );
        let mut parent = internal(&["d"], vec![left, right]);
        parent.borrow_from_next(0);

        assert_eq!(names(&parent), vec!["f"]);
        let left = &parent.children[0];
        assert_eq!(names(left), vec!["b", "d"]);
        assert_eq!(left.children.len(), 3);
        assert_eq!(names(&left.children[2]), vec!["e"]);
        let right = &parent.children[1];
        assert_eq!(names(right), vec!["h"]);
        assert_eq!(right.children.len(), 2);
    }

    #[test]
    fn test_merge_absorbs_separator_and_sibling() {
        let mut parent = internal(
            &["b", "d"],
            vec![leaf(&["a"]), leaf(&["c"]), leaf(&["e"])],
        );
        parent.merge(1);

        assert_eq!(names(&parent), vec!["b"]);
        assert_eq!(parent.children.len(), 2);
        assert_eq!(names(&parent.children[1]), vec!["c", "d", "e"]);
    }

    #[test]
    fn test_fill_last_child_merges_left() {
        let mut parent = internal(&["b"], vec![leaf(&["a"]), leaf(&["c"])]);
        let idx = parent.fill(1, order(2));

        assert_eq!(idx, 0);
        assert!(parent.entries.is_empty());
        assert_eq!(names(&parent.children[0]), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_fill_prefers_previous_sibling() {
        let mut parent = internal(
            &["c", "e"],
            vec![leaf(&["a", "b"]), leaf(&["d"]), leaf(&["f", "g"])],
        );
        let idx = parent.fill(1, order(2));

        assert_eq!(idx, 1);
        assert_eq!(names(&parent), vec!["b", "e"]);
        assert_eq!(names(&parent.children[1]), vec!["c", "d"]);
        assert_eq!(names(&parent.children[2]), vec!["f", "g"]);
    }

    #[test]
    fn test_first_and_last_entry_follow_outer_spine() {
        let node = internal(
            &["m"],
            vec![
                internal(&["c"], vec![leaf(&["a", "b"]), leaf(&["d"])]),
                internal(&["p"], vec![leaf(&["n"]), leaf(&["q", "z"])]),
            ],
        );
        assert_eq!(node.first_entry().map(String::as_str), Some("a"));
        assert_eq!(node.last_entry().map(String::as_str), Some("z"));
    }

    #[test]
    fn test_remove_separator_uses_predecessor() {
        let mut node = internal(&["c"], vec![leaf(&["a", "b"]), leaf(&["d"])]);
        let removed = node.remove("c", order(2));

        assert_eq!(removed.as_deref(), Some("c"));
        assert_eq!(names(&node), vec!["b"]);
        assert_eq!(names(&node.children[0]), vec!["a"]);
    }

    #[test]
    fn test_remove_separator_uses_successor() {
        let mut node = internal(&["b"], vec![leaf(&["a"]), leaf(&["c", "d"])]);
        let removed = node.remove("b", order(2));

        assert_eq!(removed.as_deref(), Some("b"));
        assert_eq!(names(&node), vec!["c"]);
        assert_eq!(names(&node.children[1]), vec!["d"]);
    }

    #[test]
    fn test_remove_separator_merges_minimal_children() {
        let mut node = internal(&["b"], vec![leaf(&["a"]), leaf(&["c"])]);
        let removed = node.remove("b", order(2));

        assert_eq!(removed.as_deref(), Some("b"));
        assert!(node.entries.is_empty());
        assert_eq!(names(&node.children[0]), vec!["a", "c"]);

        let root = node.into_only_child().unwrap();
        assert_eq!(names(&root), vec!["a", "c"]);
    }
}
