//! Ordered in-memory index for one directory.
//!
//! `BTree` owns its root node and, through it, every node of the tree.
//! Nodes are plain owned values: a split allocates exactly one node, a merge
//! or a root collapse drops exactly one.

use crate::index::node::{Named, Node, Order};
use crate::index::validate::{self, InvariantViolation};

/// A B-tree of entries keyed by name.
#[derive(Debug)]
pub struct BTree<E> {
    order: Order,
    root: Option<Node<E>>,
    len: usize,
}

impl<E> BTree<E> {
    /// Create an empty tree with [`Order::DEFAULT`].
    #[must_use]
    pub const fn new() -> Self {
        Self::with_order(Order::DEFAULT)
    }

    /// Create an empty tree with the given order.
    #[must_use]
    pub const fn with_order(order: Order) -> Self {
        Self {
            order,
            root: None,
            len: 0,
        }
    }

    #[must_use]
    pub const fn order(&self) -> Order {
        self.order
    }

    /// Number of entries in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The root node, if the tree holds any entries.
    #[must_use]
    pub const fn root(&self) -> Option<&Node<E>> {
        self.root.as_ref()
    }

    /// Number of levels; 0 for an empty tree.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut next = self.root.as_ref();
        while let Some(node) = next {
            height += 1;
            next = node.children().first();
        }
        height
    }

    /// Total number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&Node<E>> = self.root.iter().collect();
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children());
        }
        count
    }

    /// In-order iterator over all entries.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, E> {
        let mut iter = Iter { stack: Vec::new() };
        if let Some(root) = &self.root {
            iter.descend(root);
        }
        iter
    }
}

impl<E: Named> BTree<E> {
    /// Look up an entry by name.
    #[must_use]
    pub fn search(&self, name: &str) -> Option<&E> {
        self.root.as_ref()?.get(name)
    }

    /// Look up an entry by name for modification.
    ///
    /// The entry's name must not be changed through the returned reference.
    pub fn search_mut(&mut self, name: &str) -> Option<&mut E> {
        self.root.as_mut()?.get_mut(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.search(name).is_some()
    }

    /// Insert an entry.
    ///
    /// Full nodes are split on the way down, so the leaf that receives the
    /// entry always has room and nothing propagates back up.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::AlreadyExists`] if an entry with the same name is
    /// present. The tree is not modified in that case.
    pub fn insert(&mut self, entry: E) -> Result<(), IndexError> {
        if self.contains(entry.name()) {
            return Err(IndexError::AlreadyExists(entry.name().to_owned()));
        }

        let order = self.order;
        let height = self.height();
        self.root = Some(match self.root.take() {
            None => Node::leaf(entry),
            Some(root) => {
                let mut root = if root.needs_growth(order) {
                    tracing::trace!(height = height + 1, "index root split");
                    Node::grow(root, order)
                } else {
                    root
                };
                root.insert_non_full(entry, order);
                root
            }
        });
        self.len += 1;

        Ok(())
    }

    /// Remove the entry with the given name and return it.
    ///
    /// Returns `None` if no such entry exists; the tree is left exactly as it
    /// was.
    pub fn delete(&mut self, name: &str) -> Option<E> {
        if !self.contains(name) {
            return None;
        }

        let mut root = self.root.take()?;
        let removed = root.remove(name, self.order);

        self.root = if root.is_empty() {
            let replacement = root.into_only_child();
            tracing::trace!(
                collapsed_to_empty = replacement.is_none(),
                "index root collapsed"
            );
            replacement
        } else {
            Some(root)
        };

        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Verify every structural invariant of the tree.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        validate::check(self.root.as_ref(), self.order, self.len)
    }
}

impl<E> Default for BTree<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, E> IntoIterator for &'a BTree<E> {
    type Item = &'a E;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over a [`BTree`].
///
/// Holds one `(node, next entry position)` frame per level, so memory is
/// bounded by the tree height.
#[derive(Debug)]
pub struct Iter<'a, E> {
    stack: Vec<(&'a Node<E>, usize)>,
}

impl<'a, E> Iter<'a, E> {
    /// Push `node` and its leftmost descendants.
    fn descend(&mut self, node: &'a Node<E>) {
        let mut next = Some(node);
        while let Some(node) = next {
            self.stack.push((node, 0));
            next = node.children().first();
        }
    }
}

impl<'a, E> Iterator for Iter<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(top) = self.stack.last_mut() {
            let (node, position) = *top;
            if position < node.len() {
                top.1 += 1;
                if let Some(child) = node.children().get(position + 1) {
                    self.descend(child);
                }
                return node.entries().get(position);
            }
            self.stack.pop();
        }
        None
    }
}

/// Errors returned by index mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// An entry with this name is already in the index.
    AlreadyExists(String),
}

impl std::fmt::Display for IndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyExists(name) => write!(f, "entry already exists: {name}"),
        }
    }
}

impl std::error::Error for IndexError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(t: usize) -> BTree<String> {
        BTree::with_order(Order::new(t).unwrap())
    }

    fn insert_all(tree: &mut BTree<String>, names: &[&str]) {
        for name in names {
            tree.insert((*name).to_owned()).unwrap();
        }
    }

    fn collect(tree: &BTree<String>) -> Vec<&str> {
        tree.iter().map(String::as_str).collect()
    }

    /// Deterministic permutation of `0..n` (multiplier coprime with n).
    fn scrambled(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("k{:04}", (i * 7919) % n)).collect()
    }

    #[test]
    fn test_empty_tree() {
        let tree = tree(2);
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.node_count(), 0);
        assert!(tree.search("a").is_none());
        assert_eq!(tree.iter().count(), 0);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_fourth_insert_causes_single_split() {
        let mut tree = tree(2);
        insert_all(&mut tree, &["b", "a", "c"]);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.height(), 1);

        insert_all(&mut tree, &["d"]);
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.height(), 2);
        assert_eq!(collect(&tree), vec!["a", "b", "c", "d"]);

        let root = tree.root().unwrap();
        assert_eq!(root.entries(), ["b".to_owned()]);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_insert_then_search() {
        let mut tree = tree(2);
        insert_all(&mut tree, &["m", "c", "x", "a", "e"]);
        for name in ["m", "c", "x", "a", "e"] {
            assert_eq!(tree.search(name).map(String::as_str), Some(name));
        }
        assert!(tree.search("b").is_none());
        assert!(tree.contains("x"));
    }

    #[test]
    fn test_duplicate_insert_rejected_without_change() {
        let mut tree = tree(2);
        insert_all(&mut tree, &["a", "b", "c"]);
        let nodes_before = tree.node_count();

        let result = tree.insert("b".to_owned());
        assert_eq!(result, Err(IndexError::AlreadyExists("b".to_owned())));
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.node_count(), nodes_before);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_many_inserts_stay_sorted_and_balanced() {
        for t in 2..=5 {
            let mut tree = tree(t);
            for name in scrambled(500) {
                tree.insert(name).unwrap();
                tree.check_invariants().unwrap();
            }
            assert_eq!(tree.len(), 500);
            let names = collect(&tree);
            assert!(names.windows(2).all(|w| w[0] < w[1]), "order {t}");
        }
    }

    #[test]
    fn test_delete_then_search_misses() {
        let mut tree = tree(2);
        insert_all(&mut tree, &["a", "b", "c", "d", "e", "f", "g"]);

        assert_eq!(tree.delete("d").as_deref(), Some("d"));
        assert!(tree.search("d").is_none());
        assert_eq!(collect(&tree), vec!["a", "b", "c", "e", "f", "g"]);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_delete_absent_name_is_noop() {
        let mut tree = tree(2);
        insert_all(&mut tree, &["a", "b", "c", "d", "e", "f", "g", "h"]);
        let shape_before = format!("{:?}", tree.root());

        assert!(tree.delete("zzz").is_none());
        assert!(tree.delete("bb").is_none());
        assert_eq!(format!("{:?}", tree.root()), shape_before);
        assert_eq!(tree.len(), 8);
    }

    #[test]
    fn test_delete_on_empty_tree() {
        let mut tree = tree(3);
        assert!(tree.delete("a").is_none());
        assert!(tree.root().is_none());
    }

    #[test]
    fn test_delete_everything_collapses_root() {
        let mut tree = tree(2);
        let names = scrambled(64);
        for name in &names {
            tree.insert(name.clone()).unwrap();
        }
        assert!(tree.height() > 2);

        let mut previous_height = tree.height();
        for name in names.iter().rev() {
            assert_eq!(tree.delete(name).as_ref(), Some(name));
            tree.check_invariants().unwrap();
            assert!(tree.height() <= previous_height);
            previous_height = tree.height();
        }
        assert!(tree.is_empty());
        assert!(tree.root().is_none());
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn test_delete_internal_separators() {
        let mut tree = tree(2);
        let names = scrambled(100);
        for name in &names {
            tree.insert(name.clone()).unwrap();
        }

        // Repeatedly remove whatever currently separates the root's children.
        while let Some(separator) = tree.root().and_then(|r| r.entries().first()).cloned() {
            assert_eq!(tree.delete(&separator), Some(separator.clone()));
            assert!(!tree.contains(&separator));
            tree.check_invariants().unwrap();
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn test_interleaved_insert_and_delete() {
        let mut tree = tree(3);
        let names = scrambled(300);
        for (i, name) in names.iter().enumerate() {
            tree.insert(name.clone()).unwrap();
            if i % 3 == 2 {
                let victim = &names[i / 2];
                tree.delete(victim);
            }
            tree.check_invariants().unwrap();
        }
        let expected: std::collections::BTreeSet<&str> = collect(&tree).into_iter().collect();
        assert_eq!(expected.len(), tree.len());
    }

    #[test]
    fn test_iter_is_restartable() {
        let mut tree = tree(2);
        insert_all(&mut tree, &["q", "w", "e", "r", "t", "y"]);

        let first: Vec<&str> = tree.iter().take(2).map(String::as_str).collect();
        assert_eq!(first, vec!["e", "q"]);
        assert_eq!(collect(&tree), vec!["e", "q", "r", "t", "w", "y"]);
        assert_eq!((&tree).into_iter().count(), 6);
    }

    #[test]
    fn test_search_mut() {
        let mut tree = tree(2);
        insert_all(&mut tree, &["a", "b", "c", "d"]);
        assert!(tree.search_mut("c").is_some());
        assert!(tree.search_mut("z").is_none());
    }

    #[test]
    fn test_index_error_display() {
        let error = IndexError::AlreadyExists("notes".to_owned());
        assert_eq!(error.to_string(), "entry already exists: notes");
    }
}
