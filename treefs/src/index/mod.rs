//! B-tree index used as the namespace of every directory.
//!
//! Each directory owns one independent `BTree` mapping entry names to
//! entries. The tree is kept balanced on every mutation:
//!
//! - Insertion splits full nodes top-down before descending into them, so
//!   the receiving leaf always has room.
//! - Deletion fills (borrows or merges) minimal children before descending
//!   into them, so no underflow is left behind. An internal entry is
//!   replaced by its predecessor or successor, which is then removed at
//!   leaf level.
//!
//! # Usage
//!
//! ```
//! use treefs::index::{BTree, Order};
//!
//! let mut tree = BTree::with_order(Order::new(2).unwrap());
//! for name in ["b", "a", "c", "d"] {
//!     tree.insert(name.to_string()).unwrap();
//! }
//!
//! let names: Vec<&str> = tree.iter().map(String::as_str).collect();
//! assert_eq!(names, ["a", "b", "c", "d"]);
//! assert_eq!(tree.height(), 2);
//!
//! assert_eq!(tree.delete("b").as_deref(), Some("b"));
//! assert!(tree.search("b").is_none());
//! ```

mod node;
mod tree;
mod validate;

pub use node::{InvalidOrder, Named, Node, Order};
pub use tree::{BTree, IndexError, Iter};
pub use validate::InvariantViolation;
