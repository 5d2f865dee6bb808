//! Common helpers for end-to-end tests.

use crate::index::Order;
use crate::session::{Outcome, Session, SessionError, SessionOptions};
use crate::types::{Directory, EntryKind};

/// A session over a fresh, empty tree.
pub struct TestShell {
    pub session: Session,
}

impl TestShell {
    /// Create a shell using the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_order(Order::DEFAULT)
    }

    /// Create a shell whose directories use the given minimum degree.
    #[must_use]
    pub fn with_order(order: Order) -> Self {
        let options = SessionOptions {
            order,
            ..SessionOptions::default()
        };
        Self {
            session: Session::new(Directory::with_order(order), options),
        }
    }

    /// Create a shell over an existing tree.
    #[must_use]
    pub fn with_root(root: Directory) -> Self {
        let options = SessionOptions {
            order: root.order(),
            ..SessionOptions::default()
        };
        Self {
            session: Session::new(root, options),
        }
    }

    /// Run one line and return its result.
    pub fn run(&mut self, line: &str) -> Result<Outcome, SessionError> {
        self.session.execute_line(line)
    }

    /// Run one line that must succeed.
    pub fn ok(&mut self, line: &str) -> Outcome {
        match self.run(line) {
            Ok(outcome) => outcome,
            Err(e) => panic!("'{line}' failed: {e}"),
        }
    }

    /// Run several lines that must all succeed.
    pub fn script(&mut self, lines: &[&str]) {
        for line in lines {
            self.ok(line);
        }
    }

    /// Names listed by `ls` in the current directory.
    pub fn ls(&mut self) -> Vec<String> {
        self.ls_with_kinds().into_iter().map(|(name, _)| name).collect()
    }

    /// `(name, kind)` pairs listed by `ls` in the current directory.
    pub fn ls_with_kinds(&mut self) -> Vec<(String, EntryKind)> {
        match self.ok("ls") {
            Outcome::Listing(entries) => entries
                .into_iter()
                .map(|entry| (entry.name, entry.kind))
                .collect(),
            other => panic!("ls returned {other:?}"),
        }
    }

    /// Content shown by `cat`, as UTF-8 text.
    pub fn cat(&mut self, name: &str) -> String {
        match self.ok(&format!("cat {name}")) {
            Outcome::Content(bytes) => String::from_utf8(bytes).unwrap(),
            other => panic!("cat returned {other:?}"),
        }
    }

    pub fn pwd(&mut self) -> String {
        match self.ok("pwd") {
            Outcome::WorkingDirectory(path) => path,
            other => panic!("pwd returned {other:?}"),
        }
    }

    /// Check the structural invariants of every directory index.
    pub fn assert_invariants(&self) {
        fn walk(directory: &Directory, path: &str) {
            if let Err(e) = directory.index().check_invariants() {
                panic!("index of {path} is broken: {e}");
            }
            for entry in directory.entries() {
                if let Some(sub) = entry.as_directory() {
                    walk(sub, &format!("{path}{}/", entry.name()));
                }
            }
        }
        walk(self.session.root(), "/");
    }
}

pub fn order(t: usize) -> Order {
    Order::new(t).unwrap()
}
