//! Directories and their namespace operations.
//!
//! A directory owns exactly one B-tree index of its entries. Sub-directory
//! entries own their own index in turn, so the filesystem is a tree of
//! independent trees with no shared or back references. Moving up the
//! hierarchy is the caller's business (see [`Session`](crate::Session)).

use crate::index::{BTree, Iter, Order};
use crate::types::{Entry, EntryKind, File, FsError, Payload};

/// A directory: a named collection of files and sub-directories.
#[derive(Debug, Default)]
pub struct Directory {
    index: BTree<Entry>,
}

impl Directory {
    /// Create an empty directory using [`Order::DEFAULT`].
    #[must_use]
    pub const fn new() -> Self {
        Self::with_order(Order::DEFAULT)
    }

    /// Create an empty directory whose index uses `order`.
    #[must_use]
    pub const fn with_order(order: Order) -> Self {
        Self {
            index: BTree::with_order(order),
        }
    }

    /// The directory's index.
    #[must_use]
    pub const fn index(&self) -> &BTree<Entry> {
        &self.index
    }

    #[must_use]
    pub const fn order(&self) -> Order {
        self.index.order()
    }

    /// Number of direct entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Entry> {
        self.index.search(name)
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.index.search_mut(name)
    }

    /// Add an entry.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::AlreadyExists`] if the name is taken.
    pub fn add(&mut self, entry: Entry) -> Result<(), FsError> {
        self.index.insert(entry)?;
        Ok(())
    }

    /// Remove a file and return its contents.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if no entry has this name
    /// - [`FsError::NotAFile`] if the entry is a directory
    pub fn remove_file(&mut self, name: &str) -> Result<File, FsError> {
        match self.lookup(name).map(Entry::kind) {
            None => return Err(FsError::NotFound(name.to_owned())),
            Some(EntryKind::Directory) => return Err(FsError::NotAFile(name.to_owned())),
            Some(EntryKind::File) => {}
        }

        match self.index.delete(name).map(Entry::into_payload) {
            Some(Payload::File(file)) => Ok(file),
            _ => Err(FsError::NotFound(name.to_owned())),
        }
    }

    /// Remove an empty sub-directory and return it.
    ///
    /// There is no recursive removal: the sub-directory's entries must be
    /// removed first.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if no entry has this name
    /// - [`FsError::NotADirectory`] if the entry is a file
    /// - [`FsError::NonEmptyDirectory`] if the sub-directory has entries
    pub fn remove_directory(&mut self, name: &str) -> Result<Self, FsError> {
        match self.lookup(name).map(Entry::payload) {
            None => return Err(FsError::NotFound(name.to_owned())),
            Some(Payload::File(_)) => return Err(FsError::NotADirectory(name.to_owned())),
            Some(Payload::Directory(directory)) if !directory.is_empty() => {
                return Err(FsError::NonEmptyDirectory(name.to_owned()));
            }
            Some(Payload::Directory(_)) => {}
        }

        match self.index.delete(name).map(Entry::into_payload) {
            Some(Payload::Directory(directory)) => Ok(directory),
            _ => Err(FsError::NotFound(name.to_owned())),
        }
    }

    /// The sub-directory with the given name.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if no entry has this name
    /// - [`FsError::NotADirectory`] if the entry is a file
    pub fn subdirectory(&self, name: &str) -> Result<&Self, FsError> {
        let entry = self
            .lookup(name)
            .ok_or_else(|| FsError::NotFound(name.to_owned()))?;
        entry
            .as_directory()
            .ok_or_else(|| FsError::NotADirectory(name.to_owned()))
    }

    /// Mutable twin of [`Self::subdirectory`].
    pub fn subdirectory_mut(&mut self, name: &str) -> Result<&mut Self, FsError> {
        let entry = self
            .lookup_mut(name)
            .ok_or_else(|| FsError::NotFound(name.to_owned()))?;
        entry
            .as_directory_mut()
            .ok_or_else(|| FsError::NotADirectory(name.to_owned()))
    }

    /// Follow `path` one segment at a time from this directory.
    ///
    /// # Errors
    ///
    /// Returns the error of the first segment that is missing or not a
    /// directory.
    pub fn resolve<S: AsRef<str>>(&self, path: &[S]) -> Result<&Self, FsError> {
        let mut directory = self;
        for segment in path {
            directory = directory.subdirectory(segment.as_ref())?;
        }
        Ok(directory)
    }

    /// Mutable twin of [`Self::resolve`].
    pub fn resolve_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Result<&mut Self, FsError> {
        let mut directory = self;
        for segment in path {
            directory = directory.subdirectory_mut(segment.as_ref())?;
        }
        Ok(directory)
    }

    /// Entries in ascending name order.
    #[must_use]
    pub fn entries(&self) -> Iter<'_, Entry> {
        self.index.iter()
    }

    /// `(name, kind)` pairs in ascending name order.
    pub fn listing(&self) -> impl Iterator<Item = (&str, EntryKind)> {
        self.entries().map(|entry| (entry.name(), entry.kind()))
    }
}
