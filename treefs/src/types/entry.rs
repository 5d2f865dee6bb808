//! Directory entries.
//!
//! An entry is a named file or a named sub-directory. The name is the key
//! of the entry inside its parent's index, so it is fixed at creation.

use std::fmt;

use crate::index::{Named, Order};
use crate::types::{Directory, FsError};

/// Longest entry name accepted, in bytes.
pub const MAX_NAME_LENGTH: usize = 255;

/// Characters that may not appear in an entry name.
///
/// `/` separates path segments; `|` separates image record fields; line
/// breaks separate image records.
const RESERVED_CHARACTERS: [char; 4] = ['/', '|', '\n', '\r'];

/// Check that `name` can be used as an entry name.
///
/// # Errors
///
/// Returns [`FsError::InvalidName`] if the name is empty, `.` or `..`,
/// longer than [`MAX_NAME_LENGTH`] bytes, or contains a reserved character.
pub fn validate_name(name: &str) -> Result<(), FsError> {
    let reason = if name.is_empty() {
        "name must not be empty"
    } else if name == "." || name == ".." {
        "name is reserved for navigation"
    } else if name.len() > MAX_NAME_LENGTH {
        "name is longer than 255 bytes"
    } else if name.contains(RESERVED_CHARACTERS) {
        "name contains '/', '|' or a line break"
    } else {
        return Ok(());
    };

    Err(FsError::InvalidName {
        name: name.to_owned(),
        reason,
    })
}

/// Whether an entry is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

/// File contents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct File {
    content: Vec<u8>,
}

impl File {
    #[must_use]
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
        }
    }

    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Content length in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// What an entry holds.
#[derive(Debug)]
pub enum Payload {
    File(File),
    Directory(Directory),
}

/// A named file or directory.
#[derive(Debug)]
pub struct Entry {
    name: String,
    payload: Payload,
}

impl Entry {
    /// Create a file entry.
    ///
    /// The name is not validated; see [`validate_name`].
    #[must_use]
    pub fn file(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            payload: Payload::File(File::new(content)),
        }
    }

    /// Create an empty directory entry whose index uses [`Order::DEFAULT`].
    #[must_use]
    pub fn directory(name: impl Into<String>) -> Self {
        Self::with_directory(name, Directory::with_order(Order::DEFAULT))
    }

    /// Create a directory entry owning `directory`.
    #[must_use]
    pub fn with_directory(name: impl Into<String>, directory: Directory) -> Self {
        Self {
            name: name.into(),
            payload: Payload::Directory(directory),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        match self.payload {
            Payload::File(_) => EntryKind::File,
            Payload::Directory(_) => EntryKind::Directory,
        }
    }

    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    #[must_use]
    pub fn into_payload(self) -> Payload {
        self.payload
    }

    #[must_use]
    pub const fn as_file(&self) -> Option<&File> {
        match &self.payload {
            Payload::File(file) => Some(file),
            Payload::Directory(_) => None,
        }
    }

    #[must_use]
    pub const fn as_directory(&self) -> Option<&Directory> {
        match &self.payload {
            Payload::Directory(directory) => Some(directory),
            Payload::File(_) => None,
        }
    }

    pub const fn as_directory_mut(&mut self) -> Option<&mut Directory> {
        match &mut self.payload {
            Payload::Directory(directory) => Some(directory),
            Payload::File(_) => None,
        }
    }
}

impl Named for Entry {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_entry() {
        let entry = Entry::file("a.txt", "hello");
        assert_eq!(entry.name(), "a.txt");
        assert_eq!(entry.kind(), EntryKind::File);

        let file = entry.as_file().unwrap();
        assert_eq!(file.content(), b"hello");
        assert_eq!(file.size(), 5);
        assert!(entry.as_directory().is_none());
    }

    #[test]
    fn test_directory_entry() {
        let mut entry = Entry::directory("docs");
        assert_eq!(entry.kind(), EntryKind::Directory);
        assert!(entry.as_file().is_none());

        let directory = entry.as_directory_mut().unwrap();
        directory.add(Entry::file("a.txt", "")).unwrap();
        assert_eq!(entry.as_directory().unwrap().len(), 1);
    }

    #[test]
    fn test_validate_name_accepts_ordinary_names() {
        for name in ["a", "a.txt", "My Notes", ".hidden", "...", "ç-ü"] {
            assert_eq!(validate_name(name), Ok(()), "{name}");
        }
    }

    #[test]
    fn test_validate_name_rejects_reserved() {
        for name in ["", ".", "..", "a/b", "a|b", "a\nb", "a\rb"] {
            assert!(
                matches!(validate_name(name), Err(FsError::InvalidName { .. })),
                "{name:?}"
            );
        }
        let long = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(validate_name(&long).is_err());
        assert!(validate_name(&long[1..]).is_ok());
    }

    #[test]
    fn test_entry_kind_display() {
        assert_eq!(EntryKind::File.to_string(), "file");
        assert_eq!(EntryKind::Directory.to_string(), "directory");
    }
}
