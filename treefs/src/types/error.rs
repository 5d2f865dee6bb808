use crate::index::IndexError;

/// Errors returned by directory operations.
///
/// All of these are ordinary outcomes that the caller reports to the user;
/// none of them leave a directory in a modified state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    /// No entry with this name exists in the directory.
    NotFound(String),
    /// An entry with this name already exists in the directory.
    AlreadyExists(String),
    /// The directory still has entries and cannot be removed.
    NonEmptyDirectory(String),
    /// The entry exists but is a file where a directory was required.
    NotADirectory(String),
    /// The entry exists but is a directory where a file was required.
    NotAFile(String),
    /// The name cannot be used for an entry.
    InvalidName { name: String, reason: &'static str },
}

impl std::fmt::Display for FsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(name) => write!(f, "no such entry: {name}"),
            Self::AlreadyExists(name) => write!(f, "entry already exists: {name}"),
            Self::NonEmptyDirectory(name) => write!(f, "directory not empty: {name}"),
            Self::NotADirectory(name) => write!(f, "not a directory: {name}"),
            Self::NotAFile(name) => write!(f, "not a file: {name}"),
            Self::InvalidName { name, reason } => write!(f, "invalid name '{name}': {reason}"),
        }
    }
}

impl std::error::Error for FsError {}

impl From<IndexError> for FsError {
    fn from(e: IndexError) -> Self {
        match e {
            IndexError::AlreadyExists(name) => Self::AlreadyExists(name),
        }
    }
}
