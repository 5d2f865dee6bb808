//! Filesystem types: entries, directories and their errors.

mod directory;
mod entry;
mod error;

pub use directory::Directory;
pub use entry::{Entry, EntryKind, File, MAX_NAME_LENGTH, Payload, validate_name};
pub use error::FsError;
