//! Shell session: the root directory, the navigation stack and command
//! execution.
//!
//! The session is the only layer that knows about a "current directory".
//! It keeps the path from the root as a stack of names and resolves it one
//! segment at a time through each directory's index. Results are returned
//! as [`Outcome`] values; rendering them is left to the caller.
//!
//! # Invariants
//!
//! - `cwd` always names a chain of existing directories below `root`.
//!   Only entries of the current directory can be removed, so no command can
//!   remove a directory on the stack.

use crate::command::{Command, CommandError};
use crate::index::Order;
use crate::types::{Directory, Entry, EntryKind, FsError, validate_name};

/// Content size limit used when none is configured (1 MiB).
pub const DEFAULT_MAX_CONTENT_BYTES: usize = 1024 * 1024;

/// Policy knobs for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Order of the index of every directory the session creates.
    pub order: Order,
    /// Largest file content accepted by `touch`, in bytes.
    pub max_content_bytes: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            order: Order::DEFAULT,
            max_content_bytes: DEFAULT_MAX_CONTENT_BYTES,
        }
    }
}

/// One line of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// Result of a successfully executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Blank input.
    Nothing,
    /// Entries of the current directory in name order.
    Listing(Vec<ListingEntry>),
    Created { name: String, kind: EntryKind },
    Removed { name: String, kind: EntryKind },
    /// The new working directory.
    ChangedDirectory(String),
    /// The unchanged working directory.
    WorkingDirectory(String),
    /// A file's content.
    Content(Vec<u8>),
    Help,
    Exit,
}

/// A shell session over one filesystem tree.
#[derive(Debug)]
pub struct Session {
    root: Directory,
    /// Names from the root down to the current directory.
    cwd: Vec<String>,
    options: SessionOptions,
}

impl Session {
    #[must_use]
    pub const fn new(root: Directory, options: SessionOptions) -> Self {
        Self {
            root,
            cwd: Vec::new(),
            options,
        }
    }

    #[must_use]
    pub const fn root(&self) -> &Directory {
        &self.root
    }

    #[must_use]
    pub fn into_root(self) -> Directory {
        self.root
    }

    /// Absolute path of the current directory, `/` at the root.
    #[must_use]
    pub fn working_directory(&self) -> String {
        format!("/{}", self.cwd.join("/"))
    }

    /// Parse and execute one input line.
    ///
    /// # Errors
    ///
    /// Returns the parse error or the execution error.
    pub fn execute_line(&mut self, line: &str) -> Result<Outcome, SessionError> {
        match Command::parse(line)? {
            Some(command) => self.execute(command),
            None => Ok(Outcome::Nothing),
        }
    }

    /// Execute a command against the current directory.
    ///
    /// A failed command leaves the filesystem and the working directory
    /// unchanged.
    ///
    /// # Errors
    ///
    /// See [`SessionError`].
    pub fn execute(&mut self, command: Command) -> Result<Outcome, SessionError> {
        tracing::debug!(?command, cwd = %self.working_directory(), "executing command");

        match command {
            Command::List => {
                let listing = self
                    .current()?
                    .listing()
                    .map(|(name, kind)| ListingEntry {
                        name: name.to_owned(),
                        kind,
                    })
                    .collect();
                Ok(Outcome::Listing(listing))
            }
            Command::MakeDirectory(name) => {
                validate_name(&name)?;
                let directory = Directory::with_order(self.options.order);
                self.current_mut()?
                    .add(Entry::with_directory(name.as_str(), directory))?;
                Ok(Outcome::Created {
                    name,
                    kind: EntryKind::Directory,
                })
            }
            Command::RemoveDirectory(name) => {
                self.current_mut()?.remove_directory(&name)?;
                Ok(Outcome::Removed {
                    name,
                    kind: EntryKind::Directory,
                })
            }
            Command::MakeFile { name, content } => {
                validate_name(&name)?;
                if content.len() > self.options.max_content_bytes {
                    return Err(SessionError::ContentTooLarge {
                        size: content.len(),
                        max: self.options.max_content_bytes,
                    });
                }
                if content.contains(['\n', '\r']) {
                    return Err(SessionError::LineBreakInContent(name));
                }
                self.current_mut()?
                    .add(Entry::file(name.as_str(), content))?;
                Ok(Outcome::Created {
                    name,
                    kind: EntryKind::File,
                })
            }
            Command::RemoveFile(name) => {
                self.current_mut()?.remove_file(&name)?;
                Ok(Outcome::Removed {
                    name,
                    kind: EntryKind::File,
                })
            }
            Command::Show(name) => {
                let entry = self
                    .current()?
                    .lookup(&name)
                    .ok_or_else(|| FsError::NotFound(name.clone()))?;
                let file = entry.as_file().ok_or(FsError::NotAFile(name))?;
                Ok(Outcome::Content(file.content().to_vec()))
            }
            Command::ChangeDirectory(path) => self.change_directory(&path),
            Command::PrintWorkingDirectory => {
                Ok(Outcome::WorkingDirectory(self.working_directory()))
            }
            Command::Help => Ok(Outcome::Help),
            Command::Exit => Ok(Outcome::Exit),
        }
    }

    fn current(&self) -> Result<&Directory, FsError> {
        self.root.resolve(&self.cwd)
    }

    fn current_mut(&mut self) -> Result<&mut Directory, FsError> {
        self.root.resolve_mut(&self.cwd)
    }

    /// Resolve `path` segment by segment and move there only if every
    /// segment resolves.
    fn change_directory(&mut self, path: &str) -> Result<Outcome, SessionError> {
        let mut target = if path.starts_with('/') {
            Vec::new()
        } else {
            self.cwd.clone()
        };

        for segment in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
            if segment == ".." {
                if target.pop().is_none() {
                    return Err(SessionError::AtRoot);
                }
            } else {
                self.root.resolve(&target)?.subdirectory(segment)?;
                target.push(segment.to_owned());
            }
        }

        self.cwd = target;
        Ok(Outcome::ChangedDirectory(self.working_directory()))
    }
}

/// Errors returned by [`Session::execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The filesystem refused the operation.
    Fs(FsError),
    /// The input line is not a valid command.
    Command(CommandError),
    /// `cd ..` at the root.
    AtRoot,
    /// File content exceeds the configured limit.
    ContentTooLarge { size: usize, max: usize },
    /// File content contains a line break and could not be saved.
    LineBreakInContent(String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fs(e) => write!(f, "{e}"),
            Self::Command(e) => write!(f, "{e}"),
            Self::AtRoot => write!(f, "already at the root directory"),
            Self::ContentTooLarge { size, max } => {
                write!(f, "content too large: {size} bytes (max {max})")
            }
            Self::LineBreakInContent(name) => {
                write!(f, "content of {name} must not contain a line break")
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fs(e) => Some(e),
            Self::Command(e) => Some(e),
            Self::AtRoot | Self::ContentTooLarge { .. } | Self::LineBreakInContent(_) => None,
        }
    }
}

impl From<FsError> for SessionError {
    fn from(e: FsError) -> Self {
        Self::Fs(e)
    }
}

impl From<CommandError> for SessionError {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}
