//! Flat-file image of a filesystem tree.
//!
//! # Format
//!
//! UTF-8 text, one record per line, parents before their descendants and
//! siblings in name order:
//!
//! ```text
//! D|/ROOT
//! D|/ROOT/docs
//! F|/ROOT/docs/a.txt|hello world
//! ```
//!
//! - `D|<path>` declares a directory.
//! - `F|<path>|<content>` declares a file; the content runs to the end of
//!   the line.
//! - Every path starts with the synthetic root segment `ROOT`.
//!
//! The image is built and restored only through the public directory API
//! (iteration, lookup and insertion). The shape of the B-tree nodes is not
//! recorded, so a restored tree may be shaped differently.

use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::index::Order;
use crate::types::{Directory, Entry, FsError, Payload, validate_name};

/// Name of the synthetic path segment standing for the root directory.
pub const ROOT_SEGMENT: &str = "ROOT";

/// Counts of records written or read, excluding the root record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageStats {
    pub directories: usize,
    pub files: usize,
}

/// Write the image of `root` to `out`.
///
/// # Errors
///
/// Returns an error if writing fails, or if a file's content is not UTF-8
/// or contains a line break.
pub fn write_image<W: Write>(root: &Directory, mut out: W) -> Result<ImageStats, ImageError> {
    let mut stats = ImageStats::default();
    let mut path = format!("/{ROOT_SEGMENT}");

    writeln!(out, "D|{path}")?;
    write_directory(root, &mut path, &mut out, &mut stats)?;
    out.flush()?;

    Ok(stats)
}

fn write_directory<W: Write>(
    directory: &Directory,
    path: &mut String,
    out: &mut W,
    stats: &mut ImageStats,
) -> Result<(), ImageError> {
    for entry in directory.entries() {
        let parent_len = path.len();
        path.push('/');
        path.push_str(entry.name());

        match entry.payload() {
            Payload::Directory(sub) => {
                writeln!(out, "D|{path}")?;
                stats.directories += 1;
                write_directory(sub, path, out, stats)?;
            }
            Payload::File(file) => {
                let content = std::str::from_utf8(file.content())
                    .ok()
                    .filter(|content| !content.contains(['\n', '\r']))
                    .ok_or_else(|| ImageError::UnrepresentableContent(path.clone()))?;
                writeln!(out, "F|{path}|{content}")?;
                stats.files += 1;
            }
        }

        path.truncate(parent_len);
    }
    Ok(())
}

/// Rebuild a directory tree from an image.
///
/// Every directory is created with `order`. Directories missing along a
/// record's path are created on the way, so records only need to be in
/// parent-first order for the counts in [`ImageStats`] to match the writer.
///
/// # Errors
///
/// Returns an error on I/O failure, a malformed record, an invalid name, a
/// duplicate file, or a path that runs through a file.
pub fn read_image<R: BufRead>(
    input: R,
    order: Order,
) -> Result<(Directory, ImageStats), ImageError> {
    let mut root = Directory::with_order(order);
    let mut stats = ImageStats::default();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        if line.is_empty() {
            continue;
        }

        let (tag, rest) = line
            .split_once('|')
            .ok_or_else(|| ImageError::malformed(number, "missing record separator"))?;

        match tag {
            "D" => {
                let segments = parse_path(rest, number)?;
                create_directories(&mut root, &segments, order, &mut stats)
                    .map_err(|error| ImageError::Entry { line: number, error })?;
            }
            "F" => {
                let (path, content) = rest
                    .split_once('|')
                    .ok_or_else(|| ImageError::malformed(number, "file record has no content field"))?;
                let segments = parse_path(path, number)?;
                let Some((name, parents)) = segments.split_last() else {
                    return Err(ImageError::malformed(number, "file record names the root"));
                };

                create_directories(&mut root, parents, order, &mut stats)
                    .and_then(|parent| parent.add(Entry::file(*name, content)))
                    .map_err(|error| ImageError::Entry { line: number, error })?;
                stats.files += 1;
            }
            other => {
                return Err(ImageError::malformed(
                    number,
                    format!("unknown record type '{other}'"),
                ));
            }
        }
    }

    Ok((root, stats))
}

/// Split an absolute image path into its segments below the root.
fn parse_path(path: &str, line: usize) -> Result<Vec<&str>, ImageError> {
    let mut segments = path
        .strip_prefix('/')
        .ok_or_else(|| ImageError::malformed(line, "path is not absolute"))?
        .split('/');

    if segments.next() != Some(ROOT_SEGMENT) {
        return Err(ImageError::malformed(
            line,
            format!("path does not start with /{ROOT_SEGMENT}"),
        ));
    }

    let segments: Vec<&str> = segments.collect();
    for segment in &segments {
        validate_name(segment).map_err(|error| ImageError::Entry { line, error })?;
    }
    Ok(segments)
}

/// Walk `segments` from `root`, creating missing directories.
fn create_directories<'a>(
    root: &'a mut Directory,
    segments: &[&str],
    order: Order,
    stats: &mut ImageStats,
) -> Result<&'a mut Directory, FsError> {
    let mut directory = root;
    for segment in segments {
        if directory.lookup(segment).is_none() {
            directory.add(Entry::with_directory(*segment, Directory::with_order(order)))?;
            stats.directories += 1;
        }
        directory = directory.subdirectory_mut(segment)?;
    }
    Ok(directory)
}

/// Save the image of `root` to the file at `path`, replacing it.
///
/// The image is serialized in full and written to a sibling temporary file,
/// which is then renamed over `path`. If any step fails, the previous file
/// at `path` is left as it was.
///
/// # Errors
///
/// See [`write_image`]; also fails if the temporary file cannot be written
/// or renamed.
pub fn save(root: &Directory, path: &Path) -> Result<ImageStats, ImageError> {
    let mut image = Vec::new();
    let stats = write_image(root, &mut image)?;

    let staging = staging_path(path);
    if let Err(e) = std::fs::write(&staging, &image).and_then(|()| std::fs::rename(&staging, path)) {
        let _ = std::fs::remove_file(&staging);
        return Err(e.into());
    }

    tracing::info!(
        path = %path.display(),
        directories = stats.directories,
        files = stats.files,
        "image saved"
    );
    Ok(stats)
}

/// `<path>.tmp`, in the same directory so the rename never crosses devices.
fn staging_path(path: &Path) -> PathBuf {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    PathBuf::from(staging)
}

/// Load the image at `path`.
///
/// Returns `Ok(None)` if the file does not exist.
///
/// # Errors
///
/// See [`read_image`]; also fails if the file exists but cannot be opened.
pub fn load(path: &Path, order: Order) -> Result<Option<Directory>, ImageError> {
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no image found");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let (root, stats) = read_image(BufReader::new(file), order)?;
    tracing::info!(
        path = %path.display(),
        directories = stats.directories,
        files = stats.files,
        "image loaded"
    );
    Ok(Some(root))
}

/// Errors that can occur while reading or writing an image.
#[derive(Debug)]
pub enum ImageError {
    /// I/O error.
    Io(std::io::Error),
    /// A line is not a valid record.
    Malformed { line: usize, message: String },
    /// A record could not be applied to the tree.
    Entry { line: usize, error: FsError },
    /// A file's content cannot be stored on one line of UTF-8 text.
    UnrepresentableContent(String),
}

impl ImageError {
    fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ImageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Malformed { line, message } => write!(f, "line {line}: {message}"),
            Self::Entry { line, error } => write!(f, "line {line}: {error}"),
            Self::UnrepresentableContent(path) => write!(
                f,
                "content of {path} is not single-line UTF-8 text and cannot be saved"
            ),
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Entry { error, .. } => Some(error),
            Self::Malformed { .. } | Self::UnrepresentableContent(_) => None,
        }
    }
}

impl From<std::io::Error> for ImageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
