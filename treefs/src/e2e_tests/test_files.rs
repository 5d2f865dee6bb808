//! Test creating, reading and removing files.

use crate::e2e_tests::helpers::*;
use crate::session::{Outcome, SessionError};
use crate::types::{EntryKind, FsError};

#[test]
fn test_touch_then_cat() {
    let mut shell = TestShell::new();
    assert_eq!(
        shell.ok("touch notes.txt buy milk  and eggs"),
        Outcome::Created {
            name: "notes.txt".to_owned(),
            kind: EntryKind::File
        }
    );
    assert_eq!(shell.cat("notes.txt"), "buy milk  and eggs");
}

#[test]
fn test_touch_without_content_creates_empty_file() {
    let mut shell = TestShell::new();
    shell.ok("touch empty");
    assert_eq!(shell.cat("empty"), "");
}

#[test]
fn test_cat_directory_fails() {
    let mut shell = TestShell::new();
    shell.ok("mkdir d");
    assert_eq!(
        shell.run("cat d"),
        Err(SessionError::Fs(FsError::NotAFile("d".to_owned())))
    );
}

#[test]
fn test_rm_then_cat_fails() {
    let mut shell = TestShell::new();
    shell.script(&["touch a.txt one", "rm a.txt"]);
    assert_eq!(
        shell.run("cat a.txt"),
        Err(SessionError::Fs(FsError::NotFound("a.txt".to_owned())))
    );
    assert!(shell.ls().is_empty());
}
