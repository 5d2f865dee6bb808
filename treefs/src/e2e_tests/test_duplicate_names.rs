//! Test that names are unique within a directory, across kinds.

use crate::e2e_tests::helpers::*;
use crate::session::SessionError;
use crate::types::{EntryKind, FsError};

#[test]
fn test_duplicate_names_rejected() {
    let mut shell = TestShell::new();
    shell.script(&["mkdir x", "touch y first"]);

    for line in ["mkdir x", "touch x", "mkdir y", "touch y second"] {
        let name = line.split_whitespace().nth(1).unwrap();
        assert_eq!(
            shell.run(line),
            Err(SessionError::Fs(FsError::AlreadyExists(name.to_owned()))),
            "{line}"
        );
    }

    assert_eq!(
        shell.ls_with_kinds(),
        [
            ("x".to_owned(), EntryKind::Directory),
            ("y".to_owned(), EntryKind::File),
        ]
    );
    assert_eq!(shell.cat("y"), "first");
}

#[test]
fn test_same_name_in_different_directories() {
    let mut shell = TestShell::new();
    shell.script(&["touch same top", "mkdir sub", "cd sub", "touch same inner"]);
    assert_eq!(shell.cat("same"), "inner");
    shell.ok("cd ..");
    assert_eq!(shell.cat("same"), "top");
}
