//! Test that a non-empty directory cannot be removed.

use crate::e2e_tests::helpers::*;
use crate::session::{Outcome, SessionError};
use crate::types::{EntryKind, FsError};

#[test]
fn test_rmdir_refuses_non_empty_directory() {
    let mut shell = TestShell::new();
    shell.script(&["mkdir docs", "cd docs", "touch a.txt hello", "cd .."]);

    assert_eq!(
        shell.run("rmdir docs"),
        Err(SessionError::Fs(FsError::NonEmptyDirectory(
            "docs".to_owned()
        )))
    );
    assert_eq!(shell.ls(), ["docs"]);

    shell.script(&["cd docs", "rm a.txt", "cd .."]);
    assert_eq!(
        shell.ok("rmdir docs"),
        Outcome::Removed {
            name: "docs".to_owned(),
            kind: EntryKind::Directory
        }
    );
    assert!(shell.ls().is_empty());
    shell.assert_invariants();
}

#[test]
fn test_rm_and_rmdir_check_kind() {
    let mut shell = TestShell::new();
    shell.script(&["mkdir d", "touch f"]);

    assert_eq!(
        shell.run("rm d"),
        Err(SessionError::Fs(FsError::NotAFile("d".to_owned())))
    );
    assert_eq!(
        shell.run("rmdir f"),
        Err(SessionError::Fs(FsError::NotADirectory("f".to_owned())))
    );
    assert_eq!(
        shell.run("rm ghost"),
        Err(SessionError::Fs(FsError::NotFound("ghost".to_owned())))
    );
    assert_eq!(shell.ls(), ["d", "f"]);
}
