//! Test moving around the directory hierarchy.

use crate::e2e_tests::helpers::*;
use crate::session::{Outcome, SessionError};
use crate::types::FsError;

#[test]
fn test_cd_down_and_up() {
    let mut shell = TestShell::new();
    shell.script(&["mkdir a", "cd a", "mkdir b", "cd b"]);
    assert_eq!(shell.pwd(), "/a/b");

    assert_eq!(
        shell.ok("cd .."),
        Outcome::ChangedDirectory("/a".to_owned())
    );
    shell.ok("cd ..");
    assert_eq!(shell.pwd(), "/");
    assert_eq!(shell.run("cd .."), Err(SessionError::AtRoot));
}

#[test]
fn test_cd_multi_segment_and_absolute_paths() {
    let mut shell = TestShell::new();
    shell.script(&["mkdir a", "cd a", "mkdir b", "cd b", "mkdir c", "cd /"]);
    assert_eq!(shell.pwd(), "/");

    shell.ok("cd a/b/c");
    assert_eq!(shell.pwd(), "/a/b/c");

    shell.ok("cd ../../b/./c");
    assert_eq!(shell.pwd(), "/a/b/c");

    shell.ok("cd /a");
    assert_eq!(shell.pwd(), "/a");
}

#[test]
fn test_failed_cd_is_all_or_nothing() {
    let mut shell = TestShell::new();
    shell.script(&["mkdir a", "cd a", "touch note.txt hi"]);

    assert_eq!(
        shell.run("cd /a/missing"),
        Err(SessionError::Fs(FsError::NotFound("missing".to_owned())))
    );
    assert_eq!(
        shell.run("cd note.txt"),
        Err(SessionError::Fs(FsError::NotADirectory("note.txt".to_owned())))
    );
    assert_eq!(shell.run("cd ../.."), Err(SessionError::AtRoot));
    assert_eq!(shell.pwd(), "/a");
}

#[test]
fn test_commands_apply_to_current_directory() {
    let mut shell = TestShell::new();
    shell.script(&["mkdir a", "mkdir b", "cd b", "touch only-in-b x"]);
    assert_eq!(shell.ls(), ["only-in-b"]);

    shell.script(&["cd /a"]);
    assert!(shell.ls().is_empty());
    assert_eq!(
        shell.run("cat only-in-b"),
        Err(SessionError::Fs(FsError::NotFound("only-in-b".to_owned())))
    );
}
