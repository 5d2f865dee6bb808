//! Test saving a session's tree and restoring it into a new session.

use crate::e2e_tests::helpers::*;
use crate::image;
use crate::session::SessionError;
use crate::types::EntryKind;

#[test]
fn test_image_round_trip_through_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fs.img");

    let mut shell = TestShell::with_order(order(2));
    shell.script(&[
        "mkdir docs",
        "cd docs",
        "touch a.txt hello world",
        "touch b.txt pipes | are | fine",
        "mkdir empty",
        "cd /",
        "touch readme top",
    ]);
    for i in 0..40 {
        shell.ok(&format!("touch bulk{i:02} {i}"));
    }
    image::save(shell.session.root(), &path).unwrap();

    let restored = image::load(&path, order(2)).unwrap().unwrap();
    let mut shell = TestShell::with_root(restored);
    shell.assert_invariants();

    assert_eq!(shell.ls().len(), 42);
    assert_eq!(shell.cat("readme"), "top");
    assert_eq!(shell.cat("bulk07"), "7");

    shell.ok("cd docs");
    assert_eq!(
        shell.ls_with_kinds(),
        [
            ("a.txt".to_owned(), EntryKind::File),
            ("b.txt".to_owned(), EntryKind::File),
            ("empty".to_owned(), EntryKind::Directory),
        ]
    );
    assert_eq!(shell.cat("a.txt"), "hello world");
    assert_eq!(shell.cat("b.txt"), "pipes | are | fine");
}

#[test]
fn test_restore_with_different_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fs.img");

    let mut shell = TestShell::with_order(order(2));
    for i in 0..25 {
        shell.ok(&format!("mkdir d{i:02}"));
    }
    image::save(shell.session.root(), &path).unwrap();

    let restored = image::load(&path, order(4)).unwrap().unwrap();
    assert_eq!(restored.order(), order(4));

    let mut shell = TestShell::with_root(restored);
    shell.assert_invariants();
    let expected: Vec<String> = (0..25).map(|i| format!("d{i:02}")).collect();
    assert_eq!(shell.ls(), expected);
}

#[test]
fn test_line_break_content_refused_before_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fs.img");

    let mut shell = TestShell::new();
    shell.script(&["touch keep.txt precious", "touch zz.txt also", "touch tab.txt a\tb"]);

    assert_eq!(
        shell.run("touch m.txt a\rb"),
        Err(SessionError::LineBreakInContent("m.txt".to_owned()))
    );
    assert_eq!(shell.ls(), ["keep.txt", "tab.txt", "zz.txt"]);

    image::save(shell.session.root(), &path).unwrap();
    let saved = std::fs::read_to_string(&path).unwrap();

    let restored = image::load(&path, order(3)).unwrap().unwrap();
    let mut shell = TestShell::with_root(restored);
    assert_eq!(shell.ls(), ["keep.txt", "tab.txt", "zz.txt"]);
    assert_eq!(shell.cat("keep.txt"), "precious");
    assert_eq!(shell.cat("tab.txt"), "a\tb");
    assert_eq!(shell.cat("zz.txt"), "also");

    image::save(shell.session.root(), &path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), saved);
}
