//! Test directories large enough to build multi-level indexes.

use crate::e2e_tests::helpers::*;

#[test]
fn test_many_files_then_remove_half() {
    let mut shell = TestShell::with_order(order(2));

    for i in (0..300).rev() {
        shell.ok(&format!("touch f{i:03} content {i}"));
    }
    shell.assert_invariants();
    assert!(shell.session.root().index().height() >= 4);

    let names = shell.ls();
    let expected: Vec<String> = (0..300).map(|i| format!("f{i:03}")).collect();
    assert_eq!(names, expected);

    for i in (0..300).filter(|i| i % 2 == 0) {
        shell.ok(&format!("rm f{i:03}"));
    }
    shell.assert_invariants();

    let expected: Vec<String> = (0..300)
        .filter(|i| i % 2 == 1)
        .map(|i| format!("f{i:03}"))
        .collect();
    assert_eq!(shell.ls(), expected);
    assert_eq!(shell.cat("f151"), "content 151");
}

#[test]
fn test_deep_hierarchy() {
    let mut shell = TestShell::with_order(order(3));
    for depth in 0..50 {
        shell.ok(&format!("mkdir level{depth}"));
        shell.ok(&format!("cd level{depth}"));
    }
    shell.ok("touch bottom reached");

    let expected: String = (0..50).map(|d| format!("/level{d}")).collect();
    assert_eq!(shell.pwd(), expected);

    shell.ok("cd /");
    let path: Vec<String> = (0..50).map(|d| format!("level{d}")).collect();
    shell.ok(&format!("cd {}", path.join("/")));
    assert_eq!(shell.cat("bottom"), "reached");
    shell.assert_invariants();
}
