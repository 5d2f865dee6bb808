//! Test that listings come out in name order.

use crate::e2e_tests::helpers::*;
use crate::types::EntryKind;

#[test]
fn test_ls_sorted_regardless_of_creation_order() {
    let mut shell = TestShell::with_order(order(2));
    shell.script(&[
        "touch zeta z",
        "mkdir beta",
        "touch alpha a",
        "mkdir epsilon",
        "touch delta d",
        "touch gamma g",
    ]);

    assert_eq!(
        shell.ls_with_kinds(),
        [
            ("alpha".to_owned(), EntryKind::File),
            ("beta".to_owned(), EntryKind::Directory),
            ("delta".to_owned(), EntryKind::File),
            ("epsilon".to_owned(), EntryKind::Directory),
            ("gamma".to_owned(), EntryKind::File),
            ("zeta".to_owned(), EntryKind::File),
        ]
    );
}

#[test]
fn test_ls_uses_byte_order() {
    let mut shell = TestShell::new();
    shell.script(&["touch b", "touch B", "touch a", "touch _"]);
    assert_eq!(shell.ls(), ["B", "_", "a", "b"]);
}

#[test]
fn test_ls_after_removals() {
    let mut shell = TestShell::with_order(order(2));
    for name in ["e", "b", "g", "a", "d", "c", "f"] {
        shell.ok(&format!("touch {name}"));
    }
    shell.script(&["rm d", "rm a", "rm g"]);
    assert_eq!(shell.ls(), ["b", "c", "e", "f"]);
    shell.assert_invariants();
}
