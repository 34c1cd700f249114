//! Integration tests for the assignability relation
//!
//! Types are taken from leaves of trees built in one session, the way the
//! engine obtains them.

use parity_checker::{CheckOptions, DeclNode, Session, TypeId, Verdict, build_tree};
use parity_language::parse_file;

/// Builds one session holding both sources and returns the types of
/// `path` in each.
fn leaf_types(options: CheckOptions, left: &str, right: &str, path: &[&str]) -> (Session, TypeId, TypeId) {
    let mut session = Session::new(options);
    let l = session.add_source(parse_file("left.d.ts", left).unwrap());
    let r = session.add_source(parse_file("right.d.ts", right).unwrap());
    let left_tree = build_tree(&mut session, &[l]).unwrap();
    let right_tree = build_tree(&mut session, &[r]).unwrap();
    let ty = |tree: &parity_checker::DeclarationTree| {
        tree.get(path).and_then(DeclNode::as_leaf).unwrap().ty
    };
    let (a, b) = (ty(&left_tree), ty(&right_tree));
    (session, a, b)
}

fn mutual(left: &str, right: &str) -> Verdict {
    let (mut session, a, b) = leaf_types(CheckOptions::default(), left, right, &["x"]);
    session.relate_mutual(a, b)
}

#[test]
fn structurally_identical_interfaces_in_different_modules_relate() {
    let verdict = mutual(
        "declare module 'a' { interface Point { x: number; y: number } export const x: Point; }",
        "declare module 'b' { interface Pos { y: number; x: number } export const x: Pos; }",
    );
    assert_eq!(verdict, Verdict::Related);
}

#[test]
fn inherited_members_count() {
    let verdict = mutual(
        "declare module 'a' {
            interface Base { id: string }
            interface Item extends Base { name: string }
            export const x: Item;
        }",
        "declare module 'b' { export const x: { id: string; name: string }; }",
    );
    assert_eq!(verdict, Verdict::Related);
}

#[test]
fn generic_arguments_are_substituted() {
    let verdict = mutual(
        "declare module 'a' { interface Box<T> { value: T } export const x: Box<string>; }",
        "declare module 'b' { export const x: { value: string }; }",
    );
    assert_eq!(verdict, Verdict::Related);

    let verdict = mutual(
        "declare module 'a' { interface Box<T> { value: T } export const x: Box<string>; }",
        "declare module 'b' { export const x: { value: number }; }",
    );
    assert_eq!(verdict, Verdict::Unrelated);
}

#[test]
fn self_referential_types_terminate() {
    let verdict = mutual(
        "declare module 'a' { interface Node { next: Node | undefined; value: string } export const x: Node; }",
        "declare module 'b' { interface Link { next: Link | undefined; value: string } export const x: Link; }",
    );
    assert_eq!(verdict, Verdict::Related);
}

#[test]
fn optional_members_add_undefined() {
    let verdict = mutual(
        "declare module 'a' { export const x: { label?: string }; }",
        "declare module 'b' { export const x: { label: string }; }",
    );
    assert_eq!(verdict, Verdict::Unrelated);
}

#[test]
fn strict_null_checks_can_be_relaxed() {
    let left = "declare module 'a' { export const x: string; }";
    let right = "declare module 'b' { export const x: string | null; }";

    let (mut strict, a, b) = leaf_types(CheckOptions::default(), left, right, &["x"]);
    assert_eq!(strict.relate_mutual(a, b), Verdict::Unrelated);

    let relaxed_options = CheckOptions::default().with_strict_null_checks(false);
    let (mut relaxed, a, b) = leaf_types(relaxed_options, left, right, &["x"]);
    assert_eq!(relaxed.relate_mutual(a, b), Verdict::Related);
}

#[test]
fn unknown_names_relate_only_to_themselves() {
    assert_eq!(
        mutual(
            "declare module 'a' { export const x: Missing<string>; }",
            "declare module 'b' { export const x: Missing<string>; }",
        ),
        Verdict::Related
    );
    assert_eq!(
        mutual(
            "declare module 'a' { export const x: Missing; }",
            "declare module 'b' { export const x: number; }",
        ),
        Verdict::Undecidable
    );
}

#[test]
fn answers_are_stable_within_a_session() {
    let (mut session, a, b) = leaf_types(
        CheckOptions::default(),
        "declare module 'a' { export const x: (v: string) => void; }",
        "declare module 'b' { export const x: (v: string, w?: number) => void; }",
        &["x"],
    );
    let first = session.relate(a, b);
    assert_eq!(session.relate(a, b), first);
    assert_eq!(first, Verdict::Related);
}
