//! Integration tests for declaration tree construction

use parity_checker::{ContainerKind, DeclNode, LeafKind, Session, build_tree};
use parity_language::parse_file;

fn tree_of(sources: &[&str]) -> (Session, parity_checker::DeclarationTree) {
    let mut session = Session::default();
    let ids: Vec<_> = sources
        .iter()
        .enumerate()
        .map(|(i, s)| session.add_source(parse_file(format!("{i}.d.ts"), s).unwrap()))
        .collect();
    let tree = build_tree(&mut session, &ids).unwrap();
    (session, tree)
}

#[test]
fn containers_merge_across_sources() {
    let (_, tree) = tree_of(&[
        "declare module 'api' { export namespace window { function show(): void; } }",
        "declare module 'api' { export namespace window { function hide(): void; } }",
    ]);
    let window = tree.get(&["window"]).unwrap().as_container().unwrap();
    let names: Vec<_> = window.children().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["hide", "show"]);
}

#[test]
fn class_and_namespace_merge_keeps_the_container() {
    let (_, tree) = tree_of(&[
        "declare module 'api' {
            export function Uri(value: string): void;
            export class Uri { toString(): string; }
            export namespace Uri { function parse(value: string): Uri; }
        }",
    ]);
    let uri = tree.get(&["Uri"]).unwrap().as_container().unwrap();
    assert_eq!(uri.kind, ContainerKind::Class);
    assert!(uri.get("toString").is_some());
    assert!(uri.get("parse").is_some());
}

#[test]
fn every_leaf_kind_is_filed() {
    let (_, tree) = tree_of(&[
        "declare module 'api' {
            export function f(): void;
            export const v: number;
            export type Alias = string;
            export enum Level { Low, High }
            export class C {
                constructor(x: number);
                m(): void;
                p: string;
                get a(): number;
            }
        }",
    ]);
    let kind = |path: &[&str]| tree.get(path).and_then(DeclNode::as_leaf).map(|l| l.kind);
    assert_eq!(kind(&["f"]), Some(LeafKind::Function));
    assert_eq!(kind(&["v"]), Some(LeafKind::Variable));
    assert_eq!(kind(&["Alias"]), Some(LeafKind::TypeAlias));
    assert_eq!(kind(&["Level"]), Some(LeafKind::Enum));
    assert_eq!(kind(&["C", "constructor"]), Some(LeafKind::Constructor));
    assert_eq!(kind(&["C", "m"]), Some(LeafKind::Method));
    assert_eq!(kind(&["C", "p"]), Some(LeafKind::Property));
    assert_eq!(kind(&["C", "a"]), Some(LeafKind::Accessor));
    assert_eq!(tree.leaf_count(), 8);
}

#[test]
fn source_order_does_not_change_keys() {
    let a = "declare module 'api' { export function b(): void; export function a(): void; }";
    let b = "declare module 'api' { export function a(): void; export function b(): void; }";
    let (_, first) = tree_of(&[a]);
    let (_, second) = tree_of(&[b]);
    let keys = |t: &parity_checker::DeclarationTree| {
        t.root().children().map(|(n, _)| n.to_string()).collect::<Vec<_>>()
    };
    assert_eq!(keys(&first), keys(&second));
}
