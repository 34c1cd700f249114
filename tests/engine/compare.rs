//! Integration tests for tree classification and drift

use parity_checker::{DeclarationTree, Session, build_tree};
use parity_engine::{TreeInSession, compare, drift};
use parity_foundation::{ErrorKind, SupportLevel};
use parity_language::parse_file;

/// Loads `reference` then `candidate` into one session.
fn pair(reference: &str, candidate: &str) -> (Session, DeclarationTree, DeclarationTree) {
    let mut session = Session::default();
    let r = session.add_source(parse_file("reference.d.ts", reference).unwrap());
    let c = session.add_source(parse_file("candidate.d.ts", candidate).unwrap());
    let reference = build_tree(&mut session, &[r]).unwrap();
    let candidate = build_tree(&mut session, &[c]).unwrap();
    (session, reference, candidate)
}

fn alone(text: &str) -> (Session, DeclarationTree) {
    let mut session = Session::default();
    let id = session.add_source(parse_file("api.d.ts", text).unwrap());
    let tree = build_tree(&mut session, &[id]).unwrap();
    (session, tree)
}

#[test]
fn nested_containers_are_classified_recursively() {
    let (mut session, reference, candidate) = pair(
        "declare module 'ref' {
            export namespace window {
                function showMessage(text: string): void;
                function showInput(prompt: string): string;
                namespace nested { const depth: number; }
            }
        }",
        "declare module 'cand' {
            export namespace window {
                function showMessage(text: number): void;
            }
        }",
    );
    let result = compare(&mut session, &reference, &candidate).unwrap();
    assert_eq!(
        result.full.level_at(&["window", "showMessage"]),
        Some(SupportLevel::Partial)
    );
    assert_eq!(
        result.full.level_at(&["window", "showInput"]),
        Some(SupportLevel::None)
    );
    assert_eq!(
        result.full.level_at(&["window", "nested", "depth"]),
        Some(SupportLevel::None)
    );
    assert!(result.filtered.is_subtree_of(&result.full));
}

#[test]
fn property_types_are_compared_structurally() {
    let (mut session, reference, candidate) = pair(
        "declare module 'ref' {
            export interface Options { title: string; modal?: boolean }
            export function open(options: Options): void;
        }",
        "declare module 'cand' {
            export function open(options: { modal?: boolean; title: string }): void;
        }",
    );
    let result = compare(&mut session, &reference, &candidate).unwrap();
    assert_eq!(result.full.level_at(&["open"]), Some(SupportLevel::Full));
    assert_eq!(
        result.full.level_at(&["Options", "title"]),
        Some(SupportLevel::None)
    );
}

#[test]
fn trees_from_another_session_are_rejected() {
    let (mut session, reference, _) = pair(
        "declare module 'ref' { export const a: number; }",
        "declare module 'cand' { export const a: number; }",
    );
    let (_, foreign) = alone("declare module 'cand' { export const a: number; }");
    let err = compare(&mut session, &reference, &foreign).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SessionMismatch { .. }));
}

#[test]
fn drift_tracks_presence_across_sessions() {
    let (pinned_session, pinned) = alone(
        "declare module 'api' {
            export function f(a: string): void;
            export function f(a: number): void;
            export function g(): void;
            export const h: number;
            export namespace env { const shell: string; }
        }",
    );
    let (older_session, older) = alone(
        "declare module 'api' {
            export function f(a: string): void;
            export function g(x: string): number;
            export namespace h { const inner: number; }
        }",
    );
    let tree = drift(
        TreeInSession::new(&pinned, &pinned_session),
        TreeInSession::new(&older, &older_session),
    );
    assert_eq!(tree.level_at(&["f"]), Some(SupportLevel::None));
    assert_eq!(tree.level_at(&["g"]), Some(SupportLevel::Full));
    assert_eq!(tree.level_at(&["h"]), Some(SupportLevel::Full));
    assert_eq!(tree.level_at(&["env", "shell"]), Some(SupportLevel::None));
}
