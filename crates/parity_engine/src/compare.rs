//! Reference-versus-candidate classification.
//!
//! [`compare`] walks a reference tree top-down and classifies every key
//! against the same-named entry of a candidate tree:
//!
//! 1. a reference leaf with no candidate entry is `None`;
//! 2. a reference leaf whose candidate is a container is `Partial`;
//! 3. two leaves are `Stubbed` if the candidate is marked as a stub, else
//!    overload sets compare by normalized text and single declarations by
//!    mutual assignability (falling back to text when the oracle cannot
//!    decide);
//! 4. a reference container recurses into the candidate's container, or
//!    into an empty one when there is none.
//!
//! Both trees must come from the session passed in: type identities are
//! not comparable across sessions.

use std::collections::BTreeSet;

use parity_checker::{Container, DeclNode, DeclarationTree, Leaf, Session, Verdict};
use parity_foundation::{ComparisonTree, Error, FullAndFilteredComparisons, Result, SupportLevel};

/// Classifies every symbol of `reference` against `candidate`.
///
/// The `full` tree has exactly the keys of `reference` at every depth;
/// `filtered` keeps the branches holding at least one non-`Full` entry.
///
/// # Errors
///
/// Returns [`parity_foundation::ErrorKind::SessionMismatch`] if either tree
/// was built in a different session.
pub fn compare(
    session: &mut Session,
    reference: &DeclarationTree,
    candidate: &DeclarationTree,
) -> Result<FullAndFilteredComparisons> {
    for tree in [reference, candidate] {
        if tree.session() != session.id() {
            return Err(Error::session_mismatch(
                session.id().get(),
                tree.session().get(),
            ));
        }
    }

    let full = compare_containers(session, reference.root(), Some(candidate.root()));
    let result = FullAndFilteredComparisons::from_full(full);
    tracing::debug!(
        session = session.id().get(),
        symbols = reference.leaf_count(),
        imperfect = result.filtered.leaves().len(),
        "Compared declaration trees"
    );
    Ok(result)
}

fn compare_containers(
    session: &mut Session,
    reference: &Container,
    candidate: Option<&Container>,
) -> ComparisonTree {
    let mut out = ComparisonTree::new();
    for (name, node) in reference.children() {
        let counterpart = candidate.and_then(|c| c.get(name));
        match node {
            DeclNode::Container(inner) => {
                let candidate_inner = counterpart.and_then(DeclNode::as_container);
                out.insert(name, compare_containers(session, inner, candidate_inner));
            }
            DeclNode::Leaf(leaf) => {
                let level = match counterpart {
                    None => SupportLevel::None,
                    Some(DeclNode::Container(_)) => SupportLevel::Partial,
                    Some(DeclNode::Leaf(other)) => classify_leaf(session, leaf, other),
                };
                out.insert(name, level);
            }
        }
    }
    out
}

/// Classifies a reference leaf against a present candidate leaf.
#[must_use]
pub fn classify_leaf(session: &mut Session, reference: &Leaf, candidate: &Leaf) -> SupportLevel {
    if candidate.is_stubbed(session) {
        return SupportLevel::Stubbed;
    }

    if reference.is_merged() || candidate.is_merged() {
        let expected: BTreeSet<String> = reference.normalized_texts(session).into_iter().collect();
        let actual: BTreeSet<String> = candidate.normalized_texts(session).into_iter().collect();
        return if expected == actual {
            SupportLevel::Full
        } else {
            SupportLevel::Partial
        };
    }

    let compatible = match session.relate_mutual(reference.ty, candidate.ty) {
        Verdict::Related => true,
        Verdict::Unrelated => false,
        Verdict::Undecidable => {
            reference.normalized_texts(session) == candidate.normalized_texts(session)
        }
    };
    if compatible {
        SupportLevel::Full
    } else {
        SupportLevel::Partial
    }
}

#[cfg(test)]
mod tests {
    use parity_checker::{SourceId, build_tree};
    use parity_language::parse_file;

    use super::*;

    fn session_with(sources: &[&str]) -> (Session, Vec<SourceId>) {
        let mut session = Session::default();
        let ids = sources
            .iter()
            .enumerate()
            .map(|(i, text)| session.add_source(parse_file(format!("{i}.d.ts"), text).unwrap()))
            .collect();
        (session, ids)
    }

    fn run(reference: &str, candidate: &str) -> FullAndFilteredComparisons {
        let (mut session, ids) = session_with(&[reference, candidate]);
        let reference = build_tree(&mut session, &ids[..1]).unwrap();
        let candidate = build_tree(&mut session, &ids[1..]).unwrap();
        compare(&mut session, &reference, &candidate).unwrap()
    }

    #[test]
    fn missing_symbol_is_none() {
        let result = run(
            "declare module 'ref' { export function f(): void; }",
            "declare module 'cand' { }",
        );
        assert_eq!(result.full.level_at(&["f"]), Some(SupportLevel::None));
        assert_eq!(result.filtered.level_at(&["f"]), Some(SupportLevel::None));
    }

    #[test]
    fn leaf_against_container_is_partial() {
        let result = run(
            "declare module 'ref' { export const thing: number; }",
            "declare module 'cand' { export namespace thing { const x: number; } }",
        );
        assert_eq!(result.full.level_at(&["thing"]), Some(SupportLevel::Partial));
    }

    #[test]
    fn compatible_signature_is_full() {
        let result = run(
            "declare module 'ref' { export function f(a: string): number; }",
            "declare module 'cand' { export function f(b: string): number; }",
        );
        assert_eq!(result.full.level_at(&["f"]), Some(SupportLevel::Full));
        assert!(result.filtered.is_empty());
    }

    #[test]
    fn unexpanded_base_arguments_still_count() {
        let result = run(
            "declare module 'ref' { export interface Thenable<T> extends PromiseLike<T> {} export function f(): Thenable<string>; }",
            "declare module 'cand' { export interface Thenable<T> extends PromiseLike<T> {} export function f(): Thenable<number>; }",
        );
        assert_eq!(result.full.level_at(&["f"]), Some(SupportLevel::Partial));

        let result = run(
            "declare module 'ref' { export interface Thenable<T> extends PromiseLike<T> {} export function f(): Thenable<string>; }",
            "declare module 'cand' { export interface Thenable<T> extends PromiseLike<T> {} export function f(): Thenable<string>; }",
        );
        assert_eq!(result.full.level_at(&["f"]), Some(SupportLevel::Full));
    }

    #[test]
    fn dropped_unexpanded_base_falls_back_to_text() {
        let result = run(
            "declare module 'ref' { export class E extends Error { code: string; } export function f(a: string): E; }",
            "declare module 'cand' { export class E { code: string; } export function f(b: string): E; }",
        );
        assert_eq!(result.full.level_at(&["f"]), Some(SupportLevel::Partial));
        assert_eq!(result.full.level_at(&["E", "code"]), Some(SupportLevel::Full));
    }

    #[test]
    fn incompatible_signature_is_partial() {
        let result = run(
            "declare module 'ref' { export function f(a: string): number; }",
            "declare module 'cand' { export function f(a: number): number; }",
        );
        assert_eq!(result.full.level_at(&["f"]), Some(SupportLevel::Partial));
    }

    #[test]
    fn stub_marker_wins_over_shape() {
        let result = run(
            "declare module 'ref' { export function f(a: string): number; }",
            "declare module 'cand' {\n  /** @stubbed */\n  export function f(): string;\n}",
        );
        assert_eq!(result.full.level_at(&["f"]), Some(SupportLevel::Stubbed));
    }

    #[test]
    fn overload_sets_compare_by_text() {
        let same = run(
            "declare module 'ref' { function f(a: string): void; function f(a: number): void; }",
            "declare module 'cand' { function f(a: number): void; function f(a: string): void; }",
        );
        assert_eq!(same.full.level_at(&["f"]), Some(SupportLevel::Full));

        let fewer = run(
            "declare module 'ref' { function f(a: string): void; function f(a: number): void; }",
            "declare module 'cand' { function f(a: string): void; }",
        );
        assert_eq!(fewer.full.level_at(&["f"]), Some(SupportLevel::Partial));
    }

    #[test]
    fn undecidable_types_fall_back_to_text() {
        let same = run(
            "declare module 'ref' { export const x: keyof Foo; }",
            "declare module 'cand' { export const x: keyof Foo; }",
        );
        assert_eq!(same.full.level_at(&["x"]), Some(SupportLevel::Full));

        let different = run(
            "declare module 'ref' { export const x: keyof Foo; }",
            "declare module 'cand' { export const x: keyof Bar; }",
        );
        assert_eq!(different.full.level_at(&["x"]), Some(SupportLevel::Partial));
    }

    #[test]
    fn missing_container_classifies_children_as_none() {
        let result = run(
            "declare module 'ref' { export class Widget { render(): void; dispose(): void; } }",
            "declare module 'cand' { }",
        );
        assert_eq!(result.full.level_at(&["Widget", "render"]), Some(SupportLevel::None));
        assert_eq!(result.full.level_at(&["Widget", "dispose"]), Some(SupportLevel::None));
    }

    #[test]
    fn empty_container_is_never_filtered() {
        let result = run(
            "declare module 'ref' { export interface Marker {} }",
            "declare module 'cand' { }",
        );
        assert!(result.full.lookup(&["Marker"]).unwrap().as_tree().unwrap().is_empty());
        assert!(result.filtered.is_empty());
    }

    #[test]
    fn extra_candidate_symbols_are_ignored() {
        let result = run(
            "declare module 'ref' { export function f(): void; }",
            "declare module 'cand' { export function f(): void; export function g(): void; }",
        );
        assert_eq!(result.full.len(), 1);
    }

    #[test]
    fn trees_from_another_session_are_rejected() {
        let (mut first, ids) = session_with(&["declare module 'a' { function f(): void; }"]);
        let tree = build_tree(&mut first, &ids).unwrap();
        let (mut second, ids) = session_with(&["declare module 'b' { function f(): void; }"]);
        let other = build_tree(&mut second, &ids).unwrap();

        let err = compare(&mut second, &tree, &other).unwrap_err();
        assert!(matches!(
            err.kind,
            parity_foundation::ErrorKind::SessionMismatch { .. }
        ));
    }

    // =========================================================================
    // Properties
    // =========================================================================

    mod properties {
        use proptest::prelude::*;

        use super::*;

        /// How a candidate renders one reference function.
        #[derive(Clone, Copy, Debug)]
        enum Rendition {
            Same,
            Missing,
            Incompatible,
            Stubbed,
        }

        impl Rendition {
            fn declaration(self, name: &str) -> String {
                match self {
                    Self::Same => format!("export function {name}(a: string): number;\n"),
                    Self::Missing => String::new(),
                    Self::Incompatible => format!("export function {name}(a: number): number;\n"),
                    Self::Stubbed => {
                        format!("/** @stubbed */\nexport function {name}(a: string): number;\n")
                    }
                }
            }

            const fn level(self) -> SupportLevel {
                match self {
                    Self::Same => SupportLevel::Full,
                    Self::Missing => SupportLevel::None,
                    Self::Incompatible => SupportLevel::Partial,
                    Self::Stubbed => SupportLevel::Stubbed,
                }
            }
        }

        fn rendition() -> impl Strategy<Value = Rendition> {
            prop_oneof![
                Just(Rendition::Same),
                Just(Rendition::Missing),
                Just(Rendition::Incompatible),
                Just(Rendition::Stubbed),
            ]
        }

        proptest! {
            #[test]
            fn filtered_holds_exactly_the_non_full_leaves(
                renditions in prop::collection::vec(rendition(), 1..8)
            ) {
                let mut reference = String::from("declare module 'ref' {\n");
                let mut candidate = String::from("declare module 'cand' {\n");
                for (i, rendition) in renditions.iter().enumerate() {
                    let name = format!("f{i}");
                    reference.push_str(&Rendition::Same.declaration(&name));
                    candidate.push_str(&rendition.declaration(&name));
                }
                reference.push('}');
                candidate.push('}');

                let result = run(&reference, &candidate);
                prop_assert_eq!(result.full.len(), renditions.len());
                for (i, rendition) in renditions.iter().enumerate() {
                    let name = format!("f{i}");
                    prop_assert_eq!(result.full.level_at(&[&name]), Some(rendition.level()));
                    let filtered = result.filtered.level_at(&[&name]);
                    if rendition.level() == SupportLevel::Full {
                        prop_assert_eq!(filtered, Option::<SupportLevel>::None);
                    } else {
                        prop_assert_eq!(filtered, Some(rendition.level()));
                    }
                }
            }
        }
    }
}
