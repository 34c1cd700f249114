//! Properties of classification that hold for any pair of trees

use parity::checker::{DeclarationTree, Session, build_tree};
use parity::engine::{TreeInSession, compare, drift};
use parity::foundation::{FullAndFilteredComparisons, SupportLevel};
use parity::language::parse_file;

const API: &str = "
declare module 'api' {
    export interface Point { x: number; y: number }
    export class Canvas {
        constructor(width: number, height: number);
        readonly size: Point;
        draw(points: Point[]): void;
        clear(): void;
        get context(): unknown;
    }
    export namespace input {
        function on(event: 'down', listener: (p: Point) => void): void;
        function on(event: 'up', listener: (p: Point) => void): void;
        const pressed: ReadonlyArray<string>;
    }
    export type Listener = (p: Point) => void;
    export type Keys = keyof Point;
    export enum Mode { Draw, Erase }
    export function createCanvas(options?: { width?: number }): Canvas;
}
";

/// Compares `reference` with the candidate built from `candidates`, all
/// loaded into one session in order.
fn compare_texts(reference: &str, candidates: &[&str]) -> FullAndFilteredComparisons {
    let mut session = Session::default();
    let r = session.add_source(parse_file("reference.d.ts", reference).unwrap());
    let ids: Vec<_> = candidates
        .iter()
        .enumerate()
        .map(|(i, text)| session.add_source(parse_file(format!("candidate{i}.d.ts"), text).unwrap()))
        .collect();
    let reference = build_tree(&mut session, &[r]).unwrap();
    let candidate = build_tree(&mut session, &ids).unwrap();
    compare(&mut session, &reference, &candidate).unwrap()
}

fn alone(text: &str) -> (Session, DeclarationTree) {
    let mut session = Session::default();
    let id = session.add_source(parse_file("api.d.ts", text).unwrap());
    let tree = build_tree(&mut session, &[id]).unwrap();
    (session, tree)
}

#[test]
fn comparing_an_api_with_itself_is_all_full() {
    let result = compare_texts(API, &[API]);
    assert!(!result.full.is_empty());
    assert!(!result.full.contains_imperfection());
    assert!(result.filtered.is_empty());
}

#[test]
fn full_tree_has_the_shape_of_the_reference() {
    let (session, reference) = alone(API);
    let shape = drift(
        TreeInSession::new(&reference, &session),
        TreeInSession::new(&reference, &session),
    );
    for candidate in [
        "declare module 'api' { }",
        "declare module 'api' { export namespace input { const extra: number; } export const other: string; }",
        "declare module 'api' { export const Canvas: number; export namespace Point { const x: number; } }",
        API,
    ] {
        let result = compare_texts(API, &[candidate]);
        assert!(result.full.same_shape(&shape), "shape differs for {candidate}");
        assert!(result.filtered.is_subtree_of(&result.full));
    }
}

#[test]
fn overload_order_does_not_matter() {
    let reference = "declare module 'api' {
        export function on(event: 'down'): void;
        export function on(event: 'up'): void;
    }";
    let reversed = "declare module 'api' {
        export function on(event: 'up'): void;
        export function on(event: 'down'): void;
    }";
    let partial = "declare module 'api' { export function on(event: 'up'): void; }";

    assert_eq!(
        compare_texts(reference, &[reversed]).full.level_at(&["on"]),
        Some(SupportLevel::Full)
    );
    assert_eq!(
        compare_texts(reversed, &[reference]).full.level_at(&["on"]),
        Some(SupportLevel::Full)
    );
    assert_eq!(
        compare_texts(reference, &[partial]).full.level_at(&["on"]),
        Some(SupportLevel::Partial)
    );
}

#[test]
fn stub_marker_takes_precedence() {
    let reference = "declare module 'api' {
        export function f(a: string): void;
        export function g(a: string): void;
        export function g(a: number): void;
    }";
    let candidate = "declare module 'api' {
        /** @stubbed */
        export function f(a: number, b: number): string;
        /** @stubbed */
        export function g(a: string): void;
    }";
    let result = compare_texts(reference, &[candidate]);
    assert_eq!(result.full.level_at(&["f"]), Some(SupportLevel::Stubbed));
    assert_eq!(result.full.level_at(&["g"]), Some(SupportLevel::Stubbed));
}

#[test]
fn candidate_source_order_does_not_change_levels() {
    let core = "declare module 'api' {
        export class Canvas { constructor(width: number, height: number); clear(): void; }
        export interface Point { x: number; y: number }
    }";
    let extra = "declare module 'api-extra' {
        export namespace input { const pressed: ReadonlyArray<string>; }
        export function createCanvas(options?: { width?: number }): Canvas;
    }";
    let forward = compare_texts(API, &[core, extra]);
    let backward = compare_texts(API, &[extra, core]);
    assert_eq!(forward, backward);
    assert_eq!(
        forward.full.level_at(&["input", "pressed"]),
        Some(SupportLevel::Full)
    );
    assert_eq!(
        forward.full.level_at(&["Canvas", "draw"]),
        Some(SupportLevel::None)
    );
}
