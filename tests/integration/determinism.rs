//! Results must not depend on declaration order within a source

use parity::checker::{Session, build_tree};
use parity::engine::compare;
use parity::foundation::ComparisonTree;
use parity::language::parse_file;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

const MEMBERS: &[&str] = &[
    "export interface Options { title: string; modal?: boolean }",
    "export function open(options: Options): void;",
    "export function open(path: string): void;",
    "export function close(): void;",
    "export const version: string;",
    "export type Handler = (options: Options) => boolean;",
    "export enum Level { Low, High }",
    "export class Panel { constructor(title: string); show(): void; hide(): void; }",
    "export namespace commands { function run(id: string, ...args: unknown[]): unknown; }",
];

const CANDIDATE_MEMBERS: &[&str] = &[
    "export function open(path: string): void;",
    "export const version: number;",
    "export type Handler = (options: { title: string }) => boolean;",
    "export class Panel { constructor(title: string); show(): void; }",
    "/** @stubbed */\nexport function close(): void;",
    "export namespace commands { function run(id: string): unknown; }",
];

fn module(members: &[&str]) -> String {
    format!("declare module 'api' {{\n{}\n}}", members.join("\n"))
}

fn classify(reference: &[&str], candidate: &[&str]) -> ComparisonTree {
    let mut session = Session::default();
    let r = session.add_source(parse_file("reference.d.ts", &module(reference)).unwrap());
    let c = session.add_source(parse_file("candidate.d.ts", &module(candidate)).unwrap());
    let reference = build_tree(&mut session, &[r]).unwrap();
    let candidate = build_tree(&mut session, &[c]).unwrap();
    compare(&mut session, &reference, &candidate).unwrap().full
}

#[test]
fn shuffled_declarations_classify_identically() {
    let expected = classify(MEMBERS, CANDIDATE_MEMBERS);
    for seed in 0..16 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut reference = MEMBERS.to_vec();
        let mut candidate = CANDIDATE_MEMBERS.to_vec();
        reference.shuffle(&mut rng);
        candidate.shuffle(&mut rng);
        assert_eq!(
            classify(&reference, &candidate),
            expected,
            "seed {seed} changed the classification"
        );
    }
}

#[test]
fn repeated_runs_are_identical() {
    let first = classify(MEMBERS, CANDIDATE_MEMBERS);
    let second = classify(MEMBERS, CANDIDATE_MEMBERS);
    assert_eq!(first, second);
    assert!(first.contains_imperfection());
}
