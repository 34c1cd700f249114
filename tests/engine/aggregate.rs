//! Integration tests for multi-version aggregation

use parity_engine::{Aggregator, AggregatorOptions, MemoryLoader, VersionSource};
use parity_foundation::{ErrorKind, SupportLevel};

fn loader() -> MemoryLoader {
    MemoryLoader::new()
        .with_source(
            "ref/1.2.d.ts",
            "declare module 'api' {
                export function open(path: string): void;
                export function close(): void;
                export const version: string;
            }",
        )
        .with_source(
            "ref/1.1.d.ts",
            "declare module 'api' {
                export function open(path: string): void;
                export const version: string;
            }",
        )
        .with_source(
            "cand/core.d.ts",
            "declare module 'api' { export function open(path: string): void; }",
        )
        .with_source(
            "cand/extra.d.ts",
            "declare module 'api-extra' {\n  /** @stubbed */\n  export const version: string;\n}",
        )
}

#[test]
fn every_location_of_a_version_contributes() {
    let loader = loader();
    let set = Aggregator::new(&loader)
        .run(
            &VersionSource::new("1.2", ["ref/1.2.d.ts"]),
            &[],
            &[VersionSource::new("next", ["cand/core.d.ts", "cand/extra.d.ts"])],
        )
        .unwrap();
    let full = &set.candidate_platform.get("next").unwrap().full;
    assert_eq!(full.level_at(&["open"]), Some(SupportLevel::Full));
    assert_eq!(full.level_at(&["close"]), Some(SupportLevel::None));
    assert_eq!(full.level_at(&["version"]), Some(SupportLevel::Stubbed));
}

#[test]
fn reference_drift_columns_follow_input_order() {
    let loader = loader();
    let set = Aggregator::new(&loader)
        .run(
            &VersionSource::new("1.2", ["ref/1.2.d.ts"]),
            &[
                VersionSource::new("1.1", ["ref/1.1.d.ts"]),
                VersionSource::new("1.2-again", ["ref/1.2.d.ts"]),
            ],
            &[],
        )
        .unwrap();
    assert_eq!(
        set.reference_platform.labels().collect::<Vec<_>>(),
        vec!["1.1", "1.2-again"]
    );
    let older = set.reference_platform.get("1.1").unwrap();
    assert_eq!(older.level_at(&["close"]), Some(SupportLevel::None));
    assert_eq!(older.level_at(&["open"]), Some(SupportLevel::Full));
    let same = set.reference_platform.get("1.2-again").unwrap();
    assert!(!same.contains_imperfection());
    assert_eq!(set.column_count(), 3);
}

#[test]
fn parallel_runs_report_the_first_failure_in_order() {
    let loader = loader();
    let candidates = [
        VersionSource::new("ok", ["cand/core.d.ts"]),
        VersionSource::new("first-bad", ["missing/a.d.ts"]),
        VersionSource::new("second-bad", ["missing/b.d.ts"]),
    ];
    let err = Aggregator::new(&loader)
        .with_options(AggregatorOptions::default().with_parallel(true))
        .run(&VersionSource::new("1.2", ["ref/1.2.d.ts"]), &[], &candidates)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SourceLoad { .. }));
    assert!(err.to_string().contains("first-bad"));
}
