//! A small editor API audited against one candidate and one older reference

use parity::engine::{Aggregator, MemoryLoader, Notes, Report, RowKind, VersionSource};
use parity::foundation::SupportLevel;
use parity::runtime::{RunManifest, Summary, run_with_loader, serialize};

const REFERENCE: &str = "
declare module 'editor' {
    export class Widget {
        constructor(id: string);
        render(target: HTMLElement): void;
        dispose(): void;
    }
    export namespace window {
        function showMessage(text: string, modal?: boolean): Thenable<string>;
        function createPanel(title: string): Widget;
    }
    export type Thenable<T> = PromiseLike<T>;
    export const version: string;
}
";

const OLDER_REFERENCE: &str = "
declare module 'editor' {
    export class Widget {
        constructor(id: string);
        render(target: HTMLElement): void;
    }
    export namespace window {
        function showMessage(text: string): Thenable<string>;
    }
    export type Thenable<T> = PromiseLike<T>;
    export const version: string;
}
";

const CANDIDATE: &str = "
declare module 'editor' {
    export class Widget {
        constructor(name: string);
        render(host: HTMLElement): void;
        /** @stubbed */
        dispose(): void;
    }
    export namespace window {
        function showMessage(text: number): Thenable<string>;
    }
    export type Thenable<T> = PromiseLike<T>;
    export const version: string;
}
";

fn loader() -> MemoryLoader {
    MemoryLoader::new()
        .with_source("editor/2.0.d.ts", REFERENCE)
        .with_source("editor/1.0.d.ts", OLDER_REFERENCE)
        .with_source("fork/main.d.ts", CANDIDATE)
}

#[test]
fn widget_render_across_three_candidates() {
    let loader = MemoryLoader::new()
        .with_source("ref.d.ts", "declare module 'ui' { export class Widget { render(): void; } }")
        .with_source("v1.d.ts", "declare module 'ui' { export class Widget { render(): void; } }")
        .with_source("v2.d.ts", "declare module 'ui' { export class Widget { } }")
        .with_source("v3.d.ts", "declare module 'ui' { export class Widget { render(x: number): void; } }");
    let set = Aggregator::new(&loader)
        .run(
            &VersionSource::new("ref", ["ref.d.ts"]),
            &[],
            &[
                VersionSource::new("v1", ["v1.d.ts"]),
                VersionSource::new("v2", ["v2.d.ts"]),
                VersionSource::new("v3", ["v3.d.ts"]),
            ],
        )
        .unwrap();

    let render = ["Widget", "render"];
    let v1 = set.candidate_platform.get("v1").unwrap();
    assert_eq!(v1.full.level_at(&render), Some(SupportLevel::Full));
    assert!(v1.filtered.is_empty());

    let v2 = set.candidate_platform.get("v2").unwrap();
    assert_eq!(v2.full.level_at(&render), Some(SupportLevel::None));
    assert_eq!(v2.filtered.level_at(&render), Some(SupportLevel::None));

    let v3 = set.candidate_platform.get("v3").unwrap();
    assert_eq!(v3.full.level_at(&render), Some(SupportLevel::Partial));
    assert_eq!(v3.filtered.level_at(&render), Some(SupportLevel::Partial));
}

#[test]
fn candidate_levels_match_expectations() {
    let loader = loader();
    let set = Aggregator::new(&loader)
        .run(
            &VersionSource::new("2.0", ["editor/2.0.d.ts"]),
            &[VersionSource::new("1.0", ["editor/1.0.d.ts"])],
            &[VersionSource::new("fork", ["fork/main.d.ts"])],
        )
        .unwrap();

    let fork = &set.candidate_platform.get("fork").unwrap().full;
    let level = |path: &[&str]| fork.level_at(path);
    assert_eq!(level(&["Widget", "constructor"]), Some(SupportLevel::Full));
    assert_eq!(level(&["Widget", "render"]), Some(SupportLevel::Full));
    assert_eq!(level(&["Widget", "dispose"]), Some(SupportLevel::Stubbed));
    assert_eq!(level(&["window", "showMessage"]), Some(SupportLevel::Partial));
    assert_eq!(level(&["window", "createPanel"]), Some(SupportLevel::None));
    assert_eq!(level(&["Thenable"]), Some(SupportLevel::Full));
    assert_eq!(level(&["version"]), Some(SupportLevel::Full));

    let older = set.reference_platform.get("1.0").unwrap();
    assert_eq!(older.level_at(&["Widget", "dispose"]), Some(SupportLevel::None));
    assert_eq!(older.level_at(&["window", "showMessage"]), Some(SupportLevel::Full));

    let report = Report::build(&set, &Notes::new().with_note("window.createPanel", "Planned"));
    let widget = report.rows().find(|r| r.name() == "Widget").unwrap();
    assert_eq!(widget.kind, RowKind::Complex);
    let panel = report.rows().find(|r| r.name() == "createPanel").unwrap();
    assert_eq!(panel.note.as_deref(), Some("Planned"));
    assert!(report.filtered().rows().all(|r| r.name() != "version"));
}

#[test]
fn manifest_run_produces_a_loadable_set() {
    let manifest = RunManifest::parse_str(
        r#"
        [reference]
        label = "2.0"
        locations = ["editor/2.0.d.ts"]

        [[reference_history]]
        label = "1.0"
        locations = ["editor/1.0.d.ts"]

        [[candidates]]
        label = "fork"
        locations = ["fork/main.d.ts"]

        [options]
        parallel = true

        [notes.Widget]
        _note = "Rendered by the host"
        "#,
    )
    .unwrap();
    let outcome = run_with_loader(&manifest, &loader()).unwrap();

    let json = serialize::to_json(&outcome.set).unwrap();
    assert_eq!(serialize::from_json(&json).unwrap(), outcome.set);

    let widget = outcome.report.rows().find(|r| r.name() == "Widget").unwrap();
    assert_eq!(widget.note.as_deref(), Some("Rendered by the host"));

    let summary = Summary::new(&outcome.report).with_problems(true).to_string();
    assert!(summary.contains("Reference 2.0"));
    assert!(summary.contains("window.showMessage"));
}
