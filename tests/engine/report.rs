//! Integration tests for report building from real comparisons

use parity_engine::{
    Aggregator, ColumnKind, MemoryLoader, NoNotes, NoteLookup, Notes, Report, RowKind,
    VersionSource,
};
use parity_foundation::SupportLevel;

fn report_with(notes: &dyn NoteLookup) -> Report {
    let loader = MemoryLoader::new()
        .with_source(
            "ref.d.ts",
            "declare module 'api' {
                export class Widget { attach(): void; dispose(): void; }
                export namespace commands { function run(id: string): void; }
                export const version: string;
            }",
        )
        .with_source(
            "cand.d.ts",
            "declare module 'api' {
                export class Widget { attach(): void; }
                export namespace commands { function run(id: string): void; }
            }",
        );
    let set = Aggregator::new(&loader)
        .run(
            &VersionSource::new("2.0", ["ref.d.ts"]),
            &[VersionSource::new("1.0", ["cand.d.ts"])],
            &[VersionSource::new("fork", ["cand.d.ts"])],
        )
        .unwrap();
    Report::build(&set, notes)
}

#[test]
fn columns_and_sections_follow_the_comparison_set() {
    let report = report_with(&Notes::new());
    let kinds: Vec<_> = report.columns().iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ColumnKind::Candidate,
            ColumnKind::PinnedReference,
            ColumnKind::Reference
        ]
    );
    let titles: Vec<_> = report.sections().iter().map(|s| s.title()).collect();
    assert_eq!(titles, vec!["root", "namespace/commands"]);
}

#[test]
fn complex_row_folds_members_in_name_order() {
    let report = report_with(&Notes::new());
    let widget = report.rows().find(|r| r.name() == "Widget").unwrap();
    assert_eq!(widget.kind, RowKind::Complex);
    assert_eq!(
        widget.cells,
        vec![SupportLevel::Partial, SupportLevel::Full, SupportLevel::Partial]
    );
    let dispose = report.rows().find(|r| r.name() == "dispose").unwrap();
    assert_eq!(dispose.kind, RowKind::Simple);
    assert_eq!(
        dispose.cells,
        vec![SupportLevel::None, SupportLevel::Full, SupportLevel::None]
    );
}

#[test]
fn filtered_report_drops_clean_sections() {
    let report = report_with(&Notes::new());
    assert!(report.has_problems());
    let filtered = report.filtered();
    let titles: Vec<_> = filtered.sections().iter().map(|s| s.title()).collect();
    assert_eq!(titles, vec!["root"]);
    assert!(filtered.rows().all(|r| r.name() != "attach"));
}

#[test]
fn notes_are_attached_with_and_without_root_prefix() {
    let notes = Notes::new()
        .with_note("Widget.dispose", "Handled by the host")
        .with_note("root.version", "Reported elsewhere");
    let report = report_with(&notes);
    let note = |name: &str| {
        report
            .rows()
            .find(|r| r.name() == name)
            .and_then(|r| r.note.clone())
    };
    assert_eq!(note("dispose").as_deref(), Some("Handled by the host"));
    assert_eq!(note("version").as_deref(), Some("Reported elsewhere"));
    assert_eq!(note("attach"), None);

    let plain = report_with(&NoNotes);
    assert!(plain.rows().all(|r| r.note.is_none()));
}
