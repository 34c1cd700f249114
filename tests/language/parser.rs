//! Integration tests for the declaration parser

use parity_language::{DeclKind, DeclarationFile, ModuleKind, parse_file, parse_type};

fn parse(source: &str) -> DeclarationFile {
    parse_file("api.d.ts", source).unwrap()
}

#[test]
fn ambient_module_holds_exports() {
    let file = parse(
        "declare module 'vscode' {
            export class Widget { render(): void; }
            export namespace window { export function show(): void; }
        }",
    );
    let module = file.find("vscode").unwrap();
    assert_eq!(
        file.get(module).unwrap().kind,
        DeclKind::Module(ModuleKind::Ambient)
    );
    let names: Vec<_> = file
        .children(module)
        .filter_map(|(_, d)| d.name.clone())
        .collect();
    assert_eq!(names, vec!["Widget", "window"]);
}

#[test]
fn overloads_are_separate_declarations() {
    let file = parse("declare function f(a: string): void;\ndeclare function f(a: number): void;");
    assert_eq!(file.roots.len(), 2);
    assert_ne!(file.normalized_text(file.roots[0]), file.normalized_text(file.roots[1]));
}

#[test]
fn stub_tag_attaches_to_the_next_declaration() {
    let file = parse(
        "declare module 'api' {
            /**
             * Not implemented yet.
             * @stubbed
             */
            export function later(): void;
            export function now(): void;
        }",
    );
    let module = file.find("api").unwrap();
    let later = file.find_child(module, "later").unwrap();
    let now = file.find_child(module, "now").unwrap();
    assert!(file.get(later).unwrap().is_stubbed());
    assert!(!file.get(now).unwrap().is_stubbed());
}

#[test]
fn normalized_text_excludes_doc_comments() {
    let file = parse("/** docs */\ndeclare function f( x : number ) : void;");
    assert_eq!(file.normalized_text(file.roots[0]), "declarefunctionf(x:number):void");
}

#[test]
fn parse_errors_carry_source_and_position() {
    let err = parse_file("broken.d.ts", "declare module 'api' {\n  const x: = 1;\n}").unwrap_err();
    let context = err.context.unwrap();
    assert_eq!(context.source.as_deref(), Some("broken.d.ts"));
    assert_eq!(context.line, Some(2));
}

#[test]
fn complex_types_parse() {
    for source in [
        "Thenable<string | undefined>",
        "(value: T) => U | Thenable<U>",
        "{ readonly [key: string]: number }",
        "readonly [string, number?, ...boolean[]]",
        "T extends string ? 'a' : 'b'",
        "typeof globalThis",
    ] {
        assert!(parse_type(source).is_ok(), "{source}");
    }
}
