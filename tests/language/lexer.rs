//! Integration tests for the lexer and text normalization

use parity_language::{Lexer, TokenKind, equivalent, normalize_source};

fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::tokenize_all(source)
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| !k.is_trivia() && *k != TokenKind::Eof)
        .collect()
}

#[test]
fn nested_type_arguments_close_one_bracket_at_a_time() {
    assert_eq!(
        kinds("Map<string, Array<number>>"),
        vec![
            TokenKind::Ident("Map".into()),
            TokenKind::Lt,
            TokenKind::Ident("string".into()),
            TokenKind::Comma,
            TokenKind::Ident("Array".into()),
            TokenKind::Lt,
            TokenKind::Ident("number".into()),
            TokenKind::Gt,
            TokenKind::Gt,
        ]
    );
}

#[test]
fn doc_comments_are_trivia_with_text() {
    let tokens = Lexer::tokenize_all("/** @stubbed */ x");
    assert!(matches!(&tokens[0].kind, TokenKind::DocComment(text) if text.contains("@stubbed")));
    assert!(tokens[0].kind.is_trivia());
}

#[test]
fn normalization_removes_whitespace_and_comments() {
    assert_eq!(
        normalize_source("render(\n  target: string, // where\n  depth?: number\n): void"),
        "render(target:string,depth?:number):void"
    );
}

#[test]
fn equivalence_ignores_layout_but_not_names() {
    assert!(equivalent("f(a: string): void", "f( a :string ) :void"));
    assert!(!equivalent("f(a: string): void", "f(b: string): void"));
}
