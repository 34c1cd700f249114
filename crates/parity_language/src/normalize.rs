//! Whitespace- and comment-insensitive declaration text.
//!
//! Two declarations are textually equivalent when their token texts,
//! concatenated with all trivia removed, are identical. This is the fallback
//! comparison when structural checking cannot decide, and the sole comparison
//! for overload sets.

use crate::lexer::Lexer;

/// Returns `source` with all whitespace and comments removed.
#[must_use]
pub fn normalize_source(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for token in Lexer::new(source) {
        if !token.kind.is_trivia() {
            out.push_str(token.text(source));
        }
    }
    out
}

/// Returns true if two source fragments normalize to the same text.
#[must_use]
pub fn equivalent(a: &str, b: &str) -> bool {
    normalize_source(a) == normalize_source(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_whitespace() {
        assert_eq!(
            normalize_source("render( x : number ) :  void"),
            "render(x:number):void"
        );
    }

    #[test]
    fn strips_comments() {
        assert_eq!(
            normalize_source("render(/* inline */ x: number): void // trailing"),
            "render(x:number):void"
        );
    }

    #[test]
    fn keeps_string_contents() {
        assert_eq!(normalize_source("x: 'a b'"), "x:'a b'");
    }

    #[test]
    fn equivalence_ignores_layout() {
        assert!(equivalent("f(a: string): void", "f(\n  a: string\n): void"));
        assert!(!equivalent("f(a: string): void", "f(a: number): void"));
    }
}
