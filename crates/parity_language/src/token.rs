//! Token types for declaration sources.
//!
//! Tokens are the output of the lexer and input to the parser. Keywords are
//! not distinguished from identifiers here: declaration files use most of
//! them contextually (`get`, `type`, `module`, `readonly` are all valid
//! member names), so the parser decides.

use crate::span::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the text this token covers in the given source.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.text(source)
    }

    /// Returns true if this token is an opening delimiter.
    #[must_use]
    pub const fn is_open_delimiter(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace
        )
    }

    /// Returns true if this token is a closing delimiter.
    #[must_use]
    pub const fn is_close_delimiter(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace
        )
    }

    /// Returns the identifier text if this is an identifier.
    #[must_use]
    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }
}

/// Token types for declaration sources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    // Delimiters
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `<`
    Lt,
    /// `>`, always a single character so nested type arguments close cleanly
    Gt,

    // Punctuation
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// `...`
    Ellipsis,
    /// `?`
    Question,
    /// `=`
    Eq,
    /// `=>`
    Arrow,
    /// `|`
    Pipe,
    /// `&`
    Amp,
    /// `*`
    Star,
    /// `@`
    At,
    /// `-`
    Minus,
    /// `+`
    Plus,
    /// `!`
    Bang,
    /// Any other operator character
    Other(char),

    // Literals
    /// Identifier or contextual keyword, including `#private` names
    Ident(String),
    /// String literal with its quotes removed and escapes resolved
    String(String),
    /// Numeric literal text, as written
    Number(String),
    /// Template literal text, including the backticks
    Template(String),

    // Meta
    /// `// ...` comment
    LineComment(String),
    /// `/* ... */` comment
    BlockComment(String),
    /// `/** ... */` documentation comment
    DocComment(String),
    /// End of input
    Eof,
    /// Lexer error
    Error(String),
}

impl TokenKind {
    /// Returns true if this token kind should be ignored during parsing.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(
            self,
            Self::LineComment(_) | Self::BlockComment(_) | Self::DocComment(_)
        )
    }

    /// Returns true if this token can begin a member or property name.
    #[must_use]
    pub const fn starts_property_name(&self) -> bool {
        matches!(
            self,
            Self::Ident(_) | Self::String(_) | Self::Number(_) | Self::LBracket
        )
    }

    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Lt => "'<'",
            Self::Gt => "'>'",
            Self::Comma => "','",
            Self::Semicolon => "';'",
            Self::Colon => "':'",
            Self::Dot => "'.'",
            Self::Ellipsis => "'...'",
            Self::Question => "'?'",
            Self::Eq => "'='",
            Self::Arrow => "'=>'",
            Self::Pipe => "'|'",
            Self::Amp => "'&'",
            Self::Star => "'*'",
            Self::At => "'@'",
            Self::Minus => "'-'",
            Self::Plus => "'+'",
            Self::Bang => "'!'",
            Self::Other(_) => "operator",
            Self::Ident(_) => "identifier",
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Template(_) => "template literal",
            Self::LineComment(_) | Self::BlockComment(_) => "comment",
            Self::DocComment(_) => "doc comment",
            Self::Eof => "end of input",
            Self::Error(_) => "error",
        }
    }
}
