//! Lexer for declaration sources.
//!
//! The lexer converts source text into a stream of tokens. Comments are
//! kept as trivia tokens so the parser can attach documentation comments to
//! the declarations that follow them.

use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Lexer for declaration source text.
pub struct Lexer<'src> {
    /// Source text being tokenized.
    source: &'src str,
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    column: u32,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let start_line = self.line;
        let start_column = self.column;

        let Some(c) = self.peek_char() else {
            return Token::new(
                TokenKind::Eof,
                Span::new(start, start, start_line, start_column),
            );
        };

        let kind = match c {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '<' => self.single(TokenKind::Lt),
            '>' => self.single(TokenKind::Gt),
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::Semicolon),
            ':' => self.single(TokenKind::Colon),
            '?' => self.single(TokenKind::Question),
            '|' => self.single(TokenKind::Pipe),
            '&' => self.single(TokenKind::Amp),
            '*' => self.single(TokenKind::Star),
            '@' => self.single(TokenKind::At),
            '-' => self.single(TokenKind::Minus),
            '+' => self.single(TokenKind::Plus),
            '!' => self.single(TokenKind::Bang),
            '=' => {
                self.advance();
                if self.peek_char() == Some('>') {
                    self.advance();
                    TokenKind::Arrow
                } else {
                    TokenKind::Eq
                }
            }
            '.' => {
                if self.rest.starts_with("...") {
                    self.advance_n(3);
                    TokenKind::Ellipsis
                } else if self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit()) {
                    self.scan_number()
                } else {
                    self.single(TokenKind::Dot)
                }
            }
            '/' => {
                if self.rest.starts_with("//") {
                    self.scan_line_comment()
                } else if self.rest.starts_with("/*") {
                    self.scan_block_comment()
                } else {
                    self.single(TokenKind::Other('/'))
                }
            }
            '"' | '\'' => self.scan_string(c),
            '`' => self.scan_template(),
            '#' => {
                if self.peek_char_n(1).is_some_and(is_ident_start) {
                    self.advance();
                    let name = self.scan_ident_text();
                    TokenKind::Ident(format!("#{name}"))
                } else {
                    self.single(TokenKind::Other('#'))
                }
            }
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_ident_start(c) => TokenKind::Ident(self.scan_ident_text()),
            '~' | '%' | '^' => self.single(TokenKind::Other(c)),
            c => {
                self.advance();
                TokenKind::Error(format!("unexpected character: {c}"))
            }
        };

        Token::new(
            kind,
            Span::new(start, self.position, start_line, start_column),
        )
    }

    /// Tokenizes all source and returns a vector of tokens.
    ///
    /// Comments are included in the output. The last token is always
    /// [`TokenKind::Eof`].
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Peeks at the character `n` positions ahead.
    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    /// Advances past the next character.
    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    /// Consumes one character and yields `kind`.
    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Skips whitespace, including a leading byte order mark.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() || c == '\u{feff}' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Scans a `//` comment up to (not including) the newline.
    fn scan_line_comment(&mut self) -> TokenKind {
        let start = self.position;
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        TokenKind::LineComment(self.source[start..self.position].to_string())
    }

    /// Scans a `/* */` or `/** */` comment.
    fn scan_block_comment(&mut self) -> TokenKind {
        let start = self.position;
        self.advance_n(2);
        loop {
            if self.rest.starts_with("*/") {
                self.advance_n(2);
                break;
            }
            if self.rest.is_empty() {
                return TokenKind::Error("unterminated block comment".into());
            }
            self.advance();
        }
        let text = &self.source[start..self.position];
        // `/**/` is an empty plain comment, not documentation.
        if text.starts_with("/**") && text.len() > 4 {
            TokenKind::DocComment(text.to_string())
        } else {
            TokenKind::BlockComment(text.to_string())
        }
    }

    /// Scans a string literal delimited by `quote`.
    fn scan_string(&mut self, quote: char) -> TokenKind {
        self.advance(); // consume opening quote
        let mut text = String::new();
        loop {
            match self.peek_char() {
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek_char() {
                        Some('n') => text.push('\n'),
                        Some('r') => text.push('\r'),
                        Some('t') => text.push('\t'),
                        Some('0') => text.push('\0'),
                        // Line continuation
                        Some('\n') => {}
                        Some(c) => text.push(c),
                        None => {
                            return TokenKind::Error(
                                "unexpected end of input in string escape".into(),
                            );
                        }
                    }
                    self.advance();
                }
                Some('\n') | None => {
                    return TokenKind::Error("unterminated string literal".into());
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
            }
        }
        TokenKind::String(text)
    }

    /// Scans a template literal, including nested `${ }` substitutions.
    fn scan_template(&mut self) -> TokenKind {
        let start = self.position;
        self.advance(); // consume opening backtick
        let mut depth = 0usize;
        loop {
            match self.peek_char() {
                None => return TokenKind::Error("unterminated template literal".into()),
                Some('\\') => {
                    self.advance_n(2);
                }
                Some('`') if depth == 0 => {
                    self.advance();
                    break;
                }
                Some('$') if self.peek_char_n(1) == Some('{') => {
                    depth += 1;
                    self.advance_n(2);
                }
                Some('}') if depth > 0 => {
                    depth -= 1;
                    self.advance();
                }
                Some(_) => self.advance(),
            }
        }
        TokenKind::Template(self.source[start..self.position].to_string())
    }

    /// Scans a numeric literal: decimal, hex/octal/binary, exponent, bigint.
    fn scan_number(&mut self) -> TokenKind {
        let start = self.position;

        if self.peek_char() == Some('0')
            && matches!(self.peek_char_n(1), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B'))
        {
            self.advance_n(2);
            while self
                .peek_char()
                .is_some_and(|c| c.is_ascii_hexdigit() || c == '_')
            {
                self.advance();
            }
        } else {
            let mut has_dot = false;
            while let Some(c) = self.peek_char() {
                if c.is_ascii_digit() || c == '_' {
                    self.advance();
                } else if c == '.' && !has_dot {
                    has_dot = true;
                    self.advance();
                } else if matches!(c, 'e' | 'E') {
                    self.advance();
                    if matches!(self.peek_char(), Some('+' | '-')) {
                        self.advance();
                    }
                } else {
                    break;
                }
            }
        }

        if self.peek_char() == Some('n') {
            self.advance();
        }

        TokenKind::Number(self.source[start..self.position].to_string())
    }

    /// Scans identifier text.
    fn scan_ident_text(&mut self) -> String {
        let start = self.position;
        while let Some(c) = self.peek_char() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }
        self.source[start..self.position].to_string()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

/// Returns true if `c` can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// Returns true if `c` can continue an identifier.
fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '\u{200c}' || c == '\u{200d}'
}
