//! Lexer, parser, and declaration syntax tree for API declaration sources.
//!
//! This crate provides:
//! - [`Lexer`] - Tokenization of declaration source text
//! - [`Parser`] - Parsing tokens into a [`DeclarationFile`]
//! - [`DocComment`] - Documentation comments and the `@stubbed` marker
//! - [`normalize_source`] - Whitespace- and comment-insensitive text

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod doc;
pub mod lexer;
pub mod normalize;
pub mod parser;
pub mod span;
pub mod token;

pub use ast::{
    AccessorKind, Decl, DeclId, DeclKind, DeclarationFile, FunctionType, KeywordType, LiteralType,
    Modifiers, ModuleKind, Param, TupleElement, TypeExpr, TypeOperator, TypeParam,
};
pub use doc::{DocComment, DocTag, STUB_TAG};
pub use lexer::Lexer;
pub use normalize::{equivalent, normalize_source};
pub use parser::{Parser, parse_file, parse_type};
pub use span::Span;
pub use token::{Token, TokenKind};
