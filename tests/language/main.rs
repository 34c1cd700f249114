//! Integration tests for Layer 1: Language
//!
//! Tests for the lexer, the declaration parser, doc tags, and normalization.

mod lexer;
mod parser;
