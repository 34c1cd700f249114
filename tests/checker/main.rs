//! Integration tests for Layer 2: Checker
//!
//! Tests for sessions, declaration trees, and the assignability relation.

mod builder;
mod relate;
