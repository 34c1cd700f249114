//! Integration tests for Layer 0: Foundation
//!
//! Tests for support levels, the column merge, comparison trees, and errors.

mod comparison;
mod errors;
mod support;
