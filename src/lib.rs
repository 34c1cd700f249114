//! Parity - API surface compatibility auditing
//!
//! This crate re-exports all layers of the parity system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: parity_runtime    - Run manifests, logging, serialization, CLI
//! Layer 3: parity_engine     - Classification, drift, aggregation, report rows
//! Layer 2: parity_checker    - Binding, declaration trees, type relation
//! Layer 1: parity_language   - Lexer, parser, declaration syntax tree
//! Layer 0: parity_foundation - Core types (SupportLevel, ComparisonTree, Error)
//! ```

pub use parity_checker as checker;
pub use parity_engine as engine;
pub use parity_foundation as foundation;
pub use parity_language as language;
pub use parity_runtime as runtime;
