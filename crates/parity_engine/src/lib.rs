//! Compatibility classification and multi-version aggregation for parity.
//!
//! This crate provides:
//! - [`compare`] - Classifies a candidate declaration tree against a reference
//! - [`drift`] - Presence of pinned reference symbols in another reference version
//! - [`Aggregator`] - Runs the whole version matrix, one session per comparison
//! - [`Report`] - Sections, rows, and aggregate columns for rendering
//! - [`Notes`] - Human-authored notes looked up by symbol path

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod aggregate;
pub mod compare;
pub mod notes;
pub mod presence;
pub mod report;

pub use aggregate::{
    Aggregator, AggregatorOptions, FsLoader, MemoryLoader, SourceLoader, VersionSource,
};
pub use compare::{classify_leaf, compare};
pub use notes::{NoNotes, NoteLookup, Notes, ROOT_SEGMENT};
pub use presence::{TreeInSession, drift};
pub use report::{Column, ColumnKind, Report, Row, RowKind, Section};
