//! Core types for parity.
//!
//! This crate provides:
//! - [`Error`] - Rich error types with context
//! - [`SupportLevel`] - The `None < Stubbed < Partial < Full` classification
//! - [`ColumnAccumulator`] - The order-dependent column merge fold
//! - [`ComparisonTree`] - Name-keyed trees of support levels
//! - [`VersionComparisonSet`] - Per-version results of one aggregation run

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod comparison;
pub mod error;
pub mod support;
pub mod versions;

pub use comparison::{ComparisonNode, ComparisonTree, FullAndFilteredComparisons};
pub use error::{Error, ErrorContext, ErrorKind};
pub use support::{ColumnAccumulator, SupportLevel};
pub use versions::{VersionComparisonSet, VersionMap};

/// Result type for parity operations.
pub type Result<T> = std::result::Result<T, Error>;
