//! Name binding, type resolution, and assignability checking for API
//! declaration sources.
//!
//! This crate provides:
//! - [`Session`] - Loaded sources with their bound symbols and interned types
//! - [`Binder`] - Merged symbol tables across sources
//! - [`Session::relate`] - Structural assignability with a three-valued [`Verdict`]
//! - [`build_tree`] - The name-keyed [`DeclarationTree`] of an API version

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bind;
pub mod builder;
pub mod relate;
mod resolve;
pub mod session;
pub mod tree;
pub mod types;

pub use bind::{Binder, ScopeId, Symbol, SymbolId};
pub use builder::{CONSTRUCTOR_NAME, build_tree};
pub use relate::Verdict;
pub use session::{CheckOptions, DeclRef, Session, SessionId, SourceId};
pub use tree::{Container, ContainerKind, DeclNode, DeclarationTree, Leaf, LeafKind};
pub use types::{Intrinsic, Literal, Shape, Signature, Type, TypeId, TypeTable};
