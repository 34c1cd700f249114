//! Checker sessions.
//!
//! A [`Session`] owns every source loaded for one comparison, the binder
//! built over them, and the interned types derived from them. Declaration
//! references and type ids are only meaningful inside the session that
//! produced them; each session carries a process-unique [`SessionId`] so
//! that trees from different sessions can be told apart.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parity_language::{Decl, DeclId, DeclarationFile};

use crate::bind::{Binder, SymbolId};
use crate::relate::Verdict;
use crate::types::{Shape, TypeId, TypeTable};

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// Process-unique session identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl SessionId {
    fn fresh() -> Self {
        Self(NEXT_SESSION.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session {}", self.0)
    }
}

/// Index of a source within its session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(u32);

impl SourceId {
    /// Creates a source id from a raw index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A declaration in a specific source of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeclRef {
    /// The source holding the declaration.
    pub source: SourceId,
    /// The declaration within that source.
    pub decl: DeclId,
}

impl DeclRef {
    /// Creates a declaration reference.
    #[must_use]
    pub const fn new(source: SourceId, decl: DeclId) -> Self {
        Self { source, decl }
    }
}

// =============================================================================
// Options
// =============================================================================

/// Settings that change how types relate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckOptions {
    /// When false, `null` and `undefined` relate to every type.
    pub strict_null_checks: bool,
    /// Maximum structural recursion depth before a check gives up.
    pub max_depth: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            strict_null_checks: true,
            max_depth: 64,
        }
    }
}

impl CheckOptions {
    /// Sets strict null checking.
    #[must_use]
    pub const fn with_strict_null_checks(mut self, strict: bool) -> Self {
        self.strict_null_checks = strict;
        self
    }

    /// Sets the recursion limit.
    #[must_use]
    pub const fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

// =============================================================================
// Session
// =============================================================================

/// A set of bound sources with their types.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    options: CheckOptions,
    pub(crate) sources: Vec<Arc<DeclarationFile>>,
    pub(crate) binder: Binder,
    pub(crate) types: TypeTable,
    /// Expanded shapes of named and static types.
    pub(crate) shapes: HashMap<TypeId, Arc<Shape>>,
    /// Named types whose shape is being expanded.
    pub(crate) expanding: HashSet<TypeId>,
    /// Aliases whose target is being resolved, with their arguments.
    pub(crate) aliasing: HashSet<(SymbolId, Vec<TypeId>)>,
    /// Value declarations whose type is being resolved.
    pub(crate) querying: HashSet<SymbolId>,
    /// Answers to completed top-level relation checks.
    pub(crate) memo: HashMap<(TypeId, TypeId), Verdict>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(CheckOptions::default())
    }
}

impl Session {
    /// Creates an empty session.
    #[must_use]
    pub fn new(options: CheckOptions) -> Self {
        Self {
            id: SessionId::fresh(),
            options,
            sources: Vec::new(),
            binder: Binder::new(),
            types: TypeTable::new(),
            shapes: HashMap::new(),
            expanding: HashSet::new(),
            aliasing: HashSet::new(),
            querying: HashSet::new(),
            memo: HashMap::new(),
        }
    }

    /// Returns this session's identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Returns the relation options.
    #[must_use]
    pub const fn options(&self) -> CheckOptions {
        self.options
    }

    /// Loads a parsed source and binds its declarations.
    ///
    /// Sources added later can merge into symbols declared by earlier ones;
    /// the order only affects which declaration is listed first.
    pub fn add_source(&mut self, file: impl Into<Arc<DeclarationFile>>) -> SourceId {
        let file = file.into();
        let id = SourceId::new(u32::try_from(self.sources.len()).unwrap_or(u32::MAX));
        self.binder.bind_file(id, &file);
        tracing::debug!(
            session = self.id.get(),
            source = %file.path,
            declarations = file.decls.len(),
            "Bound declaration source"
        );
        self.sources.push(file);
        // Cached answers may depend on symbols the new source extends.
        self.shapes.clear();
        self.memo.clear();
        id
    }

    /// Gets a loaded source.
    #[must_use]
    pub fn source(&self, id: SourceId) -> Option<&DeclarationFile> {
        self.sources.get(id.index()).map(AsRef::as_ref)
    }

    /// Returns the ids of every loaded source in load order.
    pub fn source_ids(&self) -> impl Iterator<Item = SourceId> + '_ {
        (0..self.sources.len()).map(|i| SourceId::new(u32::try_from(i).unwrap_or(u32::MAX)))
    }

    /// Gets a declaration.
    #[must_use]
    pub fn decl(&self, decl: DeclRef) -> Option<&Decl> {
        self.source(decl.source)?.get(decl.decl)
    }

    /// Returns the whitespace- and comment-insensitive text of a declaration.
    #[must_use]
    pub fn normalized_text(&self, decl: DeclRef) -> String {
        self.source(decl.source)
            .map(|file| file.normalized_text(decl.decl))
            .unwrap_or_default()
    }

    /// Returns true if the declaration's doc comment marks it as a stub.
    #[must_use]
    pub fn is_stubbed(&self, decl: DeclRef) -> bool {
        self.decl(decl).is_some_and(Decl::is_stubbed)
    }

    /// Returns the binder.
    #[must_use]
    pub const fn binder(&self) -> &Binder {
        &self.binder
    }

    /// Returns the type table.
    #[must_use]
    pub const fn types(&self) -> &TypeTable {
        &self.types
    }

    /// Clones the shared handle of a source so it can be read while the
    /// session is mutated.
    pub(crate) fn file(&self, id: SourceId) -> Option<Arc<DeclarationFile>> {
        self.sources.get(id.index()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use parity_language::parse_file;

    use super::*;

    #[test]
    fn sessions_have_unique_ids() {
        let a = Session::default();
        let b = Session::default();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn sources_get_sequential_ids() {
        let mut session = Session::default();
        let a = session.add_source(parse_file("a.d.ts", "interface A {}").unwrap());
        let b = session.add_source(parse_file("b.d.ts", "interface B {}").unwrap());
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(session.source_ids().count(), 2);
        assert_eq!(session.source(b).unwrap().path, "b.d.ts");
    }

    #[test]
    fn stub_marker_is_visible_through_session() {
        let mut session = Session::default();
        let file = parse_file("a.d.ts", "/** @stubbed */\ndeclare function f(): void;").unwrap();
        let root = file.roots[0];
        let source = session.add_source(file);
        assert!(session.is_stubbed(DeclRef::new(source, root)));
        assert_eq!(
            session.normalized_text(DeclRef::new(source, root)),
            "declarefunctionf():void"
        );
    }

    #[test]
    fn options_builders() {
        let options = CheckOptions::default()
            .with_strict_null_checks(false)
            .with_max_depth(8);
        assert!(!options.strict_null_checks);
        assert_eq!(options.max_depth, 8);
    }
}
