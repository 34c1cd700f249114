//! Declaration tree construction.
//!
//! Building walks each listed source in order and files every named
//! declaration under its path:
//!
//! - Modules, classes, and interfaces become containers, except that the
//!   first container met in each source is transparent: its members are
//!   filed directly under the enclosing node. This lets the single ambient
//!   module wrapping an API surface disappear from every path.
//! - Functions, methods, properties, accessors, variables, type aliases,
//!   enums, and constructors become leaves. Same-named leaves merge, in
//!   source order; a constructor is filed as `constructor`.
//! - When a name is claimed by both a container and a leaf, the container
//!   wins.
//! - Every other declaration kind is transparent.
//!
//! Leaf types are resolved once the whole tree is known.

use std::collections::BTreeMap;

use parity_foundation::{Error, ErrorKind, Result};
use parity_language::{DeclId, DeclKind, DeclarationFile};

use crate::session::{DeclRef, Session, SourceId};
use crate::tree::{Container, ContainerKind, DeclNode, DeclarationTree, Leaf, LeafKind};

/// Name under which constructors are filed.
pub const CONSTRUCTOR_NAME: &str = "constructor";

enum Pending {
    Leaf { kind: LeafKind, decls: Vec<DeclRef> },
    Container(PendingContainer),
}

struct PendingContainer {
    kind: ContainerKind,
    decls: Vec<DeclRef>,
    children: BTreeMap<String, Pending>,
}

impl PendingContainer {
    fn new(kind: ContainerKind) -> Self {
        Self {
            kind,
            decls: Vec::new(),
            children: BTreeMap::new(),
        }
    }
}

/// Builds the declaration tree of `sources`, in the given order.
///
/// # Errors
///
/// Returns an error if a source id does not belong to `session`.
pub fn build_tree(session: &mut Session, sources: &[SourceId]) -> Result<DeclarationTree> {
    let mut root = PendingContainer::new(ContainerKind::Module);

    for &source in sources {
        let file = session.file(source).ok_or_else(|| {
            Error::new(ErrorKind::Internal(format!(
                "source {} is not loaded in {}",
                source.index(),
                session.id()
            )))
        })?;
        let mut walker = Walker {
            source,
            file: &file,
            seen_container: false,
        };
        walker.walk(&file.roots, &mut root);
    }

    let root = finish_container(session, root);
    let tree = DeclarationTree::new(session.id(), root);
    tracing::debug!(
        session = session.id().get(),
        sources = sources.len(),
        leaves = tree.leaf_count(),
        "Built declaration tree"
    );
    Ok(tree)
}

struct Walker<'f> {
    source: SourceId,
    file: &'f DeclarationFile,
    seen_container: bool,
}

impl Walker<'_> {
    fn walk(&mut self, ids: &[DeclId], target: &mut PendingContainer) {
        let file = self.file;
        for &id in ids {
            let Some(decl) = file.get(id) else {
                continue;
            };
            let decl_ref = DeclRef::new(self.source, id);

            if let Some(kind) = container_kind(decl.kind) {
                if !self.seen_container {
                    self.seen_container = true;
                    self.walk(&decl.children, target);
                    continue;
                }
                let Some(name) = decl.name.clone() else {
                    tracing::debug!(
                        source = %file.path,
                        kind = decl.kind.name(),
                        "Skipping declaration without a name"
                    );
                    continue;
                };
                let entry = target
                    .children
                    .entry(name)
                    .or_insert_with(|| Pending::Container(PendingContainer::new(kind)));
                if matches!(entry, Pending::Leaf { .. }) {
                    *entry = Pending::Container(PendingContainer::new(kind));
                }
                if let Pending::Container(container) = entry {
                    container.decls.push(decl_ref);
                    self.walk(&decl.children, container);
                }
                continue;
            }

            let Some(kind) = leaf_kind(decl.kind) else {
                continue;
            };
            let name = match (&decl.name, kind) {
                (_, LeafKind::Constructor) => CONSTRUCTOR_NAME.to_string(),
                (Some(name), _) => name.clone(),
                (None, _) => {
                    tracing::debug!(
                        source = %file.path,
                        kind = decl.kind.name(),
                        "Skipping declaration without a name"
                    );
                    continue;
                }
            };
            match target
                .children
                .entry(name)
                .or_insert_with(|| Pending::Leaf {
                    kind,
                    decls: Vec::new(),
                }) {
                Pending::Leaf { decls, .. } => decls.push(decl_ref),
                Pending::Container(_) => {}
            }
        }
    }
}

const fn container_kind(kind: DeclKind) -> Option<ContainerKind> {
    match kind {
        DeclKind::Module(_) => Some(ContainerKind::Module),
        DeclKind::Class => Some(ContainerKind::Class),
        DeclKind::Interface => Some(ContainerKind::Interface),
        _ => None,
    }
}

const fn leaf_kind(kind: DeclKind) -> Option<LeafKind> {
    match kind {
        DeclKind::Function => Some(LeafKind::Function),
        DeclKind::Method => Some(LeafKind::Method),
        DeclKind::Property => Some(LeafKind::Property),
        DeclKind::Accessor(_) => Some(LeafKind::Accessor),
        DeclKind::Variable => Some(LeafKind::Variable),
        DeclKind::TypeAlias => Some(LeafKind::TypeAlias),
        DeclKind::Enum => Some(LeafKind::Enum),
        DeclKind::Constructor => Some(LeafKind::Constructor),
        _ => None,
    }
}

fn finish_container(session: &mut Session, pending: PendingContainer) -> Container {
    let mut container = Container::new(pending.kind);
    container.decls = pending.decls;
    for (name, child) in pending.children {
        let node = match child {
            Pending::Leaf { kind, decls } => {
                let ty = session.type_of_decls(&decls);
                DeclNode::Leaf(Leaf { kind, decls, ty })
            }
            Pending::Container(inner) => DeclNode::Container(finish_container(session, inner)),
        };
        container.insert(name, node);
    }
    container
}
