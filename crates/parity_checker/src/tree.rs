//! Declaration trees.
//!
//! A [`DeclarationTree`] is the name-keyed view of one API version: modules,
//! classes, and interfaces become [`Container`]s, everything else that
//! declares a named member becomes a [`Leaf`] carrying its resolved type.
//! Children are kept in an ordered map, so traversal order is the sorted
//! order of names regardless of declaration order.

use im::OrdMap;

use crate::session::{DeclRef, Session, SessionId};
use crate::types::TypeId;

/// What a leaf declares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LeafKind {
    /// Top-level function.
    Function,
    /// Method of a class or interface.
    Method,
    /// Property of a class or interface.
    Property,
    /// Get or set accessor.
    Accessor,
    /// `var`, `let`, or `const`.
    Variable,
    /// Type alias.
    TypeAlias,
    /// Enum.
    Enum,
    /// Class constructor.
    Constructor,
}

/// What a container declares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Namespace or module.
    Module,
    /// Class.
    Class,
    /// Interface.
    Interface,
}

/// A named declaration without named children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leaf {
    /// Kind of the first contributing declaration.
    pub kind: LeafKind,
    /// Every declaration merged under this name, in source order.
    pub decls: Vec<DeclRef>,
    /// The resolved type of the merged declarations.
    pub ty: TypeId,
}

impl Leaf {
    /// Returns true if any contributing declaration is marked as a stub.
    #[must_use]
    pub fn is_stubbed(&self, session: &Session) -> bool {
        self.decls.iter().any(|&d| session.is_stubbed(d))
    }

    /// Returns the normalized text of every contributing declaration.
    #[must_use]
    pub fn normalized_texts(&self, session: &Session) -> Vec<String> {
        self.decls
            .iter()
            .map(|&d| session.normalized_text(d))
            .collect()
    }

    /// Returns true for overload sets and other multi-declaration leaves.
    #[must_use]
    pub fn is_merged(&self) -> bool {
        self.decls.len() > 1
    }
}

/// A named declaration with named children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Container {
    /// Kind of the first contributing declaration.
    pub kind: ContainerKind,
    /// Every declaration merged under this name.
    pub decls: Vec<DeclRef>,
    children: OrdMap<String, DeclNode>,
}

impl Container {
    /// Creates an empty container.
    #[must_use]
    pub fn new(kind: ContainerKind) -> Self {
        Self {
            kind,
            decls: Vec::new(),
            children: OrdMap::new(),
        }
    }

    /// Gets a direct child.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DeclNode> {
        self.children.get(name)
    }

    /// Inserts a child, replacing any previous child of that name.
    pub fn insert(&mut self, name: impl Into<String>, node: DeclNode) {
        self.children.insert(name.into(), node);
    }

    /// Iterates over children in name order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &DeclNode)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// A node of a declaration tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclNode {
    /// A leaf declaration.
    Leaf(Leaf),
    /// A container declaration.
    Container(Container),
}

impl DeclNode {
    /// Returns the leaf, if this is one.
    #[must_use]
    pub const fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Container(_) => None,
        }
    }

    /// Returns the container, if this is one.
    #[must_use]
    pub const fn as_container(&self) -> Option<&Container> {
        match self {
            Self::Container(container) => Some(container),
            Self::Leaf(_) => None,
        }
    }
}

/// The declarations of one API version, bound to the session that built it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclarationTree {
    session: SessionId,
    root: Container,
}

impl DeclarationTree {
    /// Creates a tree from a root container.
    #[must_use]
    pub const fn new(session: SessionId, root: Container) -> Self {
        Self { session, root }
    }

    /// Returns the id of the session whose types the leaves refer to.
    #[must_use]
    pub const fn session(&self) -> SessionId {
        self.session
    }

    /// Returns the root container.
    #[must_use]
    pub const fn root(&self) -> &Container {
        &self.root
    }

    /// Follows a path of names from the root.
    #[must_use]
    pub fn get(&self, path: &[&str]) -> Option<&DeclNode> {
        let (last, prefix) = path.split_last()?;
        let mut container = &self.root;
        for name in prefix {
            container = container.get(name)?.as_container()?;
        }
        container.get(last)
    }

    /// Counts the leaves of the whole tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        fn count(container: &Container) -> usize {
            container
                .children()
                .map(|(_, node)| match node {
                    DeclNode::Leaf(_) => 1,
                    DeclNode::Container(inner) => count(inner),
                })
                .sum()
        }
        count(&self.root)
    }
}
