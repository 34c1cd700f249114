//! Drift between reference versions.
//!
//! Versions of the reference platform are not checked for structural
//! compatibility with each other; the report only needs to know whether a
//! symbol of the pinned version still exists in another one. Because the
//! check is textual, the two trees may come from different sessions.

use std::collections::BTreeSet;

use parity_checker::{Container, DeclNode, DeclarationTree, Leaf, Session};
use parity_foundation::{ComparisonTree, SupportLevel};

/// A declaration tree together with the session that resolved it.
#[derive(Clone, Copy, Debug)]
pub struct TreeInSession<'a> {
    /// The tree.
    pub tree: &'a DeclarationTree,
    /// The session holding the tree's declarations.
    pub session: &'a Session,
}

impl<'a> TreeInSession<'a> {
    /// Pairs a tree with its session.
    #[must_use]
    pub const fn new(tree: &'a DeclarationTree, session: &'a Session) -> Self {
        Self { tree, session }
    }
}

/// Records, for every symbol of `pinned`, whether `other` still declares it.
///
/// A symbol is `Full` when a same-named entry exists and, if either side is
/// an overload set, every pinned overload text is still present; otherwise
/// it is `None`. Containers recurse; a pinned container with no container
/// counterpart yields `None` for all of its children.
#[must_use]
pub fn drift(pinned: TreeInSession<'_>, other: TreeInSession<'_>) -> ComparisonTree {
    drift_containers(
        pinned.session,
        pinned.tree.root(),
        other.session,
        Some(other.tree.root()),
    )
}

fn drift_containers(
    pinned_session: &Session,
    pinned: &Container,
    other_session: &Session,
    other: Option<&Container>,
) -> ComparisonTree {
    let mut out = ComparisonTree::new();
    for (name, node) in pinned.children() {
        let counterpart = other.and_then(|c| c.get(name));
        match node {
            DeclNode::Container(inner) => {
                let other_inner = counterpart.and_then(DeclNode::as_container);
                out.insert(
                    name,
                    drift_containers(pinned_session, inner, other_session, other_inner),
                );
            }
            DeclNode::Leaf(leaf) => {
                let present = match counterpart {
                    None => false,
                    Some(DeclNode::Container(_)) => true,
                    Some(DeclNode::Leaf(other_leaf)) => {
                        overloads_retained(pinned_session, leaf, other_session, other_leaf)
                    }
                };
                let level = if present {
                    SupportLevel::Full
                } else {
                    SupportLevel::None
                };
                out.insert(name, level);
            }
        }
    }
    out
}

fn overloads_retained(
    pinned_session: &Session,
    pinned: &Leaf,
    other_session: &Session,
    other: &Leaf,
) -> bool {
    if !pinned.is_merged() && !other.is_merged() {
        return true;
    }
    let kept: BTreeSet<String> = other.normalized_texts(other_session).into_iter().collect();
    pinned
        .normalized_texts(pinned_session)
        .iter()
        .all(|text| kept.contains(text))
}
