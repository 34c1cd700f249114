//! Comparison trees.
//!
//! A [`ComparisonTree`] mirrors the shape of a reference declaration tree:
//! every key maps to a [`SupportLevel`] (a leaf symbol) or to a nested tree
//! (a namespace, class, or interface). Keys are kept in lexicographic order,
//! so every traversal is deterministic regardless of declaration order.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::support::SupportLevel;

/// One entry of a comparison tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ComparisonNode {
    /// Classification of a leaf symbol.
    Level(SupportLevel),
    /// Classification of a container's children.
    Tree(ComparisonTree),
}

impl ComparisonNode {
    /// Returns the level if this is a leaf entry.
    #[must_use]
    pub const fn as_level(&self) -> Option<SupportLevel> {
        match self {
            Self::Level(level) => Some(*level),
            Self::Tree(_) => None,
        }
    }

    /// Returns the subtree if this is a container entry.
    #[must_use]
    pub const fn as_tree(&self) -> Option<&ComparisonTree> {
        match self {
            Self::Level(_) => None,
            Self::Tree(tree) => Some(tree),
        }
    }

    /// Returns true if this entry or anything beneath it is not `Full`.
    #[must_use]
    pub fn contains_imperfection(&self) -> bool {
        match self {
            Self::Level(level) => !level.is_full(),
            Self::Tree(tree) => tree.contains_imperfection(),
        }
    }
}

impl From<SupportLevel> for ComparisonNode {
    fn from(level: SupportLevel) -> Self {
        Self::Level(level)
    }
}

impl From<ComparisonTree> for ComparisonNode {
    fn from(tree: ComparisonTree) -> Self {
        Self::Tree(tree)
    }
}

/// Name-keyed tree of support levels.
///
/// Cloning is O(1): the tree is an `im::OrdMap`, so copies of a result
/// share their structure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ComparisonTree(im::OrdMap<String, ComparisonNode>);

impl ComparisonTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self(im::OrdMap::new())
    }

    /// Returns the number of direct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the tree has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets a direct entry by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ComparisonNode> {
        self.0.get(key)
    }

    /// Returns true if the tree has a direct entry for `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Inserts or replaces a direct entry.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<ComparisonNode>) {
        self.0.insert(key.into(), node.into());
    }

    /// Iterates over direct entries in lexicographic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ComparisonNode)> {
        self.0.iter()
    }

    /// Iterates over direct keys in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Follows a path of keys down the tree.
    ///
    /// Returns `None` as soon as a segment is missing or a leaf is reached
    /// before the path ends.
    #[must_use]
    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> Option<&ComparisonNode> {
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.get(segment.as_ref())?.as_tree()?;
        }
        current.get(last.as_ref())
    }

    /// Returns the level stored at a leaf path.
    #[must_use]
    pub fn level_at<S: AsRef<str>>(&self, path: &[S]) -> Option<SupportLevel> {
        self.lookup(path).and_then(ComparisonNode::as_level)
    }

    /// Returns true if any entry at any depth is not `Full`.
    #[must_use]
    pub fn contains_imperfection(&self) -> bool {
        self.0.values().any(ComparisonNode::contains_imperfection)
    }

    /// Returns this tree pruned to the branches containing an imperfection.
    ///
    /// Containers with nothing but `Full` entries, including empty ones,
    /// are dropped entirely.
    #[must_use]
    pub fn imperfections(&self) -> Self {
        let mut pruned = Self::new();
        for (key, node) in self.iter() {
            match node {
                ComparisonNode::Level(level) if !level.is_full() => {
                    pruned.insert(key.clone(), *level);
                }
                ComparisonNode::Level(_) => {}
                ComparisonNode::Tree(tree) => {
                    if tree.contains_imperfection() {
                        pruned.insert(key.clone(), tree.imperfections());
                    }
                }
            }
        }
        pruned
    }

    /// Returns every leaf as a `(path, level)` pair, depth-first in key order.
    #[must_use]
    pub fn leaves(&self) -> Vec<(Vec<String>, SupportLevel)> {
        let mut out = Vec::new();
        self.collect_leaves(&mut Vec::new(), &mut out);
        out
    }

    fn collect_leaves(&self, prefix: &mut Vec<String>, out: &mut Vec<(Vec<String>, SupportLevel)>) {
        for (key, node) in self.iter() {
            prefix.push(key.clone());
            match node {
                ComparisonNode::Level(level) => out.push((prefix.clone(), *level)),
                ComparisonNode::Tree(tree) => tree.collect_leaves(prefix, out),
            }
            prefix.pop();
        }
    }

    /// Returns true if both trees have the same keys and the same
    /// leaf/container split at every depth.
    #[must_use]
    pub fn same_shape(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(key, node)| match (node, other.get(key)) {
                (ComparisonNode::Level(_), Some(ComparisonNode::Level(_))) => true,
                (ComparisonNode::Tree(a), Some(ComparisonNode::Tree(b))) => a.same_shape(b),
                _ => false,
            })
    }

    /// Returns true if every key path of `self` also exists in `other`.
    #[must_use]
    pub fn is_subtree_of(&self, other: &Self) -> bool {
        self.iter().all(|(key, node)| match (node, other.get(key)) {
            (ComparisonNode::Level(_), Some(ComparisonNode::Level(_))) => true,
            (ComparisonNode::Tree(a), Some(ComparisonNode::Tree(b))) => a.is_subtree_of(b),
            _ => false,
        })
    }
}

impl<K: Into<String>, V: Into<ComparisonNode>> FromIterator<(K, V)> for ComparisonTree {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        for (key, node) in iter {
            tree.insert(key, node);
        }
        tree
    }
}

// =============================================================================
// Full and Filtered
// =============================================================================

/// The result of comparing one candidate version against the reference.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FullAndFilteredComparisons {
    /// Every reference symbol with its classification.
    pub full: ComparisonTree,
    /// Only the branches with at least one non-`Full` classification.
    pub filtered: ComparisonTree,
}

impl FullAndFilteredComparisons {
    /// Creates the pair from a full tree, deriving the filtered tree.
    #[must_use]
    pub fn from_full(full: ComparisonTree) -> Self {
        let filtered = full.imperfections();
        Self { full, filtered }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ComparisonTree {
        let widget: ComparisonTree = [
            ("render", SupportLevel::Full),
            ("dispose", SupportLevel::None),
        ]
        .into_iter()
        .collect();
        let mut tree = ComparisonTree::new();
        tree.insert("Widget", widget);
        tree.insert("version", SupportLevel::Full);
        tree.insert("Empty", ComparisonTree::new());
        tree
    }

    #[test]
    fn keys_iterate_in_lexicographic_order() {
        let keys: Vec<_> = sample().keys().cloned().collect();
        assert_eq!(keys, vec!["Empty", "Widget", "version"]);
    }

    #[test]
    fn lookup_follows_paths() {
        let tree = sample();
        assert_eq!(
            tree.level_at(&["Widget", "dispose"]),
            Some(SupportLevel::None)
        );
        assert!(tree.lookup(&["Widget"]).unwrap().as_tree().is_some());
        assert!(tree.lookup(&["version", "deeper"]).is_none());
        assert!(tree.lookup::<&str>(&[]).is_none());
    }

    #[test]
    fn imperfections_prune_full_and_empty_branches() {
        let filtered = sample().imperfections();
        assert_eq!(filtered.keys().collect::<Vec<_>>(), vec!["Widget"]);
        let widget = filtered.get("Widget").unwrap().as_tree().unwrap();
        assert_eq!(widget.len(), 1);
        assert_eq!(widget.get("dispose"), Some(&ComparisonNode::Level(SupportLevel::None)));
    }

    #[test]
    fn filtered_is_subtree_of_full() {
        let pair = FullAndFilteredComparisons::from_full(sample());
        assert!(pair.filtered.is_subtree_of(&pair.full));
        assert!(!pair.full.is_subtree_of(&pair.filtered));
    }

    #[test]
    fn leaves_are_depth_first_in_key_order() {
        let leaves = sample().leaves();
        let paths: Vec<_> = leaves.iter().map(|(p, _)| p.join(".")).collect();
        assert_eq!(paths, vec!["Widget.dispose", "Widget.render", "version"]);
    }

    #[test]
    fn same_shape_ignores_levels() {
        let a = sample();
        let mut b = sample();
        b.insert("version", SupportLevel::None);
        assert!(a.same_shape(&b));
        b.insert("extra", SupportLevel::Full);
        assert!(!a.same_shape(&b));
    }
}
