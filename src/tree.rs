//! Prefix tree over `::` segments.
//!
//! Building a tree from flat paths and printing it with [`Display`] yields the
//! smallest bracket notation that expands back to the same set of paths.
//!
//! [`Display`]: std::fmt::Display

use std::collections::BTreeMap;
use std::fmt;

/// Key marking that the node itself is imported, not only its descendants.
const SELF_KEY: &str = "";

/// A node in the import trie.
///
/// Every inserted path marks its terminal node with the self key, so a leaf
/// is a node whose only key is the self key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTree {
    nodes: BTreeMap<String, ImportTree>,
}

impl ImportTree {
    /// Folds expanded paths into a tree. The empty path marks the root itself.
    pub fn from_paths<S: AsRef<str>>(paths: &[S]) -> Self {
        let mut tree = Self::default();
        for path in paths {
            tree.insert(path.as_ref());
        }
        tree
    }

    pub fn insert(&mut self, path: &str) {
        let mut segments: Vec<&str> = if path.is_empty() {
            Vec::new()
        } else {
            path.split("::").map(str::trim).collect()
        };
        if segments.last() == Some(&"self") {
            segments.pop();
        }

        let mut node = self;
        for segment in segments {
            node = node.nodes.entry(segment.to_string()).or_default();
        }
        node.nodes.entry(SELF_KEY.to_string()).or_default();
    }

    pub fn has_self(&self) -> bool {
        self.nodes.contains_key(SELF_KEY)
    }

    /// Child nodes in sorted order, excluding the self key.
    pub fn children(&self) -> impl Iterator<Item = (&str, &ImportTree)> {
        self.nodes
            .iter()
            .filter(|(key, _)| key.as_str() != SELF_KEY)
            .map(|(key, node)| (key.as_str(), node))
    }

    pub fn is_leaf(&self) -> bool {
        self.children().next().is_none()
    }
}

impl fmt::Display for ImportTree {
    /// Renders the tree below its base, e.g. `{self, a, b::{c, d}}`.
    ///
    /// A tree holding only the self key renders as the empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children: Vec<_> = self.children().collect();
        if children.is_empty() {
            return Ok(());
        }

        if let [(key, node)] = children.as_slice()
            && !self.has_self()
        {
            return write_child(f, key, node);
        }

        f.write_str("{")?;
        let mut first = true;
        if self.has_self() {
            f.write_str("self")?;
            first = false;
        }
        for (key, node) in children {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write_child(f, key, node)?;
        }
        f.write_str("}")
    }
}

fn write_child(f: &mut fmt::Formatter<'_>, key: &str, node: &ImportTree) -> fmt::Result {
    if node.is_leaf() {
        f.write_str(key)
    } else {
        write!(f, "{key}::{node}")
    }
}
