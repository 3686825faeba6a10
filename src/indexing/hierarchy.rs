//! Class inheritance forest built from linearized ancestor lists.
//!
//! Each class contributes its ancestor chain, base first, as one path into a
//! trie rooted at a synthetic node. Children are keyed by name so that a
//! shared base is inserted once and reused by every class deriving from it.
//!
//! The model is a tree: a class reachable through several chains appears
//! once per chain position, never with two parents.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

use crate::types::RegisteredClass;

#[derive(Debug, Clone, Serialize)]
pub struct ClassHierarchyNode {
    pub name: String,
    /// Placeholder node: the synthetic root, or a name that is not itself a
    /// registered class.
    pub is_group: bool,
    #[serde(serialize_with = "serialize_children")]
    children: IndexMap<String, ClassHierarchyNode>,
}

fn serialize_children<S>(
    children: &IndexMap<String, ClassHierarchyNode>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(children.values())
}

impl ClassHierarchyNode {
    fn new(name: impl Into<String>, is_group: bool) -> Self {
        Self {
            name: name.into(),
            is_group,
            children: IndexMap::new(),
        }
    }

    /// Build the forest over `classes` under a synthetic root named `root_name`.
    ///
    /// A class with an empty ancestor list contributes nothing.
    pub fn build(root_name: &str, classes: &[RegisteredClass]) -> Self {
        let registered: HashSet<&str> = classes.iter().map(|c| c.name.as_str()).collect();
        let mut root = Self::new(root_name, true);

        for class in classes {
            let mut node = &mut root;
            for name in class.ancestors.iter().rev() {
                node = node
                    .children
                    .entry(name.clone())
                    .or_insert_with(|| Self::new(name.clone(), !registered.contains(name.as_str())));
            }
        }

        tracing::debug!(
            "[hierarchy] {} base classes, {} classes total",
            root.children.len(),
            classes.len()
        );
        root
    }

    /// Direct children in first-insertion order.
    pub fn children(&self) -> impl ExactSizeIterator<Item = &ClassHierarchyNode> {
        self.children.values()
    }

    pub fn child(&self, name: &str) -> Option<&ClassHierarchyNode> {
        self.children.get(name)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Depth-first search by exact name, this node included. Returns the
    /// first match in pre-order.
    pub fn find(&self, name: &str) -> Option<&ClassHierarchyNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.values().find_map(|child| child.find(name))
    }

    /// Whether some node strictly below this one is named `name`.
    pub fn has_descendant(&self, name: &str) -> bool {
        self.children.values().any(|c| c.find(name).is_some())
    }

    /// Number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.children
            .values()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }
}
