//! Per-volume node hierarchy.
//!
//! A `VolumeTree` is an arena of `IndexNode`s addressed by position. Each node
//! owns a name-keyed map of its children; there are no parent pointers, so the
//! structure is a plain tree and is immutable once `IndexBuilder` returns it.
//!
//! Child keys are lower-cased path segments, which is what makes every lookup
//! case-insensitive.

use crate::types::{NodeRecord, VolumeKey, VolumeStats};
use std::collections::BTreeMap;
use std::fmt;

/// One entry of the hierarchy: a scanned record plus its children.
#[derive(Debug, Clone)]
pub struct IndexNode {
    record: NodeRecord,
    children: BTreeMap<String, usize>,
}

impl IndexNode {
    fn new(record: NodeRecord) -> Self {
        IndexNode {
            record,
            children: BTreeMap::new(),
        }
    }
}

/// The complete hierarchy of one volume, rooted at the volume root.
pub struct VolumeTree {
    key: VolumeKey,
    nodes: Vec<IndexNode>,
    stats: VolumeStats,
}

const ROOT: usize = 0;

impl VolumeTree {
    /// Create a tree holding only the root node.
    pub(crate) fn with_root(key: VolumeKey, root: NodeRecord) -> Self {
        VolumeTree {
            key,
            nodes: vec![IndexNode::new(root)],
            stats: VolumeStats {
                files: 0,
                directories: 1,
            },
        }
    }

    /// Attach a record under `parent` with the given lower-cased name.
    ///
    /// Hands the record back if the parent already has a child with that
    /// name.
    pub(crate) fn push_child(
        &mut self,
        parent: usize,
        name: String,
        record: NodeRecord,
    ) -> Result<usize, NodeRecord> {
        let index = self.nodes.len();
        if self.nodes[parent].children.contains_key(&name) {
            return Err(record);
        }
        self.nodes[parent].children.insert(name, index);

        if record.is_dir() {
            self.stats.directories += 1;
        } else {
            self.stats.files += 1;
        }
        self.nodes.push(IndexNode::new(record));
        Ok(index)
    }

    pub fn key(&self) -> &VolumeKey {
        &self.key
    }

    /// Number of nodes including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn stats(&self) -> VolumeStats {
        self.stats
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            index: ROOT,
        }
    }
}

impl fmt::Debug for VolumeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VolumeTree")
            .field("key", &self.key)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

/// A borrowed handle to one node of a `VolumeTree`.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a VolumeTree,
    index: usize,
}

impl<'a> NodeRef<'a> {
    fn node(&self) -> &'a IndexNode {
        let tree: &'a VolumeTree = self.tree;
        &tree.nodes[self.index]
    }

    /// The scanned record behind this node.
    pub fn record(&self) -> &'a NodeRecord {
        &self.node().record
    }

    pub fn path(&self) -> &'a str {
        &self.node().record.path
    }

    pub fn is_dir(&self) -> bool {
        self.node().record.is_dir()
    }

    /// Look up a direct child by its lower-cased name.
    pub fn child(&self, name_lower: &str) -> Option<NodeRef<'a>> {
        self.node()
            .children
            .get(name_lower)
            .map(|&index| NodeRef {
                tree: self.tree,
                index,
            })
    }

    /// Direct children, ordered by lower-cased name.
    pub fn children(&self) -> Children<'a> {
        Children {
            tree: self.tree,
            inner: self.node().children.values(),
        }
    }

    pub fn child_count(&self) -> usize {
        self.node().children.len()
    }

    /// Every node below this one in pre-order, excluding this node.
    ///
    /// The iterator keeps its own stack and never touches the tree, so it can
    /// be created again to restart the traversal.
    pub fn descendants(&self) -> Descendants<'a> {
        Descendants {
            tree: self.tree,
            stack: self.node().children.values().rev().copied().collect(),
        }
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("path", &self.path())
            .field("is_dir", &self.is_dir())
            .finish()
    }
}

/// Iterator over the direct children of a node.
pub struct Children<'a> {
    tree: &'a VolumeTree,
    inner: std::collections::btree_map::Values<'a, String, usize>,
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|&index| NodeRef {
            tree: self.tree,
            index,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    tree: &'a VolumeTree,
    stack: Vec<usize>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        // reversed so the smallest name is visited first
        self.stack
            .extend(self.tree.nodes[index].children.values().rev().copied());
        Some(NodeRef {
            tree: self.tree,
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeId;

    fn sample_tree() -> VolumeTree {
        let key = VolumeKey::new("C");
        let mut tree = VolumeTree::with_root(key.clone(), NodeRecord::root(&key));
        let apps = tree
            .push_child(0, "apps".into(), NodeRecord::directory(NodeId::new(20), "C:\\Apps"))
            .unwrap();
        tree.push_child(apps, "b.exe".into(), NodeRecord::file(NodeId::new(22), "C:\\Apps\\b.exe"))
            .unwrap();
        let tools = tree
            .push_child(apps, "tools".into(), NodeRecord::directory(NodeId::new(23), "C:\\Apps\\Tools"))
            .unwrap();
        tree.push_child(tools, "t.dll".into(), NodeRecord::file(NodeId::new(24), "C:\\Apps\\Tools\\t.dll"))
            .unwrap();
        tree.push_child(apps, "a.exe".into(), NodeRecord::file(NodeId::new(21), "C:\\Apps\\a.exe"))
            .unwrap();
        tree
    }

    #[test]
    fn test_push_child_rejects_duplicate_name() {
        let mut tree = sample_tree();
        let again = tree.push_child(0, "apps".into(), NodeRecord::directory(NodeId::new(99), "C:\\APPS"));
        assert!(again.is_err());
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn test_stats() {
        let tree = sample_tree();
        assert_eq!(tree.stats().files, 3);
        assert_eq!(tree.stats().directories, 3);
        assert_eq!(tree.stats().total(), tree.len() as u64);
    }

    #[test]
    fn test_children_are_ordered() {
        let tree = sample_tree();
        let apps = tree.root().child("apps").unwrap();
        let names: Vec<_> = apps.children().map(|n| n.path()).collect();
        assert_eq!(
            names,
            vec!["C:\\Apps\\a.exe", "C:\\Apps\\b.exe", "C:\\Apps\\Tools"]
        );
    }

    #[test]
    fn test_descendants_pre_order_and_restartable() {
        let tree = sample_tree();
        let root = tree.root();
        let first: Vec<_> = root.descendants().map(|n| n.path()).collect();
        assert_eq!(
            first,
            vec![
                "C:\\Apps",
                "C:\\Apps\\a.exe",
                "C:\\Apps\\b.exe",
                "C:\\Apps\\Tools",
                "C:\\Apps\\Tools\\t.dll",
            ]
        );
        let second: Vec<_> = root.descendants().map(|n| n.path()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_descendants_of_leaf_is_empty() {
        let tree = sample_tree();
        let leaf = tree.root().child("apps").unwrap().child("a.exe").unwrap();
        assert_eq!(leaf.descendants().count(), 0);
        assert_eq!(leaf.child_count(), 0);
    }
}
