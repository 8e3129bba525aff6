//! Path queries against the volume index.
//!
//! The resolver first routes a path: if its volume key is in the index the
//! query is answered from that volume's tree, otherwise the caller must ask
//! the OS. Routing is a plain membership test on the key map.
//!
//! Resolution splits the path on separators, drops empty segments and
//! lower-cases the rest. The first segment must be the volume's drive
//! (`c:`); each following segment selects a child. The final node is only
//! returned if its directory flag matches the request, so `C:\Apps` asked for
//! as a file is absent even when a directory by that name exists.

use crate::index::VolumeIndex;
use crate::tree::{Children, Descendants, NodeRef, VolumeTree};
use crate::types::{is_separator, SearchScope, VolumeKey};

/// Where a query for a path must be answered.
#[derive(Debug, Clone, Copy)]
pub enum Route<'a> {
    /// The path's volume is indexed
    Indexed(&'a VolumeTree),
    /// No index covers the path; use the OS
    Fallback,
}

/// Resolves paths against a `VolumeIndex`.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    index: &'a VolumeIndex,
}

impl<'a> PathResolver<'a> {
    pub fn new(index: &'a VolumeIndex) -> Self {
        PathResolver { index }
    }

    /// Decide whether `path` is served by the index or by the OS.
    pub fn route(&self, path: &str) -> Route<'a> {
        if self.index.is_empty() {
            return Route::Fallback;
        }
        match VolumeKey::from_path(path).and_then(|key| self.index.get(&key)) {
            Some(tree) => Route::Indexed(tree),
            None => Route::Fallback,
        }
    }

    /// Find the node for `path` if its volume is indexed.
    ///
    /// Returns `None` both for absent nodes and for unindexed volumes; use
    /// `route` to tell the two apart.
    pub fn resolve(&self, path: &str, want_directory: bool) -> Option<NodeRef<'a>> {
        match self.route(path) {
            Route::Indexed(tree) => resolve_in(tree, path, want_directory),
            Route::Fallback => None,
        }
    }

    /// Enumerate below the directory at `path` if its volume is indexed.
    pub fn entries(&self, path: &str, scope: SearchScope) -> Option<Entries<'a>> {
        self.resolve(path, true).map(|dir| entries(dir, scope))
    }
}

/// Descend `tree` along the segments of `path`.
pub fn resolve_in<'a>(tree: &'a VolumeTree, path: &str, want_directory: bool) -> Option<NodeRef<'a>> {
    let mut segments = path
        .split(is_separator)
        .filter(|segment| !segment.is_empty())
        .map(str::to_lowercase);

    if segments.next()? != tree.key().root_segment() {
        return None;
    }

    let mut node = tree.root();
    for segment in segments {
        node = node.child(&segment)?;
    }

    (node.is_dir() == want_directory).then_some(node)
}

/// Enumerate below `dir` with the given scope.
pub fn entries(dir: NodeRef<'_>, scope: SearchScope) -> Entries<'_> {
    match scope {
        SearchScope::Immediate => Entries::Immediate(dir.children()),
        SearchScope::Recursive => Entries::Recursive(dir.descendants()),
    }
}

/// Nodes below a directory, either direct children or the whole subtree.
pub enum Entries<'a> {
    Immediate(Children<'a>),
    Recursive(Descendants<'a>),
}

impl<'a> Iterator for Entries<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Entries::Immediate(children) => children.next(),
            Entries::Recursive(descendants) => descendants.next(),
        }
    }
}
