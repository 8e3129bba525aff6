//! The per-process collection of volume trees.
//!
//! A `VolumeIndex` maps each indexed volume's key to the tree built from its
//! scan plus the scan handle that produced it. An entry exists only once its
//! tree has been built completely, so key membership is the single test for
//! whether queries on a volume are served from memory or by the OS.
//!
//! Handles are owned exclusively by their entry and are released by dropping
//! the entry, which happens on `clear()` or when the index itself is dropped.

use crate::backend::VolumeHandle;
use crate::tree::VolumeTree;
use crate::types::{IndexStats, VolumeKey, VolumeStats};
use chrono::Utc;
use std::collections::HashMap;
use tracing::debug;

/// An indexed volume: its open scan handle and its tree.
pub struct VolumeEntry {
    handle: Box<dyn VolumeHandle>,
    tree: VolumeTree,
}

impl VolumeEntry {
    pub fn tree(&self) -> &VolumeTree {
        &self.tree
    }

    pub fn handle(&self) -> &dyn VolumeHandle {
        self.handle.as_ref()
    }
}

/// All indexed volumes.
#[derive(Default)]
pub struct VolumeIndex {
    entries: HashMap<VolumeKey, VolumeEntry>,
    stats: IndexStats,
}

impl VolumeIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fully built volume.
    ///
    /// An existing entry for the same key is replaced and its handle released.
    pub fn insert(&mut self, handle: Box<dyn VolumeHandle>, tree: VolumeTree) {
        let key = tree.key().clone();
        let stats = tree.stats();

        if let Some(previous) = self.entries.insert(key.clone(), VolumeEntry { handle, tree }) {
            debug!(volume = %key, "Replacing indexed volume");
            self.subtract(previous.tree.stats());
        }

        self.stats.total_files += stats.files;
        self.stats.total_dirs += stats.directories;
        self.stats.volume_count = self.entries.len() as u32;
        self.stats.last_rebuilt = Some(Utc::now());
    }

    fn subtract(&mut self, stats: VolumeStats) {
        self.stats.total_files -= stats.files;
        self.stats.total_dirs -= stats.directories;
    }

    /// The tree for a volume, if that volume is indexed.
    pub fn get(&self, key: &VolumeKey) -> Option<&VolumeTree> {
        self.entries.get(key).map(|entry| &entry.tree)
    }

    pub fn entry(&self, key: &VolumeKey) -> Option<&VolumeEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &VolumeKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of indexed volumes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no volume is indexed and every query goes to the OS.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys of all indexed volumes, sorted.
    pub fn keys(&self) -> Vec<VolumeKey> {
        let mut keys: Vec<_> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn stats(&self) -> IndexStats {
        self.stats.clone()
    }

    /// Drop every tree and release every handle.
    ///
    /// Returns the number of handles released. Calling this on an empty index
    /// is a no-op.
    pub fn clear(&mut self) -> usize {
        let released = self.entries.len();
        for (key, entry) in self.entries.drain() {
            debug!(
                volume = %key,
                mount = %entry.handle.volume().mount_point,
                "Releasing volume handle"
            );
            drop(entry);
        }
        self.stats = IndexStats::default();
        released
    }
}

impl std::fmt::Debug for VolumeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VolumeIndex")
            .field("volumes", &self.keys())
            .field("files", &self.stats.total_files)
            .field("dirs", &self.stats.total_dirs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{RetrieveMode, VolumeInfo, VolumeScanner};
    use crate::builder::IndexBuilder;
    use crate::memory::MemoryScanner;
    use crate::types::{NodeId, NodeRecord};

    fn scanner() -> MemoryScanner {
        MemoryScanner::new()
            .with_volume(
                VolumeInfo::new("C:\\", "NTFS"),
                vec![
                    NodeRecord::directory(NodeId::new(20), "C:\\Apps"),
                    NodeRecord::file(NodeId::new(21), "C:\\Apps\\a.exe"),
                ],
            )
            .with_volume(
                VolumeInfo::new("D:\\", "NTFS"),
                vec![NodeRecord::file(NodeId::new(20), "D:\\x.txt")],
            )
    }

    fn index_all(scanner: &MemoryScanner) -> VolumeIndex {
        let mut index = VolumeIndex::new();
        for volume in scanner.list_volumes().unwrap() {
            let mut handle = scanner.open(&volume, RetrieveMode::Minimal).unwrap();
            let records = handle.nodes(&volume.mount_point).unwrap();
            let tree = IndexBuilder::new(volume.key.clone()).build(records).unwrap();
            index.insert(handle, tree);
        }
        index
    }

    #[test]
    fn test_insert_and_get() {
        let scanner = scanner();
        let index = index_all(&scanner);

        assert_eq!(index.len(), 2);
        assert!(index.contains(&VolumeKey::new("C")));
        assert!(index.get(&VolumeKey::new("d")).is_some());
        assert!(index.get(&VolumeKey::new("e")).is_none());
        assert_eq!(index.keys(), vec![VolumeKey::new("c"), VolumeKey::new("d")]);
    }

    #[test]
    fn test_stats() {
        let scanner = scanner();
        let index = index_all(&scanner);

        let stats = index.stats();
        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.total_dirs, 3);
        assert_eq!(stats.volume_count, 2);
        assert!(stats.last_rebuilt.is_some());
    }

    #[test]
    fn test_clear_releases_handles() {
        let scanner = scanner();
        let mut index = index_all(&scanner);
        assert_eq!(scanner.open_handles(), 2);

        assert_eq!(index.clear(), 2);
        assert!(index.is_empty());
        assert_eq!(scanner.open_handles(), 0);
        assert_eq!(index.stats().total_entries(), 0);

        assert_eq!(index.clear(), 0);
        assert_eq!(scanner.total_released(), 2);
    }

    #[test]
    fn test_drop_releases_handles() {
        let scanner = scanner();
        let index = index_all(&scanner);
        assert_eq!(scanner.open_handles(), 2);
        drop(index);
        assert_eq!(scanner.open_handles(), 0);
    }

    #[test]
    fn test_insert_replaces_entry() {
        let scanner = scanner();
        let mut index = index_all(&scanner);
        let volume = VolumeInfo::new("C:\\", "NTFS");
        let handle = scanner.open(&volume, RetrieveMode::Minimal).unwrap();
        let tree = IndexBuilder::new(volume.key.clone()).build(Vec::new()).unwrap();

        index.insert(handle, tree);

        assert_eq!(index.len(), 2);
        assert_eq!(scanner.open_handles(), 2);
        assert_eq!(index.stats().total_files, 1);
    }
}
