//! Hierarchy reconstruction from a flat scan.
//!
//! Scanners hand over every record of a volume in no particular order. The
//! builder recovers the tree from full paths alone:
//!
//! 1. Every path is turned into a sort key: lower-cased, trailing separators
//!    removed, then exactly one separator appended (`C:\Foo` -> `c:\foo\`).
//! 2. Keys are sorted. A parent's key is a prefix of all its descendants' keys,
//!    so it sorts before them, and a subtree occupies one contiguous run.
//!    The appended separator keeps `c:\foo2\` from landing between
//!    `c:\foo\` and `c:\foo\bar\`.
//! 3. One linear pass keeps a stack holding the ancestor chain of the current
//!    node. Entries that are not a prefix of the next key are popped; the
//!    remaining top must be the direct parent, otherwise the scan is missing
//!    a directory and the build fails.
//!
//! A tree is only ever returned whole. Orphaned, duplicated or foreign records
//! and a root that is not a directory fail the build for that volume so that it is answered by the OS instead.

use crate::error::{FastFsError, Result};
use crate::tree::VolumeTree;
use crate::types::{is_separator, NodeRecord, VolumeKey, SEPARATOR};
use tracing::{debug, info, instrument};

/// Builds the `VolumeTree` for one volume.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    key: VolumeKey,
    root_key: String,
}

impl IndexBuilder {
    /// Create a builder for the volume identified by `key`.
    pub fn new(key: VolumeKey) -> Self {
        let root_key = sort_key(&key.root_path());
        IndexBuilder { key, root_key }
    }

    /// The volume this builder produces trees for.
    pub fn key(&self) -> &VolumeKey {
        &self.key
    }

    /// Build the tree from every record of the volume.
    ///
    /// If the scan carries no record for the volume root, a plain directory
    /// root is synthesized. A root record that is not a directory fails the
    /// build.
    #[instrument(skip(self, records), fields(volume = %self.key, records = records.len()))]
    pub fn build(&self, records: Vec<NodeRecord>) -> Result<VolumeTree> {
        let mut keyed = Vec::with_capacity(records.len());
        for record in records {
            let key = sort_key(&record.path);
            if !key.starts_with(&self.root_key) {
                return Err(FastFsError::ForeignRecord {
                    volume: self.key.to_string(),
                    path: record.path,
                });
            }
            keyed.push((key, record));
        }
        keyed.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let mut sorted = keyed.into_iter().peekable();
        let root = match sorted.next_if(|(key, _)| *key == self.root_key) {
            Some((_, record)) if record.is_dir() => record,
            Some((_, record)) => {
                return Err(FastFsError::RootNotDirectory {
                    volume: self.key.to_string(),
                    path: record.path,
                });
            }
            None => {
                debug!(volume = %self.key, "Scan has no root record, synthesizing one");
                NodeRecord::root(&self.key)
            }
        };

        let mut tree = VolumeTree::with_root(self.key.clone(), root);
        let mut stack: Vec<(usize, String)> = vec![(0, self.root_key.clone())];
        let mut previous = self.root_key.clone();

        for (key, record) in sorted {
            if key == previous {
                return Err(self.duplicate(record));
            }

            while let Some((_, prefix)) = stack.last() {
                if key.starts_with(prefix.as_str()) {
                    break;
                }
                stack.pop();
            }

            // the root key prefixes every key, so the stack never empties
            let Some((parent, prefix)) = stack.last() else {
                return Err(FastFsError::ForeignRecord {
                    volume: self.key.to_string(),
                    path: record.path,
                });
            };

            let name = &key[prefix.len()..key.len() - SEPARATOR.len_utf8()];
            if name.is_empty() || name.contains(SEPARATOR) {
                return Err(FastFsError::OrphanedRecord {
                    volume: self.key.to_string(),
                    path: record.path,
                });
            }

            let is_dir = record.is_dir();
            let index = tree
                .push_child(*parent, name.to_string(), record)
                .map_err(|record| self.duplicate(record))?;

            // files never become parents
            if is_dir {
                stack.push((index, key.clone()));
            }
            previous = key;
        }

        info!(
            volume = %self.key,
            files = tree.stats().files,
            dirs = tree.stats().directories,
            "Volume tree built"
        );

        Ok(tree)
    }

    fn duplicate(&self, record: NodeRecord) -> FastFsError {
        FastFsError::DuplicateRecord {
            volume: self.key.to_string(),
            path: record.path,
        }
    }
}

/// Sort key for a path: lower-cased, `/` normalized, exactly one trailing
/// separator.
fn sort_key(path: &str) -> String {
    let mut key: String = path
        .trim_end_matches(is_separator)
        .chars()
        .map(|c| if is_separator(c) { SEPARATOR } else { c })
        .collect::<String>()
        .to_lowercase();
    key.push(SEPARATOR);
    key
}
