//! Path reconstruction from MFT entries.
//!
//! MFT enumeration yields one entry per file record: its reference number,
//! its parent's reference number, its own name and attribute bits. Full paths
//! are recovered here by walking parent references up to the root directory.
//!
//! Entries are dropped when they are NTFS metafiles (`$MFT`, `$Extend` and
//! the other records below 16) or when their parent chain never reaches the
//! root, which covers everything under `$Extend` and any entry whose parent
//! was deleted while the scan ran. The volume root itself is always emitted,
//! synthesized from the volume key.
//!
//! This module contains no Windows API calls so it builds and is tested on
//! every platform.

use fastfs_core::types::{NodeAttributes, NodeId, NodeRecord, VolumeKey, SEPARATOR};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Reference number of the volume's root directory.
pub const ROOT_FRN: u64 = 5;

/// Records below this number are reserved for NTFS metafiles.
const FIRST_USER_FRN: u64 = 16;

/// Parent chains deeper than this are treated as loops.
const MAX_DEPTH: usize = 1024;

/// Mask selecting the record number from a file reference.
const FRN_MASK: u64 = 0x0000_FFFF_FFFF_FFFF;

/// One record as returned by MFT enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MftEntry {
    pub frn: u64,
    pub parent_frn: u64,
    pub name: String,
    pub attributes: u32,
}

impl MftEntry {
    /// Build an entry from full 64-bit file references.
    pub fn from_references(file_ref: u64, parent_ref: u64, name: String, attributes: u32) -> Self {
        MftEntry {
            frn: file_ref & FRN_MASK,
            parent_frn: parent_ref & FRN_MASK,
            name,
            attributes,
        }
    }

    fn is_metafile(&self) -> bool {
        self.frn < FIRST_USER_FRN
    }
}

/// Device path for raw volume access, e.g. `\\.\C:` for `C:\`.
pub fn device_path(mount_point: &str) -> String {
    match extract_drive_letter(mount_point) {
        Some(letter) => format!("\\\\.\\{}:", letter.to_ascii_uppercase()),
        None => mount_point.trim_end_matches(SEPARATOR).to_string(),
    }
}

/// Get the drive letter from a path like `\\?\C:`, `\\.\C:` or `C:\`.
pub fn extract_drive_letter(path: &str) -> Option<char> {
    let rest = path
        .strip_prefix("\\\\?\\")
        .or_else(|| path.strip_prefix("\\\\.\\"))
        .unwrap_or(path);

    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic() => Some(letter),
        _ => None,
    }
}

/// Turn MFT entries into node records with full paths.
///
/// The first entry seen for a reference number wins; later duplicates are
/// ignored.
pub fn build_records(entries: Vec<MftEntry>, key: &VolumeKey) -> Vec<NodeRecord> {
    let total = entries.len();

    let mut by_frn: HashMap<u64, usize> = HashMap::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        by_frn.entry(entry.frn).or_insert(i);
    }

    let mut resolver = ChainResolver {
        entries: &entries,
        by_frn: &by_frn,
        root: key.root_path().trim_end_matches(SEPARATOR).to_string(),
        cache: HashMap::new(),
    };

    let mut records = Vec::with_capacity(entries.len() + 1);
    records.push(NodeRecord::root(key));

    let mut metafiles = 0usize;
    let mut unreachable = 0usize;

    for (i, entry) in entries.iter().enumerate() {
        if by_frn.get(&entry.frn) != Some(&i) {
            continue;
        }
        if entry.is_metafile() || entry.name.is_empty() {
            metafiles += 1;
            continue;
        }

        let Some(path) = resolver.path_of(entry.frn) else {
            unreachable += 1;
            continue;
        };

        records.push(
            NodeRecord::file(NodeId::new(entry.frn), path)
                .with_parent(NodeId::new(entry.parent_frn))
                .with_attributes(NodeAttributes::from_bits_truncate(entry.attributes)),
        );
    }

    debug!(
        volume = %key,
        raw = total,
        kept = records.len(),
        metafiles,
        unreachable,
        "Rebuilt paths from MFT entries"
    );

    records
}

/// Memoized walk from an entry up to the root directory.
struct ChainResolver<'a> {
    entries: &'a [MftEntry],
    by_frn: &'a HashMap<u64, usize>,
    root: String,
    cache: HashMap<u64, Option<String>>,
}

impl ChainResolver<'_> {
    /// Full path of the entry with this reference number, or `None` if its
    /// chain does not reach the root.
    fn path_of(&mut self, frn: u64) -> Option<String> {
        let mut chain = Vec::new();
        let mut current = frn;

        let base = loop {
            if current == ROOT_FRN {
                break Some(self.root.clone());
            }
            if let Some(cached) = self.cache.get(&current) {
                break cached.clone();
            }
            if chain.len() >= MAX_DEPTH {
                warn!(frn, "Parent chain exceeded maximum depth, possible loop");
                break None;
            }
            match self.by_frn.get(&current) {
                Some(&i) if !self.entries[i].is_metafile() => {
                    chain.push(i);
                    current = self.entries[i].parent_frn;
                }
                _ => break None,
            }
        };

        let mut path = base;
        for &i in chain.iter().rev() {
            let entry = &self.entries[i];
            path = path.map(|parent| format!("{}{}{}", parent, SEPARATOR, entry.name));
            self.cache.insert(entry.frn, path.clone());
        }
        path
    }
}
