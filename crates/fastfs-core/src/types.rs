//! Core data types for fastfs.
//!
//! This module defines the records produced by volume scanners and the small
//! value types every other module passes around:
//!
//! - **Identity**: `NodeId` (per-scan) and `VolumeKey` (per-volume)
//! - **Records**: `NodeRecord` with its `NodeAttributes`
//! - **Scoping**: `SearchScope` for listing queries
//! - **Statistics**: `VolumeStats` and `IndexStats`

use crate::error::FastFsError;
use bitflags::bitflags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Path separator used by volume paths.
pub const SEPARATOR: char = '\\';

/// Returns true for characters accepted as path separators in queries.
pub fn is_separator(c: char) -> bool {
    c == '\\' || c == '/'
}

/// Opaque identifier of a node within one volume scan.
///
/// On NTFS, this corresponds to the MFT record number. Identifiers are only
/// unique within the scan that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// The root directory record number on NTFS
    pub const ROOT: NodeId = NodeId(5);

    /// Create a new node ID
    pub fn new(id: u64) -> Self {
        NodeId(id)
    }

    /// Get the raw ID value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key identifying an indexed volume.
///
/// The key is the lower-cased drive letter without the colon or trailing
/// separators, e.g. `"c"` for `C:\`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VolumeKey(String);

impl VolumeKey {
    /// Create a key from a drive name such as `"C:\"`, `"c:"` or `"C"`.
    pub fn new(name: &str) -> Self {
        VolumeKey(
            name.trim_end_matches(|c: char| c == ':' || is_separator(c) || c == ' ')
                .to_lowercase(),
        )
    }

    /// Extract the volume key from a drive-letter style path.
    ///
    /// Returns `None` when the path has no volume prefix terminated by a
    /// colon (relative paths, UNC paths, an empty string).
    pub fn from_path(path: &str) -> Option<Self> {
        let colon = path.find(':')?;
        if colon == 0 {
            return None;
        }
        let root = path[..colon]
            .trim_start_matches(|c: char| c == '"' || c == ' ')
            .to_lowercase();
        if root.is_empty() {
            None
        } else {
            Some(VolumeKey(root))
        }
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The lower-cased first path segment for this volume (e.g. `"c:"`).
    pub fn root_segment(&self) -> String {
        format!("{}:", self.0)
    }

    /// The canonical root path for this volume (e.g. `"C:\"`).
    pub fn root_path(&self) -> String {
        format!("{}:{}", self.0.to_uppercase(), SEPARATOR)
    }
}

impl fmt::Display for VolumeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for VolumeKey {
    fn from(s: &str) -> Self {
        VolumeKey::new(s)
    }
}

bitflags! {
    /// Attribute bits of a node, using the Win32 file attribute values.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct NodeAttributes: u32 {
        const READONLY = 0x0000_0001;
        const HIDDEN = 0x0000_0002;
        const SYSTEM = 0x0000_0004;
        const DIRECTORY = 0x0000_0010;
        const ARCHIVE = 0x0000_0020;
        const REPARSE_POINT = 0x0000_0400;
    }
}

/// One filesystem object as reported by a volume scanner.
///
/// Records are produced once per scan and never modified afterwards. The
/// `path` is the full path including the volume prefix, e.g.
/// `"C:\Program Files\app.exe"`; the root record's path is the volume root
/// itself (`"C:\"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Identity within the scan
    pub id: NodeId,

    /// Parent identity, when the scanner knows it
    pub parent_id: Option<NodeId>,

    /// Full path including the volume prefix
    pub path: String,

    /// Attribute bits
    pub attributes: NodeAttributes,

    /// Creation time, if the scan retrieved it
    pub created: Option<DateTime<Utc>>,
}

impl NodeRecord {
    /// Create a file record.
    pub fn file(id: NodeId, path: impl Into<String>) -> Self {
        NodeRecord {
            id,
            parent_id: None,
            path: path.into(),
            attributes: NodeAttributes::empty(),
            created: None,
        }
    }

    /// Create a directory record.
    pub fn directory(id: NodeId, path: impl Into<String>) -> Self {
        NodeRecord {
            attributes: NodeAttributes::DIRECTORY,
            ..NodeRecord::file(id, path)
        }
    }

    /// Create the root directory record of a volume.
    pub fn root(key: &VolumeKey) -> Self {
        NodeRecord::directory(NodeId::ROOT, key.root_path())
    }

    /// Set the parent identity
    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    /// Add attribute bits
    pub fn with_attributes(mut self, attributes: NodeAttributes) -> Self {
        self.attributes |= attributes;
        self
    }

    /// Set the creation time
    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    pub fn is_dir(&self) -> bool {
        self.attributes.contains(NodeAttributes::DIRECTORY)
    }

    pub fn is_system(&self) -> bool {
        self.attributes.contains(NodeAttributes::SYSTEM)
    }

    /// The final path segment, or the whole path for a volume root.
    pub fn name(&self) -> &str {
        let trimmed = self.path.trim_end_matches(is_separator);
        match trimmed.rfind(is_separator) {
            Some(i) => &trimmed[i + 1..],
            None => trimmed,
        }
    }
}

/// How far a listing query descends below the requested directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    /// Direct children only
    #[default]
    Immediate,
    /// Every descendant at any depth
    Recursive,
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchScope::Immediate => write!(f, "immediate"),
            SearchScope::Recursive => write!(f, "recursive"),
        }
    }
}

impl FromStr for SearchScope {
    type Err = FastFsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "immediate" | "top" => Ok(SearchScope::Immediate),
            "recursive" | "all" => Ok(SearchScope::Recursive),
            _ => Err(FastFsError::InvalidScope {
                value: s.to_string(),
            }),
        }
    }
}

/// Node counts for one indexed volume
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeStats {
    pub files: u64,
    pub directories: u64,
}

impl VolumeStats {
    /// Total number of nodes (files + directories)
    pub fn total(&self) -> u64 {
        self.files + self.directories
    }
}

/// Statistics about the whole index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Total number of files in the index
    pub total_files: u64,

    /// Total number of directories in the index
    pub total_dirs: u64,

    /// Number of volumes indexed
    pub volume_count: u32,

    /// When the index was last rebuilt
    pub last_rebuilt: Option<DateTime<Utc>>,
}

impl IndexStats {
    /// Total number of entries (files + directories)
    pub fn total_entries(&self) -> u64 {
        self.total_files + self.total_dirs
    }
}
