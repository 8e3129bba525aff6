//! Direct OS filesystem access.
//!
//! Queries on volumes that are not indexed go through an `OsFilesystem`.
//! `StdFilesystem` answers them with `std::fs`; tests substitute their own
//! implementation to observe which calls reach the OS.
//!
//! ## Error Handling
//!
//! None of these calls fail. Existence checks report `false` for any error
//! (permission denied, path too long, not found). A listing of a directory
//! that cannot be read is empty, and during a recursive listing unreadable
//! subdirectories are skipped while the rest of the walk continues.

use crate::types::SearchScope;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// The OS primitives used when no index covers a path.
pub trait OsFilesystem: Send + Sync {
    fn file_exists(&self, path: &str) -> bool;

    fn directory_exists(&self, path: &str) -> bool;

    /// Full paths of files below `path`.
    fn list_files(&self, path: &str, scope: SearchScope) -> Vec<String>;

    /// Full paths of directories below `path`.
    fn list_directories(&self, path: &str, scope: SearchScope) -> Vec<String>;

    /// Whether the directory at `path` carries the system attribute.
    fn has_system_attribute(&self, path: &str) -> bool;

    fn creation_time(&self, path: &str) -> Option<DateTime<Utc>>;
}

/// `OsFilesystem` backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFilesystem;

impl StdFilesystem {
    pub fn new() -> Self {
        StdFilesystem
    }

    /// Walk below `root`, collecting entries whose kind matches `want_dirs`.
    fn walk(&self, root: &str, scope: SearchScope, want_dirs: bool) -> Vec<String> {
        let mut results = Vec::new();
        let mut stack = vec![PathBuf::from(root)];

        while let Some(dir) = stack.pop() {
            let entries = match fs::read_dir(&dir) {
                Ok(e) => e,
                Err(e) => {
                    debug!(path = %dir.display(), error = %e, "Failed to read directory");
                    continue;
                }
            };

            for entry in entries.flatten() {
                let file_type = match entry.file_type() {
                    Ok(t) => t,
                    Err(_) => continue,
                };
                let path = entry.path();

                // links to directories are listed but never followed
                let is_dir =
                    file_type.is_dir() || (file_type.is_symlink() && path.is_dir());

                if is_dir == want_dirs {
                    results.push(path.to_string_lossy().to_string());
                }
                if scope == SearchScope::Recursive && file_type.is_dir() {
                    stack.push(path);
                }
            }
        }

        results.sort();
        results
    }
}

impl OsFilesystem for StdFilesystem {
    fn file_exists(&self, path: &str) -> bool {
        fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
    }

    fn directory_exists(&self, path: &str) -> bool {
        fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
    }

    fn list_files(&self, path: &str, scope: SearchScope) -> Vec<String> {
        self.walk(path, scope, false)
    }

    fn list_directories(&self, path: &str, scope: SearchScope) -> Vec<String> {
        self.walk(path, scope, true)
    }

    fn has_system_attribute(&self, path: &str) -> bool {
        match fs::metadata(path) {
            Ok(metadata) => metadata.is_dir() && is_system(&metadata),
            Err(_) => false,
        }
    }

    fn creation_time(&self, path: &str) -> Option<DateTime<Utc>> {
        fs::metadata(path)
            .and_then(|m| m.created())
            .ok()
            .map(DateTime::<Utc>::from)
    }
}

#[cfg(windows)]
fn is_system(metadata: &fs::Metadata) -> bool {
    use crate::types::NodeAttributes;
    use std::os::windows::fs::MetadataExt;

    NodeAttributes::from_bits_truncate(metadata.file_attributes())
        .contains(NodeAttributes::SYSTEM)
}

#[cfg(not(windows))]
fn is_system(_metadata: &fs::Metadata) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn sample_dir() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("Apps").join("Tools")).unwrap();
        fs::write(root.join("Apps").join("a.exe"), b"x").unwrap();
        fs::write(root.join("Apps").join("Tools").join("t.dll"), b"x").unwrap();
        fs::write(root.join("readme.txt"), b"x").unwrap();
        temp_dir
    }

    fn as_str(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_exists() {
        let temp_dir = sample_dir();
        let os = StdFilesystem::new();
        let apps = as_str(&temp_dir.path().join("Apps"));
        let exe = as_str(&temp_dir.path().join("Apps").join("a.exe"));

        assert!(os.directory_exists(&apps));
        assert!(!os.file_exists(&apps));
        assert!(os.file_exists(&exe));
        assert!(!os.directory_exists(&exe));
        assert!(!os.file_exists(&as_str(&temp_dir.path().join("missing"))));
    }

    #[test]
    fn test_list_immediate() {
        let temp_dir = sample_dir();
        let os = StdFilesystem::new();
        let root = as_str(temp_dir.path());

        assert_eq!(
            os.list_files(&root, SearchScope::Immediate),
            vec![as_str(&temp_dir.path().join("readme.txt"))]
        );
        assert_eq!(
            os.list_directories(&root, SearchScope::Immediate),
            vec![as_str(&temp_dir.path().join("Apps"))]
        );
    }

    #[test]
    fn test_list_recursive() {
        let temp_dir = sample_dir();
        let os = StdFilesystem::new();
        let root = as_str(temp_dir.path());

        let files = os.list_files(&root, SearchScope::Recursive);
        assert_eq!(files.len(), 3);
        assert!(files.contains(&as_str(&temp_dir.path().join("Apps").join("Tools").join("t.dll"))));

        let dirs = os.list_directories(&root, SearchScope::Recursive);
        assert_eq!(dirs.len(), 2);
    }

    #[test]
    fn test_list_missing_directory_is_empty() {
        let temp_dir = sample_dir();
        let os = StdFilesystem::new();
        let missing = as_str(&temp_dir.path().join("missing"));

        assert!(os.list_files(&missing, SearchScope::Recursive).is_empty());
        assert!(os.list_directories(&missing, SearchScope::Immediate).is_empty());
    }

    #[test]
    fn test_creation_time_and_attributes() {
        let temp_dir = sample_dir();
        let os = StdFilesystem::new();
        let apps = as_str(&temp_dir.path().join("Apps"));

        assert!(os.creation_time(&as_str(&temp_dir.path().join("missing"))).is_none());
        assert!(!os.has_system_attribute(&as_str(&temp_dir.path().join("missing"))));
        assert!(!os.has_system_attribute(&apps));
    }
}
