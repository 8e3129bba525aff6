//! The query facade.
//!
//! `FastFilesystemAccess` owns the volume index for its whole lifecycle:
//! `rebuild()` tears down the previous index and scans every eligible volume,
//! queries are routed per call to the index or to the OS, and `release()` (or
//! dropping the facade) closes every volume handle.
//!
//! ## Degraded operation
//!
//! A volume that cannot be indexed is never an error for the caller. It is
//! recorded as skipped in the `RebuildReport` and every query against it is
//! answered by the `OsFilesystem`. The same holds for all volumes when the
//! scanner cannot enumerate them at all.

use crate::backend::{DriveType, VolumeInfo, VolumeScanner};
use crate::builder::IndexBuilder;
use crate::config::Config;
use crate::error::{FastFsError, Result};
use crate::fallback::{OsFilesystem, StdFilesystem};
use crate::index::VolumeIndex;
use crate::pattern::NamePattern;
use crate::resolver::{entries, resolve_in, PathResolver, Route};
use crate::types::{IndexStats, SearchScope, VolumeKey, VolumeStats};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Why a volume was left out of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    NotReady,
    UnsupportedDriveType(DriveType),
    UnsupportedFormat(String),
    ExcludedByConfig,
    OpenFailed(String),
    ScanFailed(String),
    BuildFailed(String),
}

impl SkipReason {
    fn from_error(err: &FastFsError) -> Self {
        match err {
            FastFsError::VolumeOpen { reason, .. } => SkipReason::OpenFailed(reason.clone()),
            FastFsError::VolumeScan { reason, .. } => SkipReason::ScanFailed(reason.clone()),
            other => SkipReason::BuildFailed(other.to_string()),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotReady => write!(f, "not ready"),
            SkipReason::UnsupportedDriveType(t) => write!(f, "unsupported drive type: {}", t),
            SkipReason::UnsupportedFormat(fs) if fs.is_empty() => write!(f, "unknown filesystem"),
            SkipReason::UnsupportedFormat(fs) => write!(f, "unsupported filesystem: {}", fs),
            SkipReason::ExcludedByConfig => write!(f, "excluded by configuration"),
            SkipReason::OpenFailed(reason) => write!(f, "open failed: {}", reason),
            SkipReason::ScanFailed(reason) => write!(f, "scan failed: {}", reason),
            SkipReason::BuildFailed(reason) => write!(f, "build failed: {}", reason),
        }
    }
}

/// A volume that made it into the index.
#[derive(Debug, Clone, Serialize)]
pub struct IndexedVolume {
    pub key: VolumeKey,
    pub mount_point: String,
    pub filesystem: String,
    pub stats: VolumeStats,
}

/// A volume whose queries go to the OS.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedVolume {
    pub key: VolumeKey,
    pub mount_point: String,
    pub reason: SkipReason,
}

/// Outcome of one `rebuild()`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RebuildReport {
    /// Handles released from the previous build
    pub released: usize,
    pub indexed: Vec<IndexedVolume>,
    pub skipped: Vec<SkippedVolume>,
    pub elapsed_ms: u64,
}

/// Filesystem queries answered from per-volume indexes, falling back to the OS.
pub struct FastFilesystemAccess {
    scanner: Box<dyn VolumeScanner>,
    os: Box<dyn OsFilesystem>,
    config: Config,
    index: VolumeIndex,
}

impl FastFilesystemAccess {
    /// Create a facade with nothing indexed yet.
    ///
    /// Until `rebuild()` is called every query goes to the OS.
    pub fn new(scanner: impl VolumeScanner + 'static, config: Config) -> Self {
        FastFilesystemAccess {
            scanner: Box::new(scanner),
            os: Box::new(StdFilesystem::new()),
            config,
            index: VolumeIndex::new(),
        }
    }

    /// Create a facade and build the index right away.
    pub fn open(scanner: impl VolumeScanner + 'static, config: Config) -> Self {
        let mut access = Self::new(scanner, config);
        access.rebuild();
        access
    }

    /// Replace the OS fallback.
    pub fn with_os(mut self, os: impl OsFilesystem + 'static) -> Self {
        self.os = Box::new(os);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn index(&self) -> &VolumeIndex {
        &self.index
    }

    pub fn resolver(&self) -> PathResolver<'_> {
        PathResolver::new(&self.index)
    }

    /// Discard the current index and scan every eligible volume again.
    ///
    /// All previous handles are released before the first volume is opened.
    #[instrument(skip(self), fields(scanner = self.scanner.name()))]
    pub fn rebuild(&mut self) -> RebuildReport {
        let start = Instant::now();
        let mut report = RebuildReport {
            released: self.index.clear(),
            ..Default::default()
        };

        if !self.config.scan.enabled {
            info!("Indexing disabled, all queries use the OS");
            return report;
        }

        let volumes = match self.scanner.list_volumes() {
            Ok(volumes) => volumes,
            Err(e) => {
                warn!(error = %e, "Failed to enumerate volumes, all queries use the OS");
                return report;
            }
        };

        for volume in volumes {
            let outcome = match self.check_eligible(&volume) {
                Some(reason) => Err(reason),
                None => self
                    .index_volume(&volume)
                    .map_err(|e| SkipReason::from_error(&e)),
            };

            match outcome {
                Ok(stats) => {
                    info!(
                        volume = %volume.key,
                        mount = %volume.mount_point,
                        files = stats.files,
                        dirs = stats.directories,
                        "Volume indexed"
                    );
                    report.indexed.push(IndexedVolume {
                        key: volume.key,
                        mount_point: volume.mount_point,
                        filesystem: volume.filesystem,
                        stats,
                    });
                }
                Err(reason) => {
                    warn!(
                        volume = %volume.key,
                        mount = %volume.mount_point,
                        reason = %reason,
                        "Volume not indexed, queries will use the OS"
                    );
                    report.skipped.push(SkippedVolume {
                        key: volume.key,
                        mount_point: volume.mount_point,
                        reason,
                    });
                }
            }
        }

        report.elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            indexed = report.indexed.len(),
            skipped = report.skipped.len(),
            elapsed_ms = report.elapsed_ms,
            "Rebuild complete"
        );
        report
    }

    fn check_eligible(&self, volume: &VolumeInfo) -> Option<SkipReason> {
        if !volume.is_ready {
            return Some(SkipReason::NotReady);
        }
        if !volume.drive_type.is_indexable() {
            return Some(SkipReason::UnsupportedDriveType(volume.drive_type));
        }
        if !self.config.accepts_format(&volume.filesystem) {
            return Some(SkipReason::UnsupportedFormat(volume.filesystem.clone()));
        }
        if !self.config.should_index_volume(&volume.mount_point) {
            return Some(SkipReason::ExcludedByConfig);
        }
        None
    }

    /// Open, scan and build one volume. The handle is dropped on any failure.
    fn index_volume(&mut self, volume: &VolumeInfo) -> Result<VolumeStats> {
        let mut handle = self
            .scanner
            .open(volume, self.config.scan.retrieve_mode)
            .map_err(|e| FastFsError::VolumeOpen {
                volume: volume.mount_point.clone(),
                reason: format!("{:#}", e),
            })?;

        let records = handle
            .nodes(&volume.mount_point)
            .map_err(|e| FastFsError::VolumeScan {
                volume: volume.mount_point.clone(),
                reason: format!("{:#}", e),
            })?;

        let tree = IndexBuilder::new(volume.key.clone()).build(records)?;
        let stats = tree.stats();
        self.index.insert(handle, tree);
        Ok(stats)
    }

    /// Release every volume handle and empty the index.
    ///
    /// Safe to call repeatedly; returns the number of handles released.
    pub fn release(&mut self) -> usize {
        let released = self.index.clear();
        if released > 0 {
            info!(released, "Released volume handles");
        }
        released
    }

    /// Whether queries for `path` are answered from the index.
    pub fn is_indexed(&self, path: &str) -> bool {
        matches!(self.resolver().route(path), Route::Indexed(_))
    }

    pub fn indexed_volumes(&self) -> Vec<VolumeKey> {
        self.index.keys()
    }

    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }

    pub fn file_exists(&self, path: &str) -> bool {
        match self.resolver().route(path) {
            Route::Indexed(tree) => resolve_in(tree, path, false).is_some(),
            Route::Fallback => {
                debug!(path, "file_exists via OS");
                self.os.file_exists(path)
            }
        }
    }

    pub fn directory_exists(&self, path: &str) -> bool {
        match self.resolver().route(path) {
            Route::Indexed(tree) => resolve_in(tree, path, true).is_some(),
            Route::Fallback => {
                debug!(path, "directory_exists via OS");
                self.os.directory_exists(path)
            }
        }
    }

    /// Full paths of the files below the directory at `path`.
    ///
    /// A missing directory yields an empty list.
    pub fn list_files(&self, path: &str, scope: SearchScope) -> Vec<String> {
        self.list(path, scope, false, None)
    }

    /// Full paths of the directories below the directory at `path`.
    pub fn list_directories(&self, path: &str, scope: SearchScope) -> Vec<String> {
        self.list(path, scope, true, None)
    }

    /// Like `list_files`, keeping only names that match a `*`/`?` pattern.
    pub fn list_files_matching(
        &self,
        path: &str,
        pattern: &str,
        scope: SearchScope,
    ) -> Result<Vec<String>> {
        let pattern = NamePattern::new(pattern)?;
        Ok(self.list(path, scope, false, Some(&pattern)))
    }

    /// Like `list_directories`, keeping only names that match a pattern.
    pub fn list_directories_matching(
        &self,
        path: &str,
        pattern: &str,
        scope: SearchScope,
    ) -> Result<Vec<String>> {
        let pattern = NamePattern::new(pattern)?;
        Ok(self.list(path, scope, true, Some(&pattern)))
    }

    fn list(
        &self,
        path: &str,
        scope: SearchScope,
        want_dirs: bool,
        pattern: Option<&NamePattern>,
    ) -> Vec<String> {
        let pattern = pattern.filter(|p| !p.is_match_all());

        match self.resolver().route(path) {
            Route::Indexed(tree) => {
                let Some(dir) = resolve_in(tree, path, true) else {
                    return Vec::new();
                };
                entries(dir, scope)
                    .filter(|node| node.is_dir() == want_dirs)
                    .filter(|node| pattern.map_or(true, |p| p.matches(node.record().name())))
                    .map(|node| node.path().to_string())
                    .collect()
            }
            Route::Fallback => {
                debug!(path, %scope, want_dirs, "Listing via OS");
                let listed = if want_dirs {
                    self.os.list_directories(path, scope)
                } else {
                    self.os.list_files(path, scope)
                };
                match pattern {
                    Some(p) => listed.into_iter().filter(|e| p.matches_path(e)).collect(),
                    None => listed,
                }
            }
        }
    }

    /// Whether the directory at `path` has the system attribute.
    ///
    /// Files and missing paths report `false`.
    pub fn has_system_attribute(&self, path: &str) -> bool {
        match self.resolver().route(path) {
            Route::Indexed(tree) => resolve_in(tree, path, true)
                .map(|node| node.record().is_system())
                .unwrap_or(false),
            Route::Fallback => self.os.has_system_attribute(path),
        }
    }

    /// Creation time of the directory at `path`, or `None` if it is absent.
    pub fn directory_creation_time(&self, path: &str) -> Option<DateTime<Utc>> {
        self.creation_time(path, true)
    }

    /// Creation time of the file at `path`, or `None` if it is absent.
    pub fn file_creation_time(&self, path: &str) -> Option<DateTime<Utc>> {
        self.creation_time(path, false)
    }

    fn creation_time(&self, path: &str, want_directory: bool) -> Option<DateTime<Utc>> {
        match self.resolver().route(path) {
            Route::Indexed(tree) => {
                let node = resolve_in(tree, path, want_directory)?;
                // minimal scans carry no timestamps
                node.record()
                    .created
                    .or_else(|| self.os.creation_time(path))
            }
            Route::Fallback => self.os.creation_time(path),
        }
    }
}

impl Drop for FastFilesystemAccess {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for FastFilesystemAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FastFilesystemAccess")
            .field("scanner", &self.scanner.name())
            .field("index", &self.index)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RetrieveMode;
    use crate::memory::MemoryScanner;
    use crate::types::{NodeAttributes, NodeId, NodeRecord};
    use chrono::TimeZone;
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::sync::Arc;

    /// OS double that answers from fixed path sets and records every call.
    #[derive(Clone, Default)]
    struct RecordingOs {
        files: HashSet<String>,
        dirs: HashSet<String>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingOs {
        fn with_file(mut self, path: &str) -> Self {
            self.files.insert(path.to_string());
            self
        }

        fn with_dir(mut self, path: &str) -> Self {
            self.dirs.insert(path.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }

        fn record(&self, call: &str, path: &str) {
            self.calls.lock().push(format!("{} {}", call, path));
        }

        fn below(&self, set: &HashSet<String>, path: &str, scope: SearchScope) -> Vec<String> {
            let prefix = format!("{}\\", path.trim_end_matches('\\'));
            let mut found: Vec<String> = set
                .iter()
                .filter(|p| p.starts_with(&prefix))
                .filter(|p| scope == SearchScope::Recursive || !p[prefix.len()..].contains('\\'))
                .cloned()
                .collect();
            found.sort();
            found
        }
    }

    impl OsFilesystem for RecordingOs {
        fn file_exists(&self, path: &str) -> bool {
            self.record("file_exists", path);
            self.files.contains(path)
        }

        fn directory_exists(&self, path: &str) -> bool {
            self.record("directory_exists", path);
            self.dirs.contains(path)
        }

        fn list_files(&self, path: &str, scope: SearchScope) -> Vec<String> {
            self.record("list_files", path);
            self.below(&self.files, path, scope)
        }

        fn list_directories(&self, path: &str, scope: SearchScope) -> Vec<String> {
            self.record("list_directories", path);
            self.below(&self.dirs, path, scope)
        }

        fn has_system_attribute(&self, path: &str) -> bool {
            self.record("has_system_attribute", path);
            false
        }

        fn creation_time(&self, path: &str) -> Option<DateTime<Utc>> {
            self.record("creation_time", path);
            Some(os_time())
        }
    }

    fn os_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap()
    }

    fn scan_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 6, 1, 12, 0, 0).unwrap()
    }

    fn c_records() -> Vec<NodeRecord> {
        vec![
            NodeRecord::directory(NodeId::new(5), "C:\\"),
            NodeRecord::directory(NodeId::new(20), "C:\\Apps").with_created(scan_time()),
            NodeRecord::file(NodeId::new(21), "C:\\Apps\\a.exe"),
        ]
    }

    fn d_records() -> Vec<NodeRecord> {
        vec![NodeRecord::file(NodeId::new(20), "D:\\x.txt")]
    }

    fn two_volumes() -> MemoryScanner {
        MemoryScanner::new()
            .with_volume(VolumeInfo::new("C:\\", "NTFS"), c_records())
            .with_volume(VolumeInfo::new("D:\\", "NTFS"), d_records())
    }

    fn access(scanner: &MemoryScanner, os: &RecordingOs) -> FastFilesystemAccess {
        FastFilesystemAccess::new(scanner.clone(), Config::default()).with_os(os.clone())
    }

    #[test]
    fn test_two_level_tree_queries() {
        let scanner = two_volumes();
        let os = RecordingOs::default();
        let mut fs = access(&scanner, &os);
        fs.rebuild();

        assert!(fs.directory_exists("C:\\Apps"));
        assert!(fs.file_exists("C:\\Apps\\a.exe"));
        assert_eq!(
            fs.list_files("C:\\Apps", SearchScope::Immediate),
            vec!["C:\\Apps\\a.exe".to_string()]
        );
        assert!(!fs.directory_exists("C:\\Apps2"));
        assert!(os.calls().is_empty());
    }

    #[test]
    fn test_nothing_built_uses_os() {
        let scanner = two_volumes();
        let os = RecordingOs::default().with_dir("C:\\Apps");
        let fs = access(&scanner, &os);

        assert!(fs.directory_exists("C:\\Apps"));
        assert!(!fs.file_exists("C:\\Apps\\a.exe"));
        assert_eq!(os.calls().len(), 2);
        assert_eq!(scanner.total_opened(), 0);
    }

    #[test]
    fn test_open_failure_falls_back() {
        let scanner = two_volumes().with_open_failure("D", "access denied");
        let os = RecordingOs::default().with_file("D:\\x.txt");
        let mut fs = access(&scanner, &os);

        let report = fs.rebuild();
        assert_eq!(report.indexed.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(report.skipped[0].reason, SkipReason::OpenFailed(_)));

        assert!(!fs.is_indexed("D:\\x.txt"));
        assert!(fs.file_exists("D:\\x.txt"));
        assert!(!fs.file_exists("D:\\y.txt"));
        assert_eq!(os.calls(), vec!["file_exists D:\\x.txt", "file_exists D:\\y.txt"]);
    }

    #[test]
    fn test_scan_failure_releases_handle() {
        let scanner = two_volumes().with_scan_failure("D", "device error");
        let os = RecordingOs::default();
        let mut fs = access(&scanner, &os);

        let report = fs.rebuild();
        assert!(matches!(report.skipped[0].reason, SkipReason::ScanFailed(_)));
        assert_eq!(scanner.open_handles(), 1);
        assert_eq!(fs.indexed_volumes(), vec![VolumeKey::new("c")]);
    }

    #[test]
    fn test_build_failure_excludes_volume() {
        let scanner = MemoryScanner::new().with_volume(
            VolumeInfo::new("C:\\", "NTFS"),
            vec![NodeRecord::file(NodeId::new(30), "C:\\Missing\\orphan.txt")],
        );
        let os = RecordingOs::default().with_file("C:\\Missing\\orphan.txt");
        let mut fs = access(&scanner, &os);

        let report = fs.rebuild();
        assert!(report.indexed.is_empty());
        assert!(matches!(report.skipped[0].reason, SkipReason::BuildFailed(_)));
        assert_eq!(scanner.open_handles(), 0);
        assert!(fs.file_exists("C:\\Missing\\orphan.txt"));
    }

    #[test]
    fn test_file_root_excludes_volume() {
        let scanner = MemoryScanner::new().with_volume(
            VolumeInfo::new("C:\\", "NTFS"),
            vec![
                NodeRecord::file(NodeId::new(5), "C:\\"),
                NodeRecord::directory(NodeId::new(20), "C:\\Apps"),
            ],
        );
        let os = RecordingOs::default().with_dir("C:\\").with_dir("C:\\Apps");
        let mut fs = access(&scanner, &os);

        let report = fs.rebuild();
        assert!(report.indexed.is_empty());
        assert!(matches!(report.skipped[0].reason, SkipReason::BuildFailed(_)));
        assert_eq!(scanner.open_handles(), 0);

        assert!(!fs.is_indexed("C:\\"));
        assert!(fs.directory_exists("C:\\"));
        assert!(!fs.file_exists("C:\\"));
        assert!(fs.directory_exists("C:\\Apps"));
        assert_eq!(os.calls().len(), 3);
    }

    #[test]
    fn test_ineligible_volumes_skipped() {
        let scanner = MemoryScanner::new()
            .with_volume(VolumeInfo::new("C:\\", "NTFS"), c_records())
            .with_volume(VolumeInfo::new("E:\\", "").with_ready(false), Vec::new())
            .with_volume(
                VolumeInfo::new("F:\\", "NTFS").with_drive_type(DriveType::Network),
                Vec::new(),
            )
            .with_volume(VolumeInfo::new("G:\\", "FAT32"), Vec::new())
            .with_volume(VolumeInfo::new("H:\\", "NTFS"), Vec::new());
        let mut config = Config::default();
        config.volumes.exclude = vec!["H:".to_string()];
        let mut fs = FastFilesystemAccess::new(scanner.clone(), config);

        let report = fs.rebuild();
        let reasons: Vec<_> = report.skipped.iter().map(|s| s.reason.clone()).collect();
        assert_eq!(
            reasons,
            vec![
                SkipReason::NotReady,
                SkipReason::UnsupportedDriveType(DriveType::Network),
                SkipReason::UnsupportedFormat("FAT32".to_string()),
                SkipReason::ExcludedByConfig,
            ]
        );
        assert_eq!(scanner.total_opened(), 1);
    }

    #[test]
    fn test_list_failure_means_all_fallback() {
        let scanner = two_volumes().with_list_failure("no devices");
        let os = RecordingOs::default().with_dir("C:\\Apps");
        let mut fs = access(&scanner, &os);

        let report = fs.rebuild();
        assert!(report.indexed.is_empty() && report.skipped.is_empty());
        assert!(fs.directory_exists("C:\\Apps"));
        assert_eq!(os.calls(), vec!["directory_exists C:\\Apps"]);
    }

    #[test]
    fn test_disabled_indexing() {
        let scanner = two_volumes();
        let mut config = Config::default();
        config.scan.enabled = false;
        let mut fs = FastFilesystemAccess::new(scanner.clone(), config);

        fs.rebuild();
        assert!(fs.indexed_volumes().is_empty());
        assert_eq!(scanner.total_opened(), 0);
    }

    #[test]
    fn test_rebuild_releases_previous_handles() {
        let scanner = two_volumes();
        let os = RecordingOs::default();
        let mut fs = access(&scanner, &os);

        fs.rebuild();
        assert_eq!(scanner.open_handles(), 2);

        scanner.replace_records(
            "C",
            vec![NodeRecord::directory(NodeId::new(40), "C:\\Games")],
        );
        let report = fs.rebuild();

        assert_eq!(report.released, 2);
        assert_eq!(scanner.open_handles(), 2);
        assert_eq!(scanner.total_released(), 2);
        assert!(fs.directory_exists("C:\\Games"));
        assert!(!fs.directory_exists("C:\\Apps"));
    }

    #[test]
    fn test_release_is_idempotent() {
        let scanner = two_volumes();
        let mut fs = FastFilesystemAccess::open(scanner.clone(), Config::default());
        assert_eq!(scanner.open_handles(), 2);

        assert_eq!(fs.release(), 2);
        assert_eq!(fs.release(), 0);
        drop(fs);

        assert_eq!(scanner.open_handles(), 0);
        assert_eq!(scanner.total_released(), 2);
    }

    #[test]
    fn test_drop_releases_handles() {
        let scanner = two_volumes();
        {
            let _fs = FastFilesystemAccess::open(scanner.clone(), Config::default());
            assert_eq!(scanner.open_handles(), 2);
        }
        assert_eq!(scanner.open_handles(), 0);
    }

    #[test]
    fn test_release_then_queries_fall_back() {
        let scanner = two_volumes();
        let os = RecordingOs::default();
        let mut fs = access(&scanner, &os);
        fs.rebuild();
        fs.release();

        assert!(!fs.file_exists("C:\\Apps\\a.exe"));
        assert_eq!(os.calls(), vec!["file_exists C:\\Apps\\a.exe"]);
    }

    #[test]
    fn test_recursive_listing() {
        let scanner = MemoryScanner::new().with_volume(
            VolumeInfo::new("C:\\", "NTFS"),
            vec![
                NodeRecord::directory(NodeId::new(20), "C:\\A"),
                NodeRecord::directory(NodeId::new(21), "C:\\A\\B"),
                NodeRecord::file(NodeId::new(22), "C:\\A\\B\\deep.txt"),
                NodeRecord::file(NodeId::new(23), "C:\\A\\top.txt"),
            ],
        );
        let fs = FastFilesystemAccess::open(scanner, Config::default());

        assert_eq!(
            fs.list_files("C:\\A", SearchScope::Immediate),
            vec!["C:\\A\\top.txt".to_string()]
        );
        let mut files = fs.list_files("c:\\a", SearchScope::Recursive);
        files.sort();
        assert_eq!(files, vec!["C:\\A\\B\\deep.txt", "C:\\A\\top.txt"]);
        assert_eq!(fs.list_directories("C:\\", SearchScope::Recursive), vec!["C:\\A", "C:\\A\\B"]);
        assert!(fs.list_files("C:\\A\\top.txt", SearchScope::Immediate).is_empty());
        assert!(fs.list_files("C:\\Nope", SearchScope::Recursive).is_empty());
    }

    #[test]
    fn test_pattern_listing() {
        let scanner = MemoryScanner::new().with_volume(
            VolumeInfo::new("C:\\", "NTFS"),
            vec![
                NodeRecord::directory(NodeId::new(20), "C:\\Docs"),
                NodeRecord::file(NodeId::new(21), "C:\\Docs\\report.TXT"),
                NodeRecord::file(NodeId::new(22), "C:\\Docs\\notes.md"),
                NodeRecord::file(NodeId::new(23), "C:\\Docs\\a1.txt"),
            ],
        );
        let os = RecordingOs::default()
            .with_file("D:\\data\\one.txt")
            .with_file("D:\\data\\two.csv");
        let fs = FastFilesystemAccess::open(scanner, Config::default()).with_os(os);

        assert_eq!(
            fs.list_files_matching("C:\\Docs", "*.txt", SearchScope::Immediate).unwrap(),
            vec!["C:\\Docs\\a1.txt", "C:\\Docs\\report.TXT"]
        );
        assert_eq!(
            fs.list_files_matching("C:\\Docs", "a?.txt", SearchScope::Immediate).unwrap(),
            vec!["C:\\Docs\\a1.txt"]
        );
        assert_eq!(
            fs.list_files_matching("D:\\data", "*.TXT", SearchScope::Immediate).unwrap(),
            vec!["D:\\data\\one.txt"]
        );
        assert!(fs
            .list_directories_matching("C:\\", "Do*", SearchScope::Recursive)
            .unwrap()
            .contains(&"C:\\Docs".to_string()));
    }

    #[test]
    fn test_system_attribute_is_directory_only() {
        let scanner = MemoryScanner::new().with_volume(
            VolumeInfo::new("C:\\", "NTFS"),
            vec![
                NodeRecord::directory(NodeId::new(20), "C:\\System Volume Information")
                    .with_attributes(NodeAttributes::DIRECTORY | NodeAttributes::SYSTEM),
                NodeRecord::file(NodeId::new(21), "C:\\pagefile.sys")
                    .with_attributes(NodeAttributes::SYSTEM),
            ],
        );
        let fs = FastFilesystemAccess::open(scanner, Config::default());

        assert!(fs.has_system_attribute("C:\\System Volume Information"));
        assert!(!fs.has_system_attribute("C:\\pagefile.sys"));
        assert!(!fs.has_system_attribute("C:\\missing"));
    }

    #[test]
    fn test_creation_time() {
        let scanner = two_volumes();
        let os = RecordingOs::default();
        let mut fs = access(&scanner, &os);
        fs.rebuild();

        assert_eq!(fs.directory_creation_time("C:\\Apps"), Some(scan_time()));
        assert_eq!(fs.file_creation_time("C:\\Apps"), None);
        assert!(os.calls().is_empty());

        // no timestamp in the scan
        assert_eq!(fs.file_creation_time("C:\\Apps\\a.exe"), Some(os_time()));
        assert_eq!(os.calls(), vec!["creation_time C:\\Apps\\a.exe"]);
    }

    #[test]
    fn test_minimal_mode_reads_times_from_os() {
        let scanner = two_volumes();
        let os = RecordingOs::default();
        let mut config = Config::default();
        config.scan.retrieve_mode = RetrieveMode::Minimal;
        let fs = FastFilesystemAccess::open(scanner, config).with_os(os.clone());

        assert_eq!(fs.directory_creation_time("C:\\Apps"), Some(os_time()));
        assert_eq!(os.calls().len(), 1);
    }

    #[test]
    fn test_stats_and_introspection() {
        let fs = FastFilesystemAccess::open(two_volumes(), Config::default());

        assert!(fs.is_indexed("c:\\anything"));
        assert!(!fs.is_indexed("E:\\anything"));
        assert_eq!(fs.indexed_volumes(), vec![VolumeKey::new("c"), VolumeKey::new("d")]);

        let stats = fs.stats();
        assert_eq!(stats.volume_count, 2);
        assert_eq!(stats.total_files, 2);
    }
}
