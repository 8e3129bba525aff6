//! Application state management.

use fastfs_backend_ntfs::NtfsBackend;
use fastfs_core::{Config, FastFilesystemAccess, RebuildReport, VolumeScanner};
use tracing::info;

/// Application state: a built facade plus the report of its build.
pub struct App {
    /// Configuration
    pub config: Config,

    /// Query facade
    pub access: FastFilesystemAccess,

    /// Outcome of the initial build
    pub report: RebuildReport,
}

impl App {
    /// Index local volumes with the NTFS backend.
    pub fn new(config: Config) -> Self {
        Self::with_scanner(NtfsBackend::new(), config)
    }

    /// Index with an arbitrary scanner.
    pub fn with_scanner(scanner: impl VolumeScanner + 'static, config: Config) -> Self {
        let mut access = FastFilesystemAccess::new(scanner, config.clone());
        let report = access.rebuild();

        info!(
            indexed = report.indexed.len(),
            skipped = report.skipped.len(),
            "Application initialized"
        );

        App {
            config,
            access,
            report,
        }
    }

    /// Where queries for `path` are answered, for display.
    pub fn source(&self, path: &str) -> &'static str {
        if self.access.is_indexed(path) {
            "index"
        } else {
            "os"
        }
    }
}
