//! # fastfs Core Library
//!
//! This crate answers filesystem queries (existence, listings, attributes,
//! creation times) from an in-memory index of each local volume, falling back
//! to ordinary OS calls for any volume that is not indexed. It is
//! platform-agnostic: raw volume access lives behind the `VolumeScanner`
//! trait and is implemented by backend crates.
//!
//! ## Architecture
//!
//! - **Backend** (`backend`): Scanner traits and volume descriptions
//! - **Types** (`types`): Node records, volume keys, scopes and stats
//! - **Builder** (`builder`): Reconstructs a volume tree from a flat scan
//! - **Tree** (`tree`): Arena-backed volume hierarchy
//! - **Index** (`index`): All indexed volumes and their handles
//! - **Resolver** (`resolver`): Path routing and resolution
//! - **Fallback** (`fallback`): Direct OS access
//! - **Access** (`access`): The query facade
//! - **Config** (`config`): Configuration management
//!
//! ## Example
//!
//! ```rust,ignore
//! use fastfs_core::{Config, FastFilesystemAccess, SearchScope};
//!
//! let fs = FastFilesystemAccess::open(scanner, Config::load()?);
//! if fs.directory_exists("C:\\Windows") {
//!     for path in fs.list_files("C:\\Windows", SearchScope::Immediate) {
//!         println!("{}", path);
//!     }
//! }
//! ```

pub mod access;
pub mod backend;
pub mod builder;
pub mod config;
pub mod error;
pub mod fallback;
pub mod index;
pub mod memory;
pub mod pattern;
pub mod resolver;
pub mod tree;
pub mod types;

// Re-export commonly used types
pub use access::{FastFilesystemAccess, IndexedVolume, RebuildReport, SkipReason, SkippedVolume};
pub use backend::{DriveType, RetrieveMode, VolumeHandle, VolumeInfo, VolumeScanner};
pub use builder::IndexBuilder;
pub use config::Config;
pub use error::{FastFsError, Result};
pub use fallback::{OsFilesystem, StdFilesystem};
pub use index::VolumeIndex;
pub use memory::MemoryScanner;
pub use pattern::NamePattern;
pub use resolver::{PathResolver, Route};
pub use tree::{NodeRef, VolumeTree};
pub use types::{
    IndexStats, NodeAttributes, NodeId, NodeRecord, SearchScope, VolumeKey, VolumeStats,
};
