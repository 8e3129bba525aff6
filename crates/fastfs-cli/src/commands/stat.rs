//! Stat command - show information about a path.

use crate::app::App;
use crate::OutputFormat;
use chrono::{DateTime, Utc};
use fastfs_core::Config;
use serde::Serialize;

/// What the facade knows about one path.
#[derive(Debug, Serialize)]
pub struct PathInfo {
    pub path: String,
    pub kind: &'static str,
    pub created: Option<DateTime<Utc>>,
    pub system: bool,
    pub source: &'static str,
}

/// Query every property of `path`.
pub fn inspect(app: &App, path: &str) -> PathInfo {
    let access = &app.access;
    let (kind, created) = if access.directory_exists(path) {
        ("directory", access.directory_creation_time(path))
    } else if access.file_exists(path) {
        ("file", access.file_creation_time(path))
    } else {
        ("missing", None)
    };

    PathInfo {
        path: path.to_string(),
        kind,
        created,
        system: kind == "directory" && access.has_system_attribute(path),
        source: app.source(path),
    }
}

/// Run the stat command.
pub fn run(config: Config, path: &str, output: OutputFormat) -> anyhow::Result<()> {
    let app = App::new(config);
    let info = inspect(&app, path);

    match output {
        OutputFormat::Text => {
            println!("Path:    {}", info.path);
            println!("Kind:    {}", info.kind);
            if let Some(created) = info.created {
                println!("Created: {}", created.format("%Y-%m-%d %H:%M:%S"));
            }
            if info.kind == "directory" {
                println!("System:  {}", if info.system { "yes" } else { "no" });
            }
            println!("Source:  {}", info.source);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }

    Ok(())
}
