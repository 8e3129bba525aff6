//! Ls command - list entries below a directory.

use crate::app::App;
use crate::OutputFormat;
use fastfs_core::{Config, SearchScope};
use std::time::Instant;

/// Collect the listing for `path`.
pub fn list(
    app: &App,
    path: &str,
    scope: SearchScope,
    dirs: bool,
    pattern: Option<&str>,
) -> anyhow::Result<Vec<String>> {
    let access = &app.access;
    let entries = match (pattern, dirs) {
        (Some(p), true) => access.list_directories_matching(path, p, scope)?,
        (Some(p), false) => access.list_files_matching(path, p, scope)?,
        (None, true) => access.list_directories(path, scope),
        (None, false) => access.list_files(path, scope),
    };
    Ok(entries)
}

/// Run the ls command.
pub fn run(
    config: Config,
    path: &str,
    recursive: bool,
    dirs: bool,
    pattern: Option<&str>,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let app = App::new(config);
    let scope = if recursive {
        SearchScope::Recursive
    } else {
        SearchScope::Immediate
    };

    let start = Instant::now();
    let entries = list(&app, path, scope, dirs, pattern)?;
    let elapsed = start.elapsed();

    match output {
        OutputFormat::Text => {
            for entry in &entries {
                println!("{}", entry);
            }

            eprintln!();
            eprintln!(
                "{} {} in {:.3}ms (answered by {})",
                entries.len(),
                if dirs { "directories" } else { "files" },
                elapsed.as_secs_f64() * 1000.0,
                app.source(path)
            );
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "path": path,
                "scope": scope,
                "kind": if dirs { "directory" } else { "file" },
                "pattern": pattern,
                "source": app.source(path),
                "entries": entries,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
