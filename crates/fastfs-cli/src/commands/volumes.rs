//! Volumes command - show indexed and skipped volumes.

use crate::app::App;
use crate::OutputFormat;
use fastfs_backend_ntfs::NtfsBackend;
use fastfs_core::Config;

/// Run the volumes command.
pub fn run(config: Config, output: OutputFormat) -> anyhow::Result<()> {
    let app = App::new(config);
    let report = &app.report;

    if let OutputFormat::Json = output {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("fastfs Volumes");
    println!("==============");
    println!();

    if report.indexed.is_empty() {
        println!("No volume is indexed; every query is answered by the OS.");
    } else {
        println!("Indexed:");
        for vol in &report.indexed {
            println!(
                "  {} {} ({} files, {} directories)",
                vol.mount_point, vol.filesystem, vol.stats.files, vol.stats.directories
            );
        }
    }

    if !report.skipped.is_empty() {
        println!();
        println!("Not indexed:");
        for vol in &report.skipped {
            println!("  {} {}", vol.mount_point, vol.reason);
        }
    }

    let stats = app.access.stats();
    println!();
    println!("Summary:");
    println!("  Total files:       {}", stats.total_files);
    println!("  Total directories: {}", stats.total_dirs);
    println!("  Build time:        {}ms", report.elapsed_ms);

    if !NtfsBackend::has_elevated_privileges() {
        println!();
        println!("Not running as administrator; volumes cannot be opened for indexing.");
    }

    Ok(())
}
