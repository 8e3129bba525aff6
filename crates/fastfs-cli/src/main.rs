//! # fastfs CLI
//!
//! Command-line interface to the fastfs query layer.
//!
//! ## Commands
//!
//! - `fastfs exists <path>` - Check whether a file or directory exists
//! - `fastfs ls <path>` - List files or directories below a directory
//! - `fastfs stat <path>` - Show kind, creation time and attributes
//! - `fastfs volumes` - Show which volumes are indexed and why others are not
//!
//! ## Example Usage
//!
//! ```bash
//! # Index every NTFS volume (requires admin) and list a directory
//! fastfs ls "C:\Program Files" --dirs
//!
//! # Recursive listing filtered by name
//! fastfs ls C:\Projects --recursive --pattern "*.rs"
//! ```

mod app;
mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// fastfs - Filesystem queries from an in-memory volume index
#[derive(Parser)]
#[command(name = "fastfs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a path exists
    Exists {
        /// Path to check (e.g., "C:\Windows")
        path: String,

        /// Only accept a directory
        #[arg(short, long, conflicts_with = "file")]
        dir: bool,

        /// Only accept a file
        #[arg(short, long)]
        file: bool,
    },

    /// List entries below a directory
    Ls {
        /// Directory to list
        path: String,

        /// Include every level below the directory
        #[arg(short, long)]
        recursive: bool,

        /// List directories instead of files
        #[arg(short, long)]
        dirs: bool,

        /// Wildcard filter on entry names (e.g., "*.txt")
        #[arg(short, long)]
        pattern: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Show information about a path
    Stat {
        /// Path to inspect
        path: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Show indexed and skipped volumes
    Volumes {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },
}

#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => fastfs_core::Config::load_from(path)?,
        None => fastfs_core::Config::load()?,
    };

    // Setup logging
    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.general.log_level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();

    // Execute command
    match cli.command {
        Commands::Exists { path, dir, file } => {
            // volume handles are released before run returns
            if !commands::exists::run(config, &path, dir, file)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Ls {
            path,
            recursive,
            dirs,
            pattern,
            output,
        } => commands::ls::run(config, &path, recursive, dirs, pattern.as_deref(), output),
        Commands::Stat { path, output } => commands::stat::run(config, &path, output),
        Commands::Volumes { output } => commands::volumes::run(config, output),
    }
}
