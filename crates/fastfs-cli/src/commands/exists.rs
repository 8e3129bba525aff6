//! Exists command - check whether a path exists.

use crate::app::App;
use fastfs_core::Config;

/// What kind of entry `exists` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wanted {
    Any,
    File,
    Directory,
}

impl Wanted {
    pub fn from_flags(dir: bool, file: bool) -> Self {
        match (dir, file) {
            (true, _) => Wanted::Directory,
            (false, true) => Wanted::File,
            (false, false) => Wanted::Any,
        }
    }
}

/// Check `path` against the facade.
pub fn check(app: &App, path: &str, wanted: Wanted) -> bool {
    match wanted {
        Wanted::File => app.access.file_exists(path),
        Wanted::Directory => app.access.directory_exists(path),
        Wanted::Any => app.access.file_exists(path) || app.access.directory_exists(path),
    }
}

/// Print the answer for `path` and release the app's volume handles.
pub fn answer(app: App, path: &str, wanted: Wanted) -> bool {
    let found = check(&app, path, wanted);

    println!("{}", found);
    eprintln!("(answered by {})", app.source(path));

    found
}

/// Run the exists command. Returns whether the path was found.
pub fn run(config: Config, path: &str, dir: bool, file: bool) -> anyhow::Result<bool> {
    Ok(answer(App::new(config), path, Wanted::from_flags(dir, file)))
}
