//! File logging. The terminal belongs to the TUI, so logs go to disk.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `GLYPHFALL_LOG=debug`.
pub const LOG_ENV: &str = "GLYPHFALL_LOG";

const LOG_FILE_NAME: &str = "glyphfall.log";

/// Install the global subscriber writing to the data directory.
///
/// Returns the log file path, or `None` when no file could be opened; the
/// app then runs without logging.
pub fn init() -> Option<PathBuf> {
    let dir = ProjectDirs::from("", "", "glyphfall")?
        .data_local_dir()
        .to_path_buf();
    fs::create_dir_all(&dir).ok()?;
    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(path)
}
