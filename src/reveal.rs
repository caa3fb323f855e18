use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

#[cfg(target_os = "macos")]
const OPENER: &str = "open";
#[cfg(target_os = "windows")]
const OPENER: &str = "explorer";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const OPENER: &str = "xdg-open";

/// Show `dir` in the desktop file browser. Best effort: failures are only logged.
pub fn reveal(dir: &Path) {
    let spawned = Command::new(OPENER)
        .arg(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    match spawned {
        Ok(_) => debug!(dir = %dir.display(), "opened file browser"),
        Err(e) => debug!(dir = %dir.display(), error = %e, "could not open file browser"),
    }
}
