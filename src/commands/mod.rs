pub mod check_range;
pub mod lock;
pub mod merge;
pub mod preview;
pub mod split;
pub mod unlock;

use chrono::Local;
use std::path::{Path, PathBuf};

/// `<stem>_<suffix>.<ext>` for `file`, e.g. `report_page_3.pdf`
pub fn append_to_name(file: &Path, suffix: &str) -> String {
    let stem = file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let ext = file.extension().and_then(|s| s.to_str()).unwrap_or("pdf");
    format!("{}_{}.{}", stem, suffix, ext)
}

/// `<prefix>-<YYYY-MM-DD>.pdf` using today's local date
pub fn dated_name(prefix: &str) -> String {
    format!("{}-{}.pdf", prefix, Local::now().format("%Y-%m-%d"))
}

/// Resolve where a single-file workflow writes its result.
///
/// No path means `default_name` next to `source`; an existing directory
/// means `default_name` inside it; anything else is taken as the file path.
pub fn resolve_output(output: Option<&Path>, source: &Path, default_name: &str) -> PathBuf {
    match output {
        Some(path) if path.is_dir() => path.join(default_name),
        Some(path) => path.to_path_buf(),
        None => source
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(default_name),
    }
}

/// Directory containing `file`, for revealing results
pub fn containing_dir(file: &Path) -> &Path {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
