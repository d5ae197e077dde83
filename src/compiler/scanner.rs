//! Record file discovery.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, SkcError};

const RECORD_EXTENSION: &str = "json";

/// Recursively enumerate record files under `root`.
///
/// Matches files whose extension is `.json` in any casing, across all
/// nested subdirectories. Paths are absolutized and sorted byte-wise so
/// discovery order never depends on how the filesystem enumerates
/// directory entries. This is not the final record order (records are
/// sorted by content later); it exists so error reporting order is
/// itself reproducible.
pub fn scan_records(root: &Path) -> Result<Vec<PathBuf>> {
    let root = std::path::absolute(root).map_err(|err| SkcError::io(root, err))?;
    if !root.is_dir() {
        return Err(SkcError::MissingDirectory(root));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(&root) {
        let entry = entry.map_err(|err| {
            let path = err
                .path()
                .map_or_else(|| root.clone(), Path::to_path_buf);
            SkcError::io(path, err.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if has_record_extension(entry.path()) {
            paths.push(entry.into_path());
        }
    }

    if paths.is_empty() {
        return Err(SkcError::EmptyCollection(root));
    }

    paths.sort();
    debug!(count = paths.len(), root = %root.display(), "scanned record files");
    Ok(paths)
}

fn has_record_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(RECORD_EXTENSION))
}
