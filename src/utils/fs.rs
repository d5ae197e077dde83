//! Filesystem utilities.

use std::path::Path;

use crate::error::{Result, SkcError};

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|err| SkcError::io(path, err))?;
    }
    Ok(())
}

/// Read a file's bytes, returning `None` if it doesn't exist.
pub fn read_optional_bytes(path: impl AsRef<Path>) -> Result<Option<Vec<u8>>> {
    let path = path.as_ref();
    if path.exists() {
        let bytes = std::fs::read(path).map_err(|err| SkcError::io(path, err))?;
        Ok(Some(bytes))
    } else {
        Ok(None)
    }
}
