//! Validation of cache and cookie directories.

use std::path::{Path, PathBuf};

use crate::types::{TranslateError, TranslateResult};

/// Longest directory path a session accepts, in bytes.
pub const MAX_DIR_LEN: usize = 512;

/// Check that `path` is an existing directory the process can list and write.
///
/// Returns the path to store on success.
pub fn validate_dir(path: impl AsRef<Path>) -> TranslateResult<PathBuf> {
    let path = path.as_ref();
    let len = path.as_os_str().len();

    if len == 0 {
        return Err(TranslateError::Configuration(
            "directory path is empty".to_string(),
        ));
    }
    if len > MAX_DIR_LEN {
        return Err(TranslateError::Configuration(format!(
            "directory path is {len} bytes, limit is {MAX_DIR_LEN}"
        )));
    }

    let meta = std::fs::metadata(path)
        .map_err(|e| TranslateError::Configuration(format!("{}: {e}", path.display())))?;
    if !meta.is_dir() {
        return Err(TranslateError::Configuration(format!(
            "{}: not a directory",
            path.display()
        )));
    }
    if meta.permissions().readonly() {
        return Err(TranslateError::Configuration(format!(
            "{}: directory is not writable",
            path.display()
        )));
    }

    std::fs::read_dir(path)
        .map_err(|e| TranslateError::Configuration(format!("{}: {e}", path.display())))?;

    // Mode bits say nothing about ownership or the filesystem, so try a write.
    tempfile::tempfile_in(path).map_err(|e| {
        TranslateError::Configuration(format!(
            "{}: directory is not writable: {e}",
            path.display()
        ))
    })?;

    Ok(path.to_path_buf())
}
