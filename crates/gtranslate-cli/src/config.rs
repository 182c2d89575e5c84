//! Configuration loading and resolution.

use std::path::{Path, PathBuf};

/// Overrides the data directory.
pub const DATA_DIR_ENV: &str = "GTRANSLATE_DATA_DIR";

/// Overrides the endpoint base URL.
pub const ENDPOINT_ENV: &str = "GTRANSLATE_ENDPOINT";

/// Errors raised while preparing on-disk state.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Cache and cookie directories under a data root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDirs {
    pub cache: PathBuf,
    pub cookie: PathBuf,
}

/// Resolve the data directory.
///
/// Explicit flag, then `GTRANSLATE_DATA_DIR`, then `./data` if it exists,
/// then `~/.gtranslate`.
pub fn resolve_data_dir(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    if let Ok(env_path) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(env_path);
    }

    let cwd_data = PathBuf::from("data");
    if cwd_data.is_dir() {
        return cwd_data;
    }

    resolve_default_data_dir()
}

fn resolve_default_data_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());

    PathBuf::from(home).join(".gtranslate")
}

/// Resolve the endpoint override, if any.
pub fn resolve_endpoint(explicit: Option<&str>) -> Option<String> {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var(ENDPOINT_ENV).ok())
        .filter(|e| !e.is_empty())
}

/// Create `<root>/cache` and `<root>/cookie` if missing.
pub fn prepare_data_dirs(root: &Path) -> Result<DataDirs, ConfigError> {
    let dirs = DataDirs {
        cache: root.join("cache"),
        cookie: root.join("cookie"),
    };

    for dir in [&dirs.cache, &dirs.cookie] {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
            path: dir.clone(),
            source,
        })?;
    }

    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_data_dir_wins() {
        assert_eq!(resolve_data_dir(Some("/tmp/x")), PathBuf::from("/tmp/x"));
    }

    #[test]
    fn test_explicit_endpoint_wins() {
        assert_eq!(
            resolve_endpoint(Some("http://localhost/m?")).as_deref(),
            Some("http://localhost/m?")
        );
    }

    #[test]
    fn test_prepare_creates_both_dirs() {
        let root = tempfile::tempdir().unwrap();
        let dirs = prepare_data_dirs(&root.path().join("nested")).unwrap();
        assert!(dirs.cache.is_dir());
        assert!(dirs.cookie.is_dir());

        // Idempotent.
        assert_eq!(prepare_data_dirs(&root.path().join("nested")).unwrap(), dirs);
    }

    #[test]
    fn test_prepare_fails_under_a_file() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("file");
        std::fs::write(&file, b"x").unwrap();
        let err = prepare_data_dirs(&file).unwrap_err();
        assert!(err.to_string().contains("Failed to create directory"));
    }
}
