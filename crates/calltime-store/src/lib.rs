pub mod config;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub use config::{Config, SourceKind};

/// Environment variable that relocates the whole store (used by tests and CI).
pub const ENV_HOME: &str = "CALLTIME_HOME";

/// Return the per-user store root: `<data_dir>/calltime/`
/// Falls back to `~/.calltime/`, then `./.calltime-store`.
pub fn store_root() -> PathBuf {
    if let Some(home) = std::env::var_os(ENV_HOME).filter(|v| !v.is_empty()) {
        PathBuf::from(home)
    } else if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("calltime")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".calltime")
    } else {
        PathBuf::from(".calltime-store")
    }
}

/// Well-known locations inside the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub root: PathBuf,
    pub config_json: PathBuf,
    pub logs_dir: PathBuf,
    pub downloads_dir: PathBuf,
}

impl StorePaths {
    pub fn discover() -> Self {
        Self::at(store_root())
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config_json: root.join("config.json"),
            logs_dir: root.join("logs"),
            downloads_dir: root.join("downloads"),
            root,
        }
    }

    /// Ensure the store subdirectories exist.
    pub fn ensure_dirs(&self) -> anyhow::Result<()> {
        for dir in [&self.root, &self.logs_dir, &self.downloads_dir] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn log_file(&self) -> PathBuf {
        self.logs_dir.join("calltime.log")
    }
}

/// Atomic write: write to temp file in same dir, then rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("no parent dir for {}", path.display()))?;
    fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path)?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_root_is_not_empty() {
        let root = store_root();
        assert!(!root.as_os_str().is_empty());
    }

    #[test]
    fn paths_are_rooted() {
        let paths = StorePaths::at("/tmp/calltime-test");
        assert_eq!(paths.config_json, Path::new("/tmp/calltime-test/config.json"));
        assert_eq!(
            paths.log_file(),
            Path::new("/tmp/calltime-test/logs/calltime.log")
        );
        assert!(paths.downloads_dir.starts_with(&paths.root));
    }

    #[test]
    fn ensure_dirs_creates_subdirs() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = StorePaths::at(tmp.path().join("store"));
        paths.ensure_dirs().unwrap();
        assert!(paths.logs_dir.is_dir());
        assert!(paths.downloads_dir.is_dir());
    }

    #[test]
    fn write_atomic_creates_file_and_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("slide.png");
        write_atomic(&path, b"\x89PNG").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"\x89PNG");
    }

    #[test]
    fn write_atomic_replaces_existing() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        write_atomic(&path, b"{}").unwrap();
        write_atomic(&path, b"{\"year\":2024}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"year\":2024}");
    }
}
