use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::StorePaths;

/// Environment variable overriding `api_base_url`.
pub const ENV_API_URL: &str = "CALLTIME_API_URL";

pub const DEFAULT_USER_ID: &str = "demo-user";
pub const DEFAULT_SHARE_BASE_URL: &str = "https://calltime.app/wrapped";

/// Where recap data and gift sends go.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Bundled sample data with simulated latency.
    #[default]
    Mock,
    /// The backend at `api_base_url`.
    Http,
}

impl std::str::FromStr for SourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mock" => Ok(SourceKind::Mock),
            "http" => Ok(SourceKind::Http),
            other => anyhow::bail!("unknown source '{other}' (expected mock or http)"),
        }
    }
}

/// Settings read from `config.json` in the store root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub auth_token: Option<String>,
    pub user_id: String,
    pub year: i32,
    pub source: SourceKind,
    pub share_base_url: String,
    pub download_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            auth_token: None,
            user_id: DEFAULT_USER_ID.to_string(),
            year: calltime_core::DEFAULT_YEAR,
            source: SourceKind::Mock,
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            download_dir: None,
        }
    }
}

impl Config {
    /// Load `config.json` and apply environment overrides.
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(paths: &StorePaths) -> anyhow::Result<Self> {
        let map = read_config_map(&paths.config_json)?;
        let config: Config = serde_json::from_value(serde_json::Value::Object(map))
            .map_err(|e| anyhow::anyhow!("invalid {}: {e}", paths.config_json.display()))?;
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    /// Apply environment overrides through `lookup`.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            tracing::debug!(url = %url, "api base url from environment");
            self.api_base_url = Some(url);
        }
        self
    }

    /// Directory that receives downloaded slides.
    pub fn download_dir(&self, paths: &StorePaths) -> PathBuf {
        if let Some(dir) = &self.download_dir {
            return dir.clone();
        }
        dirs::download_dir().unwrap_or_else(|| paths.downloads_dir.clone())
    }

    /// The API base URL, required by the HTTP source.
    pub fn require_api_base_url(&self) -> anyhow::Result<&str> {
        match self.api_base_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(url.trim_end_matches('/')),
            _ => anyhow::bail!(
                "no api_base_url configured (run `calltime config set api_base_url <url>` or set {ENV_API_URL})"
            ),
        }
    }
}

/// Read the raw config object. Returns an empty map if the file doesn't exist.
pub fn read_config_map(path: &Path) -> anyhow::Result<serde_json::Map<String, serde_json::Value>> {
    if !path.exists() {
        return Ok(serde_json::Map::new());
    }
    let content = std::fs::read_to_string(path)?;
    let val: serde_json::Value = serde_json::from_str(&content)?;
    match val {
        serde_json::Value::Object(map) => Ok(map),
        _ => Ok(serde_json::Map::new()),
    }
}

/// Write the raw config object atomically.
pub fn write_config_map(
    path: &Path,
    config: &serde_json::Map<String, serde_json::Value>,
) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    crate::write_atomic(path, json.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = StorePaths::at(tmp.path());
        let config = Config::load(&paths).unwrap().with_env(|_| None);
        assert_eq!(config.user_id, DEFAULT_USER_ID);
        assert_eq!(config.year, 2025);
        assert_eq!(config.source, SourceKind::Mock);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = StorePaths::at(tmp.path());
        std::fs::write(&paths.config_json, r#"{"year": 2024, "source": "http"}"#).unwrap();
        let config = Config::load(&paths).unwrap();
        assert_eq!(config.year, 2024);
        assert_eq!(config.source, SourceKind::Http);
        assert_eq!(config.share_base_url, DEFAULT_SHARE_BASE_URL);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = StorePaths::at(tmp.path());
        std::fs::write(&paths.config_json, r#"{"year": "soon"}"#).unwrap();
        assert!(Config::load(&paths).is_err());
    }

    #[test]
    fn env_overrides_api_url() {
        let config = Config::default().with_env(|key| {
            (key == ENV_API_URL).then(|| "https://api.example.com/".to_string())
        });
        assert_eq!(
            config.require_api_base_url().unwrap(),
            "https://api.example.com"
        );
    }

    #[test]
    fn missing_api_url_is_reported() {
        let err = Config::default().require_api_base_url().unwrap_err();
        assert!(err.to_string().contains("api_base_url"));
    }

    #[test]
    fn config_map_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        let mut map = read_config_map(&path).unwrap();
        assert!(map.is_empty());
        map.insert("user_id".into(), serde_json::json!("u42"));
        write_config_map(&path, &map).unwrap();
        let back = read_config_map(&path).unwrap();
        assert_eq!(back["user_id"], "u42");
    }

    #[test]
    fn explicit_download_dir_wins() {
        let paths = StorePaths::at("/tmp/store");
        let config = Config {
            download_dir: Some(PathBuf::from("/tmp/slides")),
            ..Config::default()
        };
        assert_eq!(config.download_dir(&paths), PathBuf::from("/tmp/slides"));
    }

    #[test]
    fn source_kind_parses() {
        assert_eq!("http".parse::<SourceKind>().unwrap(), SourceKind::Http);
        assert!("ftp".parse::<SourceKind>().is_err());
    }
}
