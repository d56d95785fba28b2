use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";
pub const APP_DIR_NAME: &str = "recipe-finder";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub search: SearchConfig,
    /// Overrides the platform data directory for the JSON documents.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Candidates fetched in detail during an ingredient search.
    pub candidate_cap: usize,
    pub max_concurrent_lookups: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            request_timeout_seconds: 10,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            candidate_cap: 15,
            max_concurrent_lookups: 15,
        }
    }
}

impl AppConfig {
    /// `~/.config/recipe-finder/config.json` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("config.json"))
    }

    /// Loads the file at `path`, falling back to defaults when it is missing or invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let config = match std::fs::read(path) {
            Ok(bytes) => match serde_json::from_slice::<AppConfig>(&bytes) {
                Ok(config) => config,
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "invalid config file, using defaults");
                    return Self::default();
                }
            },
            Err(_) => return Self::default(),
        };
        config.validated()
    }

    pub fn load() -> Self {
        Self::default_path()
            .map(Self::from_file)
            .unwrap_or_default()
    }

    /// Where the favorites, meal plan, ratings and theme documents live.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR_NAME)
        })
    }

    fn validated(mut self) -> Self {
        if let Err(e) = Url::parse(&self.api.base_url) {
            warn!(error = %e, base_url = %self.api.base_url, "invalid api.base_url, using default");
            self.api.base_url = DEFAULT_BASE_URL.to_owned();
        }
        if self.search.candidate_cap == 0 {
            self.search.candidate_cap = SearchConfig::default().candidate_cap;
        }
        if self.search.max_concurrent_lookups == 0 {
            self.search.max_concurrent_lookups = 1;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "search": { "candidate_cap": 5 } }"#).unwrap();

        let config = AppConfig::from_file(&path);
        assert_eq!(config.search.candidate_cap, 5);
        assert_eq!(config.search.max_concurrent_lookups, 15);
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn malformed_or_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(AppConfig::from_file(&path), AppConfig::default());

        std::fs::write(&path, b"{ nope").unwrap();
        assert_eq!(AppConfig::from_file(&path), AppConfig::default());
    }

    #[test]
    fn invalid_base_url_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "api": { "base_url": "not a url" } }"#).unwrap();
        assert_eq!(AppConfig::from_file(&path).api.base_url, DEFAULT_BASE_URL);
    }
}
