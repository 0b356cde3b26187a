// Application configuration.
// Loaded from an optional JSON file, then overridden by environment variables.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::paths;
use crate::error::{PokedexError, Result};

pub const DEFAULT_POKEAPI_URL: &str = "https://pokeapi.co/api/v2/";
pub const DEFAULT_POSTS_URL: &str = "https://jsonplaceholder.typicode.com/";

const POKEAPI_URL_ENV: &str = "POKEDEX_POKEAPI_URL";
const POSTS_URL_ENV: &str = "POKEDEX_POSTS_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL for PokeAPI; always ends with `/`.
    pub pokeapi_base_url: String,
    /// Base URL for the posts API; always ends with `/`.
    pub posts_base_url: String,
    pub request_timeout_secs: u64,
    /// How long a successful response is served without revalidation.
    pub dedupe_interval_secs: u64,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pokeapi_base_url: DEFAULT_POKEAPI_URL.to_string(),
            posts_base_url: DEFAULT_POSTS_URL.to_string(),
            request_timeout_secs: 10,
            dedupe_interval_secs: 2,
            log_filter: "pokedex=info".to_string(),
        }
    }
}

impl Config {
    /// Load from the platform config file (if any) and the environment.
    pub fn load() -> Result<Self> {
        let mut config = match paths::config_path() {
            Some(path) => Self::from_file(&path)?.unwrap_or_default(),
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.normalize();
        Ok(config)
    }

    /// Read a config file. Missing file is not an error.
    pub fn from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)
            .map_err(|e| PokedexError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(Some(config))
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(POKEAPI_URL_ENV).filter(|v| !v.is_empty()) {
            self.pokeapi_base_url = url;
        }
        if let Some(url) = lookup(POSTS_URL_ENV).filter(|v| !v.is_empty()) {
            self.posts_base_url = url;
        }
    }

    fn normalize(&mut self) {
        for url in [&mut self.pokeapi_base_url, &mut self.posts_base_url] {
            if !url.ends_with('/') {
                url.push('/');
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn dedupe_interval(&self) -> Duration {
        Duration::from_secs(self.dedupe_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.pokeapi_base_url, "https://pokeapi.co/api/v2/");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.dedupe_interval(), Duration::from_secs(2));
    }

    #[test]
    fn test_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        assert!(Config::from_file(&path).unwrap().is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"request_timeout_secs": 3}"#).unwrap();

        let config = Config::from_file(&path).unwrap().unwrap();
        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.posts_base_url, DEFAULT_POSTS_URL);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, PokedexError::Config(_)));
    }

    #[test]
    fn test_env_overrides_and_normalizes() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            POKEAPI_URL_ENV => Some("http://localhost:8080/api".to_string()),
            POSTS_URL_ENV => Some(String::new()),
            _ => None,
        });
        config.normalize();

        assert_eq!(config.pokeapi_base_url, "http://localhost:8080/api/");
        assert_eq!(config.posts_base_url, DEFAULT_POSTS_URL);
    }
}
