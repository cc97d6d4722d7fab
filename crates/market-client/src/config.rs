// crates/market-client/src/config.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Configuration for the market terminal, read from an optional TOML file.
///
/// ```toml
/// data_path = "market.json"
/// store_dir = ".market-store"
/// tick_ms = 5000
/// theme = "dark"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub data_path: Option<PathBuf>,
    pub store_dir: PathBuf,
    pub tick_ms: u64,
    pub seed: Option<u64>,
    pub theme: Theme,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            store_dir: PathBuf::from(".market-store"),
            tick_ms: 5000,
            seed: None,
            theme: Theme::Dark,
        }
    }
}

impl ClientConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(ClientConfig::parse("").unwrap(), ClientConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_what_it_names() {
        let config = ClientConfig::parse("tick_ms = 250\ntheme = \"light\"\n").unwrap();
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.store_dir, PathBuf::from(".market-store"));
    }

    #[test]
    fn unknown_theme_is_rejected() {
        assert!(ClientConfig::parse("theme = \"neon\"").is_err());
    }
}
