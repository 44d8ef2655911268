//! CLI configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_server: String,
    pub default_output: String,
    pub token: Option<String>,
    pub username: Option<String>,
    pub timeout_secs: u64,
    /// Filter directive used when neither RUST_LOG nor --verbose is given
    pub log_level: String,
    pub log_dir: Option<String>,
    /// hourly, daily or never
    pub log_rotation: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_server: "http://localhost:8080".to_string(),
            default_output: "table".to_string(),
            token: None,
            username: None,
            timeout_secs: 30,
            log_level: "warn".to_string(),
            log_dir: None,
            log_rotation: "daily".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Apply NASCTL_SERVER and NASCTL_TOKEN
    pub fn with_env(mut self) -> Self {
        if let Ok(server) = std::env::var("NASCTL_SERVER") {
            if !server.is_empty() {
                self.default_server = server;
            }
        }
        if let Ok(token) = std::env::var("NASCTL_TOKEN") {
            if !token.is_empty() {
                self.token = Some(token);
            }
        }
        self
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").context("HOME is not set")?;
        Ok(PathBuf::from(home).join(".config/nasctl/cli.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("cli.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/cli.toml");

        let config = Config {
            default_server: "http://nas.local:8080".to_string(),
            token: Some("tok".to_string()),
            username: Some("admin".to_string()),
            log_dir: Some("/tmp/nasctl".to_string()),
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cli.toml");
        std::fs::write(&path, "default_output = \"json\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.default_output, "json");
        assert_eq!(config.default_server, "http://localhost:8080");
        assert_eq!(config.log_rotation, "daily");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cli.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
