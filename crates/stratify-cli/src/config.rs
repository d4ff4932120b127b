//! Configuration management for the Stratify CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stratify_engine::EngineConfig;

/// Name of the project config file.
pub const CONFIG_FILE: &str = "stratify.toml";

/// Stratify project configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database file, relative to the directory holding `stratify.toml`.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".stratify").join("stratify.db")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// A config together with the directory it was found in.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: Config,
}

impl Project {
    /// Load `stratify.toml` from the current or a parent directory.
    ///
    /// Falls back to defaults rooted at the current directory.
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        match find_config_file(&cwd) {
            Some(path) => {
                let config = Config::read(&path)?;
                let root = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                tracing::debug!(config = %path.display(), "loaded project config");
                Ok(Self { root, config })
            }
            None => Ok(Self {
                root: cwd,
                config: Config::default(),
            }),
        }
    }

    /// Absolute path of the database file.
    pub fn database_path(&self) -> PathBuf {
        if self.config.store.path.is_absolute() {
            self.config.store.path.clone()
        } else {
            self.root.join(&self.config.store.path)
        }
    }
}

impl Config {
    /// Parse a config file.
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config
            .engine
            .validate()
            .with_context(|| format!("Invalid [engine] table in {}", path.display()))?;
        Ok(config)
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// Find `stratify.toml` in `start` or its parents.
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("[engine]"));
        assert!(text.contains("[store]"));

        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.engine.k, 2);
        assert_eq!(parsed.engine.seed, 42);
    }

    #[test]
    fn partial_tables_use_defaults() {
        let parsed: Config = toml::from_str("[engine]\nk = 3\n").unwrap();
        assert_eq!(parsed.engine.k, 3);
        assert_eq!(parsed.engine.n_init, 10);
        assert_eq!(parsed.store, StoreConfig::default());
    }

    #[test]
    fn read_rejects_invalid_engine_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[engine]\nk = 0\n").unwrap();
        assert!(Config::read(&path).is_err());
    }

    #[test]
    fn finds_config_in_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        Config::default().save(&dir.path().join(CONFIG_FILE)).unwrap();

        let found = find_config_file(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILE));
    }

    #[test]
    fn database_path_is_relative_to_project_root() {
        let project = Project {
            root: PathBuf::from("/srv/clinic"),
            config: Config::default(),
        };
        assert_eq!(
            project.database_path(),
            PathBuf::from("/srv/clinic/.stratify/stratify.db")
        );

        let mut config = Config::default();
        config.store.path = PathBuf::from("/var/lib/stratify.db");
        let project = Project {
            root: PathBuf::from("/srv/clinic"),
            config,
        };
        assert_eq!(project.database_path(), PathBuf::from("/var/lib/stratify.db"));
    }
}
