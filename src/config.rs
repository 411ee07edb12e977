//! Application configuration
//!
//! Read from `config.toml` in the platform config directory
//! (e.g. `~/.config/studybuddy/config.toml`). Every field is optional;
//! a missing file means all defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::review::DEFAULT_ITEM_TYPE;

const APP_DIR: &str = "studybuddy";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not determine config directory")]
    ConfigDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct AppConfig {
    /// Where user documents are stored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// User to act as when none is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Tag given to items added without one
    pub default_item_type: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            user_id: None,
            default_item_type: DEFAULT_ITEM_TYPE.to_string(),
        }
    }
}

impl AppConfig {
    /// Default config file location
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR).join("config.toml"))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    /// Load from `path`, falling back to defaults when the file doesn't exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Data directory, defaulting to the platform data dir
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_local_dir().map(|p| p.join(APP_DIR)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full() {
        let config = AppConfig::parse(
            r#"
            data_dir = "/tmp/studybuddy"
            user_id = "alice"
            default_item_type = "quiz"
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/studybuddy")));
        assert_eq!(config.user_id.as_deref(), Some("alice"));
        assert_eq!(config.default_item_type, "quiz");
        assert_eq!(config.resolved_data_dir(), Some(PathBuf::from("/tmp/studybuddy")));
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.default_item_type, "flashcard");
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            AppConfig::parse("user_id = [1, 2"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig::load(&temp.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "user_id = \"bob\"\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.user_id.as_deref(), Some("bob"));
        assert!(config.data_dir.is_none());
    }
}
