//! Configuration file support for liftlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftlog/config.toml`.

use crate::{Error, MassUnit, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl DataConfig {
    pub fn journal_path(data_dir: &Path) -> PathBuf {
        data_dir.join("journal").join("entries.jsonl")
    }

    pub fn prefs_path(data_dir: &Path) -> PathBuf {
        data_dir.join("state.json")
    }

    pub fn export_path(data_dir: &Path) -> PathBuf {
        data_dir.join("sets.csv")
    }
}

/// Display configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    /// Unit used until the user picks one
    #[serde(default)]
    pub default_unit: MassUnit,
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_dir().join(".local/share"));
    base.join("liftlog")
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_dir().join(".config"));
        base.join("liftlog").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.display.default_unit, MassUnit::Kg);
        assert!(config.data.data_dir.ends_with("liftlog"));
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("liftlog").join("config.toml");

        let mut config = Config::default();
        config.display.default_unit = MassUnit::Lb;
        config.data.data_dir = temp_dir.path().join("data");
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.display.default_unit, MassUnit::Lb);
        assert_eq!(loaded.data.data_dir, temp_dir.path().join("data"));
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[display]
default_unit = "lb"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.display.default_unit, MassUnit::Lb);
        assert!(config.data.data_dir.ends_with("liftlog")); // default
    }

    #[test]
    fn test_invalid_unit_is_rejected() {
        let result = toml::from_str::<Config>("[display]\ndefault_unit = \"stone\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_data_paths() {
        let dir = Path::new("/tmp/liftlog");
        assert_eq!(
            DataConfig::journal_path(dir),
            Path::new("/tmp/liftlog/journal/entries.jsonl")
        );
        assert_eq!(DataConfig::prefs_path(dir), Path::new("/tmp/liftlog/state.json"));
        assert_eq!(DataConfig::export_path(dir), Path::new("/tmp/liftlog/sets.csv"));
    }
}
