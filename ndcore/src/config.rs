use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{NdError, NdResult},
    magic::ENV_CONFIG_PATH,
};

fn default_true() -> bool {
    true
}

/// Session settings, read from a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// File backing the persistent store; in-memory only when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,

    /// Also try the reversed pair when exactly two contexts are selected.
    #[serde(default = "default_true")]
    pub try_reversed_pairs: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            try_reversed_pairs: true,
        }
    }
}

impl SessionConfig {
    /// Get the default path to the session configuration file.
    pub fn default_path() -> PathBuf {
        // Check if the environment variable is set
        if let Ok(config_path) = std::env::var(ENV_CONFIG_PATH) {
            return config_path.into();
        }

        let mut path = PathBuf::new();

        #[cfg(target_os = "windows")]
        {
            if let Ok(appdata) = std::env::var("APPDATA") {
                path.push(appdata);
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
                path.push(xdg_config_home);
            } else if let Ok(home) = std::env::var("HOME") {
                path.push(home);
                path.push(".config");
            }
        }

        path.push("ndcore");
        path.push("config.toml");
        path
    }

    /// Load a SessionConfig from a TOML file.
    pub fn load_from_toml(path: &Path) -> NdResult<Self> {
        let toml_str = std::fs::read_to_string(path)?;
        Self::from_toml_str(&toml_str).map_err(|source| NdError::TomlParse {
            source,
            file: path.to_path_buf(),
        })
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load from [`SessionConfig::default_path`], falling back to defaults if the file is missing.
    pub fn load_or_default() -> NdResult<Self> {
        let path = Self::default_path();
        if path.is_file() {
            Self::load_from_toml(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the SessionConfig to a TOML file.
    pub fn save_to_toml(&self, path: &Path) -> NdResult<()> {
        let toml_str = toml::to_string(self).map_err(|source| NdError::TomlSerialize {
            source,
            file: path.to_path_buf(),
        })?;

        // Attempt to create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, toml_str)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = SessionConfig::from_toml_str("").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert!(config.try_reversed_pairs);

        let config =
            SessionConfig::from_toml_str("store_path = \"/tmp/nd.toml\"\ntry_reversed_pairs = false")
                .unwrap();
        assert_eq!(config.store_path, Some(PathBuf::from("/tmp/nd.toml")));
        assert!(!config.try_reversed_pairs);
    }

    #[test]
    fn save_and_load() {
        let path = std::env::temp_dir()
            .join(format!("ndcore-config-{}", std::process::id()))
            .join("config.toml");
        let config = SessionConfig {
            store_path: Some(PathBuf::from("store.toml")),
            try_reversed_pairs: false,
        };
        config.save_to_toml(&path).unwrap();
        assert_eq!(SessionConfig::load_from_toml(&path).unwrap(), config);
        let _ = std::fs::remove_file(&path);
    }
}
