//! Persistent key-value stores for unlock and exercise bookkeeping.
//!
//! The session treats its store as optional: with none attached nothing persists, and every
//! operation still succeeds.
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{NdError, NdResult};

/// String-keyed persistent storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> NdResult<()>;

    fn remove(&mut self, key: &str) -> NdResult<()>;

    /// Forget every entry.
    fn clear(&mut self) -> NdResult<()>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Store that lives only as long as the session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> NdResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> NdResult<()> {
        self.values.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> NdResult<()> {
        self.values.clear();
        Ok(())
    }
}

/// Flat table of strings persisted to a TOML file, rewritten on every change.
#[derive(Debug, Clone)]
pub struct TomlFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl TomlFileStore {
    /// Open the store at `path`, loading existing entries if the file exists.
    pub fn open(path: impl AsRef<Path>) -> NdResult<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.is_file() {
            let toml_str = std::fs::read_to_string(&path)?;
            toml::from_str(&toml_str).map_err(|source| NdError::TomlParse {
                source,
                file: path.clone(),
            })?
        } else {
            BTreeMap::new()
        };
        debug!("opened store {} ({} entries)", path.display(), values.len());
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> NdResult<()> {
        let toml_str = toml::to_string(&self.values).map_err(|source| NdError::TomlSerialize {
            source,
            file: self.path.clone(),
        })?;

        // Attempt to create parent directories if they don't exist
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml_str)?;
        Ok(())
    }
}

impl KeyValueStore for TomlFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> NdResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> NdResult<()> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn clear(&mut self) -> NdResult<()> {
        self.values.clear();
        self.flush()
    }
}
