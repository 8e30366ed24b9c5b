//! Key/value persistence behind the configuration store.
//!
//! The configuration layer only needs "get with default" and "set" on a flat
//! map of named values, so backends are kept to that: an in-memory map for
//! tests and ephemeral use, and a TOML document on disk.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A persisted value. Shortcut tables are lists of `[trigger, replacement]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    List(Vec<Vec<String>>),
}

impl SettingValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Vec<String>]> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }
}

/// Minimal typed key/value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<SettingValue>;

    fn set(&mut self, key: &str, value: SettingValue) -> anyhow::Result<()>;

    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
    }

    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(|v| v.as_int()).unwrap_or(default)
    }
}

/// Volatile store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, SettingValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: SettingValue) -> anyhow::Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store persisted as a flat TOML document.
///
/// Every `set` rewrites the whole file; the document is small.
#[derive(Debug, Clone)]
pub struct TomlFileStore {
    path: PathBuf,
    values: BTreeMap<String, SettingValue>,
}

impl TomlFileStore {
    /// Open the store at `path`.
    ///
    /// A missing file yields an empty store. A file that is not valid TOML is
    /// logged and ignored so defaults apply; it is overwritten on the next set.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();

        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<toml::Table>(&content) {
                Ok(table) => {
                    tracing::info!("loaded settings from {}", path.display());
                    Self::from_table(table)
                }
                Err(e) => {
                    tracing::warn!("ignoring unparsable settings at {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no settings file at {}, using defaults", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };

        Ok(Self { path, values })
    }

    /// Keep the entries that have a known shape; others read as unset.
    fn from_table(table: toml::Table) -> BTreeMap<String, SettingValue> {
        table
            .into_iter()
            .filter_map(|(key, value)| match value.try_into::<SettingValue>() {
                Ok(value) => Some((key, value)),
                Err(_) => {
                    tracing::warn!(key = %key, "ignoring setting with unsupported type");
                    None
                }
            })
            .collect()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(&self.values).context("failed to serialize settings")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for TomlFileStore {
    fn get(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: SettingValue) -> anyhow::Result<()> {
        let previous = self.values.insert(key.to_string(), value);
        if let Err(e) = self.save() {
            // Keep memory in step with the file.
            match previous {
                Some(old) => self.values.insert(key.to_string(), old),
                None => self.values.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_defaults() {
        let mut store = MemoryStore::new();
        assert!(store.get_bool("Enabled", true));
        store.set("Enabled", SettingValue::Bool(false)).unwrap();
        assert!(!store.get_bool("Enabled", true));
    }

    #[test]
    fn test_type_mismatch_uses_default() {
        let mut store = MemoryStore::new();
        store.set("ModernTone", SettingValue::Int(1)).unwrap();
        assert!(store.get_bool("ModernTone", true));
        store.set("InputMethod", SettingValue::Bool(true)).unwrap();
        assert_eq!(store.get_int("InputMethod", 0), 0);
    }

    #[test]
    fn test_setting_value_toml_shapes() {
        let mut map = BTreeMap::new();
        map.insert("Enabled".to_string(), SettingValue::Bool(true));
        map.insert("InputMethod".to_string(), SettingValue::Int(1));
        map.insert(
            "Shortcuts".to_string(),
            SettingValue::List(vec![vec!["vn".into(), "Việt Nam".into()]]),
        );
        let text = toml::to_string_pretty(&map).unwrap();
        let back: BTreeMap<String, SettingValue> = toml::from_str(&text).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_file_store_skips_unsupported_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "InputMethod = \"vni\"\nFreeTone = true\n").unwrap();

        let store = TomlFileStore::open(&path).unwrap();
        assert!(store.get("InputMethod").is_none());
        assert_eq!(store.get("FreeTone"), Some(SettingValue::Bool(true)));
    }
}
