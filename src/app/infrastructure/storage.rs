use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::error::{Result, ThemeError};

/// Key-value persistence used for the theme preference.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default)]
struct MemoryState {
    values: HashMap<String, String>,
    fail_writes: bool,
}

/// In-memory store. Clones share the same contents, so a second resolver
/// built on a clone sees what the first one persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .state
            .borrow_mut()
            .values
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Make every subsequent `set` fail, like a full or locked storage area.
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.borrow_mut().fail_writes = fail;
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.state.borrow().values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(ThemeError::Storage("storage quota exceeded".to_string()));
        }
        state.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Flat JSON object on disk, one entry per key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location under the user config directory.
    pub fn open_default() -> Self {
        Self::new(Self::default_path())
    }

    /// Get preferences file path (cross-platform)
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("roomledger");
        path.push("preferences.json");
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Option<Map<String, Value>>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let Some(map) = self.read_map()? else {
            return Ok(None);
        };
        Ok(map.get(key).map(|value| match value {
            Value::String(s) => s.clone(),
            // Hand back the raw JSON so the caller can reject it.
            other => other.to_string(),
        }))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut map = match self.read_map() {
            Ok(map) => map.unwrap_or_default(),
            Err(ThemeError::Json(e)) => {
                tracing::warn!(
                    target: "roomledger::theme",
                    path = %self.path.display(),
                    error = %e,
                    "Preferences file is corrupt, rewriting it"
                );
                Map::new()
            }
            Err(e) => return Err(e),
        };
        map.insert(key.to_string(), Value::String(value.to_string()));

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&map)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
