//! Key/value session store
//!
//! Small persistent preferences shared between screens: the active
//! profile name, slot assignments and one-shot values handed from a
//! finished level to the reward screen.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, Result};

/// Well-known session keys
pub mod keys {
    pub const ACTIVE_PROFILE: &str = "ActiveProfile";
    pub const SELECTED_CHARACTER: &str = "SelectedCharacter";
    pub const SELECTED_PROFILE_SLOT: &str = "SelectedProfileSlot";
    pub const SELECTED_PROFILE_NAME: &str = "SelectedProfileName";
    pub const STARS_EARNED: &str = "StarsEarned";
    pub const LEVEL_COMPLETED: &str = "LevelCompleted";
    pub const TIME_LIMIT: &str = "TimeLimit";

    /// Key holding the profile name assigned to a selection slot
    pub fn profile_slot(slot: usize) -> String {
        format!("ProfileSlot_{}", slot)
    }
}

/// A stored session value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionValue {
    Str(String),
    Int(i64),
    Float(f32),
}

/// Opaque string/number key-value service
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<&SessionValue>;
    fn set(&mut self, key: &str, value: SessionValue);
    fn delete_key(&mut self, key: &str);
    /// Flush pending writes
    fn save(&mut self) -> Result<()>;

    fn has_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            SessionValue::Str(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            SessionValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    fn get_float(&self, key: &str) -> Option<f32> {
        match self.get(key)? {
            SessionValue::Float(v) => Some(*v),
            SessionValue::Int(v) => Some(*v as f32),
            SessionValue::Str(_) => None,
        }
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.set(key, SessionValue::Str(value.to_string()));
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.set(key, SessionValue::Int(value));
    }

    fn set_float(&mut self, key: &str, value: f32) {
        self.set(key, SessionValue::Float(value));
    }
}

/// Session store that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    values: BTreeMap<String, SessionValue>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<&SessionValue> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: SessionValue) {
        self.values.insert(key.to_string(), value);
    }

    fn delete_key(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn save(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Session store persisted to a RON file on `save`
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
    values: BTreeMap<String, SessionValue>,
}

impl FileSessionStore {
    /// Open a store, starting empty if the file is missing or unreadable
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(content) => match ron::from_str(&content) {
                Ok(values) => values,
                Err(e) => {
                    log::warn!("Failed to parse session file {:?}: {}, starting empty", path, e);
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<&SessionValue> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: SessionValue) {
        self.values.insert(key.to_string(), value);
    }

    fn delete_key(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn save(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ProfileError::io(parent, e))?;
        }
        let text = ron::ser::to_string_pretty(&self.values, ron::ser::PrettyConfig::default())
            .map_err(|e| ProfileError::Config(e.to_string()))?;
        fs::write(&self.path, text).map_err(|e| ProfileError::io(&self.path, e))?;
        log::debug!("Session saved to {:?}", self.path);
        Ok(())
    }
}
