//! Persistence of the configuration record and question list.
//!
//! State lives in two named slots of a key-value store. Stored data that
//! cannot be read back is treated as absent, so a damaged slot costs the user
//! that slot's edits but never stops the tool from starting.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, TmaError};
use crate::model::{AssignmentConfig, Question};

pub const SETTINGS_KEY: &str = "tma_generator_settings";
pub const QUESTIONS_KEY: &str = "tma_generator_questions";

/// A string-valued key-value store.
pub trait KeyValueStore {
    /// Last value written under `key`, or `None` if nothing was.
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$TMAGEN_HOME` if set, else `~/.tmagen`.
    pub fn default_dir() -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os("TMAGEN_HOME").filter(|d| !d.is_empty()) {
            return Some(PathBuf::from(dir));
        }
        dirs::home_dir().map(|h| h.join(".tmagen"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // Written to a temporary file first, so a failed write leaves the
    // previous value in place.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        debug!(key, path = %path.display(), "stored slot");
        Ok(())
    }
}

/// In-process store; nothing is written to disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads and decodes a slot. Missing, unreadable and undecodable all read as `None`.
fn load_slot<T, S>(store: &S, key: &str) -> Option<T>
where
    T: for<'de> Deserialize<'de>,
    S: KeyValueStore + ?Sized,
{
    let text = match store.get(key) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "could not read stored slot, ignoring it");
            return None;
        }
    };

    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "stored slot is corrupted, ignoring it");
            None
        }
    }
}

fn save_slot<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string_pretty(value)?;
    store.set(key, &json)
}

/// Saved configuration merged over the defaults, if one was saved.
pub fn load_config<S: KeyValueStore + ?Sized>(store: &S) -> Option<AssignmentConfig> {
    load_slot(store, SETTINGS_KEY)
}

/// Saved question list; empty when nothing usable was saved.
pub fn load_questions<S: KeyValueStore + ?Sized>(store: &S) -> Vec<Question> {
    load_slot(store, QUESTIONS_KEY).unwrap_or_default()
}

pub fn save_config<S: KeyValueStore + ?Sized>(store: &S, config: &AssignmentConfig) -> Result<()> {
    save_slot(store, SETTINGS_KEY, config)
}

pub fn save_questions<S: KeyValueStore + ?Sized>(store: &S, questions: &[Question]) -> Result<()> {
    save_slot(store, QUESTIONS_KEY, questions)
}

/// A settings file, as written by export and read by import.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SettingsDocument {
    pub settings: AssignmentConfig,
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl SettingsDocument {
    /// Snapshot for export, stamped with the current time and tool version.
    pub fn export(config: &AssignmentConfig, questions: &[Question]) -> Self {
        Self {
            settings: config.clone(),
            questions: questions.to_vec(),
            exported: Some(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses an import file. Both `settings` and `questions` must be present;
    /// settings fields that are missing take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| TmaError::InvalidImport(e.to_string()))?;

        for field in ["settings", "questions"] {
            if value.get(field).map_or(true, serde_json::Value::is_null) {
                return Err(TmaError::InvalidImport(format!("missing '{field}'")));
            }
        }

        serde_json::from_value(value).map_err(|e| TmaError::InvalidImport(e.to_string()))
    }
}

/// Default export filename, e.g. `tma-generator-settings-16-October-2026.json`.
pub fn export_file_name(date: chrono::NaiveDate) -> String {
    format!("tma-generator-settings-{}.json", date.format("%-d-%B-%Y"))
}
