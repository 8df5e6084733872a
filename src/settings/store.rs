// Settings persistence - a key/value store behind a trait
//
// The file-backed store keeps the whole map in memory and writes it through
// on every mutation. Settings are tiny and mutations are human-paced, so
// there is no batching. Persistence failures degrade to "no persistence",
// logged, never fatal.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Durable key -> string store
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store, used in tests and when no config directory exists
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// JSON-file store, written through on every `set`
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open a store at `path`. A missing file is a first run; an unreadable
    /// or malformed one degrades to empty with a warning.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        %err,
                        "settings file malformed, starting from defaults"
                    );
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };

        Self { path, entries }
    }

    fn flush(&self) {
        let text = match serde_json::to_string_pretty(&self.entries) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(%err, "failed to serialize settings");
                return;
            }
        };

        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Err(err) = fs::write(&self.path, text) {
            tracing::warn!(path = %self.path.display(), %err, "failed to write settings");
        }
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush();
    }
}

/// Default settings path under the user config directory
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("woodblock").join("settings.json"))
}
