//! Persistent editor configuration holding the activated theme list.
//!
//! Values are ordered lists of strings under dotted keys, like editor
//! settings. A value that is missing or of the wrong shape reads as an
//! empty list; it is never an error.

use crate::error::{EngineError, EngineResult};
use crate::host::HostEvent;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// Configuration key of the activated theme list
pub const ACTIVATED_THEMES_KEY: &str = "base16.generator.activatedThemes";

/// Get/set access to list-valued settings plus change notification.
///
/// `set_list` sends `HostEvent::ConfigurationChanged(key)` to every
/// subscriber when the stored value actually changed.
pub trait ConfigStore {
    fn get_list(&self, key: &str) -> Vec<String>;

    fn set_list(&mut self, key: &str, values: &[String]) -> EngineResult<()>;

    fn subscribe(&mut self, listener: Sender<HostEvent>);
}

/// Fan-out of change events to subscribed channels
#[derive(Debug, Default)]
struct ChangeNotifier {
    listeners: Vec<Sender<HostEvent>>,
}

impl ChangeNotifier {
    fn subscribe(&mut self, listener: Sender<HostEvent>) {
        self.listeners.push(listener);
    }

    fn notify(&mut self, key: &str) {
        // Drop listeners whose receiving side is gone
        self.listeners.retain(|listener| {
            match listener.send(HostEvent::ConfigurationChanged(key.to_string())) {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("Dropping configuration listener: {e}");
                    false
                }
            }
        });
    }
}

fn value_to_list(key: &str, value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                other => {
                    log::warn!("Ignoring non-string entry {other} under '{key}'");
                    None
                }
            })
            .collect(),
        Some(other) => {
            log::warn!("Configuration value '{key}' is not a list ({other}); treating as empty");
            Vec::new()
        }
    }
}

/// Settings stored as a flat JSON object in a file, keys are dotted strings.
///
/// The file is re-read on every access so edits made by hand between two
/// commands are seen. Unrelated keys are preserved on write.
#[derive(Debug)]
pub struct JsonConfigStore {
    path: PathBuf,
    notifier: ChangeNotifier,
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            notifier: ChangeNotifier::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the settings object. A missing or malformed file is empty.
    fn read_settings(&self) -> Map<String, Value> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
            Err(e) => {
                log::warn!("Failed to read settings '{}': {e}", self.path.display());
                return Map::new();
            }
        };

        if content.trim().is_empty() {
            return Map::new();
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                log::warn!(
                    "Settings '{}' is not a JSON object; treating as empty",
                    self.path.display()
                );
                Map::new()
            }
            Err(e) => {
                log::warn!("Failed to parse settings '{}': {e}", self.path.display());
                Map::new()
            }
        }
    }

    fn write_settings(&self, settings: &Map<String, Value>) -> EngineResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| EngineError::io(parent, e))?;
            }
        }
        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| EngineError::serialization(&self.path, e))?;
        fs::write(&self.path, content).map_err(|e| EngineError::io(&self.path, e))
    }
}

impl ConfigStore for JsonConfigStore {
    fn get_list(&self, key: &str) -> Vec<String> {
        let settings = self.read_settings();
        value_to_list(key, settings.get(key))
    }

    fn set_list(&mut self, key: &str, values: &[String]) -> EngineResult<()> {
        let mut settings = self.read_settings();
        let new_value = Value::Array(values.iter().cloned().map(Value::String).collect());
        if settings.get(key) == Some(&new_value) {
            log::debug!("Setting '{key}' unchanged");
            return Ok(());
        }

        settings.insert(key.to_string(), new_value);
        self.write_settings(&settings)?;
        log::info!("Updated setting '{key}' ({} entries)", values.len());

        self.notifier.notify(key);
        Ok(())
    }

    fn subscribe(&mut self, listener: Sender<HostEvent>) {
        self.notifier.subscribe(listener);
    }
}

/// In-memory store for a single session
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    values: HashMap<String, Value>,
    notifier: ChangeNotifier,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw value without notifying, e.g. to simulate a hand edit
    /// or a malformed setting
    pub fn set_raw(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get_list(&self, key: &str) -> Vec<String> {
        value_to_list(key, self.values.get(key))
    }

    fn set_list(&mut self, key: &str, values: &[String]) -> EngineResult<()> {
        let new_value = Value::Array(values.iter().cloned().map(Value::String).collect());
        if self.values.get(key) == Some(&new_value) {
            return Ok(());
        }
        self.values.insert(key.to_string(), new_value);
        self.notifier.notify(key);
        Ok(())
    }

    fn subscribe(&mut self, listener: Sender<HostEvent>) {
        self.notifier.subscribe(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_value_is_empty() {
        let store = MemoryConfigStore::new();
        assert!(store.get_list(ACTIVATED_THEMES_KEY).is_empty());
    }

    #[test]
    fn test_malformed_value_is_empty() {
        let mut store = MemoryConfigStore::new();
        store.set_raw(ACTIVATED_THEMES_KEY, json!("base16-ocean"));
        assert!(store.get_list(ACTIVATED_THEMES_KEY).is_empty());

        store.set_raw(ACTIVATED_THEMES_KEY, json!(["a", 3, "b"]));
        assert_eq!(store.get_list(ACTIVATED_THEMES_KEY), strings(&["a", "b"]));
    }

    #[test]
    fn test_set_notifies_only_on_change() {
        let (tx, rx) = mpsc::channel();
        let mut store = MemoryConfigStore::new();
        store.subscribe(tx);

        store.set_list(ACTIVATED_THEMES_KEY, &strings(&["a"])).unwrap();
        store.set_list(ACTIVATED_THEMES_KEY, &strings(&["a"])).unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            HostEvent::ConfigurationChanged(ACTIVATED_THEMES_KEY.to_string())
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_listener_does_not_fail_set() {
        let (tx, rx) = mpsc::channel();
        let mut store = MemoryConfigStore::new();
        store.subscribe(tx);
        drop(rx);
        assert!(store.set_list(ACTIVATED_THEMES_KEY, &strings(&["a"])).is_ok());
    }

    #[test]
    fn test_json_store_round_trip_preserves_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"editor.fontSize": 14}"#).unwrap();

        let mut store = JsonConfigStore::new(&path);
        store
            .set_list(ACTIVATED_THEMES_KEY, &strings(&["b", "a"]))
            .unwrap();

        assert_eq!(store.get_list(ACTIVATED_THEMES_KEY), strings(&["b", "a"]));
        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["editor.fontSize"], json!(14));
    }

    #[test]
    fn test_json_store_malformed_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonConfigStore::new(&path);
        assert!(store.get_list(ACTIVATED_THEMES_KEY).is_empty());
    }

    #[test]
    fn test_json_store_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("settings.json");
        let mut store = JsonConfigStore::new(&path);
        store.set_list(ACTIVATED_THEMES_KEY, &strings(&["x"])).unwrap();
        assert!(path.is_file());
    }
}
