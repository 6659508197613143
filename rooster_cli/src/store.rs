//! Session state persisted as a JSON object in a file.

use std::{
    collections::BTreeMap,
    fs::{create_dir_all, read_to_string, write},
    path::{Path, PathBuf},
};

use rooster_core::{session::KeyValueStore, ScheduleResult};

static FILE_NAME: &str = "store.json";

/// A key-value store written back to disk on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file is an empty store.
    pub fn open(path: &Path) -> ScheduleResult<Self> {
        let values = if path.exists() {
            serde_json::from_str(&read_to_string(path)?)?
        } else {
            BTreeMap::new()
        };
        Ok(JsonFileStore {
            path: path.to_path_buf(),
            values,
        })
    }

    /// `<config dir>/rooster/store.json`, or the working directory when the
    /// platform has no config dir.
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_default();
        path.push("rooster");
        path.push(FILE_NAME);
        path
    }

    fn persist(&self) -> ScheduleResult<()> {
        if let Some(parent) = self.path.parent() {
            create_dir_all(parent)?;
        }
        write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> ScheduleResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> ScheduleResult<()> {
        if self.values.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}
