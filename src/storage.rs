use crate::error::Result;
use crate::project::{seed_projects, ProjectMap};
use crate::task::{seed_tasks, Task};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

pub const TASKS_KEY: &str = "ministry_os_dashboard_v24";
pub const PROJECTS_KEY: &str = "ministry_os_dashboard_v24_projects";

/// Synchronous string key-value store, shaped after browser `localStorage`.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Writes through a tempfile in the same directory, so a reader never
    /// sees a half-written blob.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(self.path_for(key)).map_err(|e| e.error)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads and writes the two dashboard blobs.
#[derive(Debug)]
pub struct Storage<S> {
    store: S,
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load_tasks(&self) -> Vec<Task> {
        self.load_blob(TASKS_KEY, seed_tasks)
    }

    pub fn load_projects(&self) -> ProjectMap {
        self.load_blob(PROJECTS_KEY, seed_projects)
    }

    pub fn save_tasks(&mut self, tasks: &[Task]) -> Result<()> {
        let data = serde_json::to_string(tasks)?;
        self.store.set_item(TASKS_KEY, &data)
    }

    pub fn save_projects(&mut self, projects: &ProjectMap) -> Result<()> {
        let data = serde_json::to_string(projects)?;
        self.store.set_item(PROJECTS_KEY, &data)
    }

    /// Missing blobs mean first run. Unreadable or malformed blobs are
    /// logged and replaced by the defaults in memory only.
    fn load_blob<T: DeserializeOwned>(&self, key: &str, default: impl FnOnce() -> T) -> T {
        let data = match self.store.get_item(key) {
            Ok(Some(data)) => data,
            Ok(None) => {
                debug!(key, "no saved blob, using defaults");
                return default();
            }
            Err(err) => {
                warn!(key, error = %err, "failed to read saved blob, using defaults");
                return default();
            }
        };
        serde_json::from_str(&data).unwrap_or_else(|err| {
            warn!(key, error = %err, "saved blob is corrupt, using defaults");
            default()
        })
    }
}
