//! Durable local fallback store.
//!
//! Each record kind is mirrored as one serialized snapshot under `"{prefix}_{CACHE_KEY}"`. The cache is
//! written after every successful mutation, whether or not the remote service is in use, so the app can
//! come back up from the last-known-good state.

use std::{
    cell::RefCell,
    collections::BTreeMap,
    fs,
    io::{ErrorKind, Write as _},
    path::{Path, PathBuf},
    rc::Rc,
};

use crate::{
    collection::EntityCollection,
    config::{CacheConfig, DEFAULT_CACHE_PREFIX},
    error::{Error, Result},
    record::Record,
};

/// Values that mean "nothing stored" even though the key exists.
const ABSENCE_MARKERS: &[&str] = &["", "null", "undefined"];

pub trait LocalCache {
    fn prefix(&self) -> &str;

    fn read(&self, key: &str) -> Result<Option<String>>;

    fn write(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    fn key_for<R: Record>(&self) -> String {
        format!("{}_{}", self.prefix(), R::CACHE_KEY)
    }

    /// Serializes the whole collection for `R` and stores it.
    fn save<R: Record>(&self, records: &EntityCollection<R>) -> Result<()> {
        let key = self.key_for::<R>();
        let json = serde_json::to_string(records)?;
        self.write(&key, &json)
    }

    /// Returns the stored collection for `R`, or `None` when nothing usable is stored.
    ///
    /// Never fails: unreadable or malformed entries are logged and treated as absent.
    fn try_load<R: Record>(&self) -> Option<EntityCollection<R>> {
        let key = self.key_for::<R>();

        let raw = match self.read(&key) {
            Ok(raw) => raw?,
            Err(e) => {
                log::error!("Failed to read local cache entry {key}: {e}");
                return None;
            }
        };

        if ABSENCE_MARKERS.contains(&raw.trim()) {
            return None;
        }

        match serde_json::from_str::<EntityCollection<R>>(&raw) {
            Ok(collection) => Some(collection),
            Err(source) => {
                let e = Error::LocalCacheCorrupt { key, source };
                log::warn!("{e}, using defaults instead");
                None
            }
        }
    }

    /// Returns the stored collection for `R`, or `fallback` if it is absent or corrupt.
    fn load<R: Record>(&self, fallback: Vec<R>) -> EntityCollection<R> {
        self.try_load()
            .unwrap_or_else(|| EntityCollection::from_records(fallback))
    }

    /// Whether anything (even a corrupt value) is stored for `R`.
    fn contains<R: Record>(&self) -> bool {
        matches!(self.read(&self.key_for::<R>()), Ok(Some(raw)) if !ABSENCE_MARKERS.contains(&raw.trim()))
    }
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileCache {
    directory: PathBuf,
    prefix: String,
}

impl FileCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            prefix: config.prefix.clone(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{key}.json"))
    }
}

impl LocalCache for FileCache {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.directory)?;

        // write to a sibling temp file and rename over the old snapshot so readers never see half a file
        let mut file = tempfile::NamedTempFile::new_in(&self.directory)?;
        file.write_all(value.as_bytes())?;
        file.flush()?;
        file.persist(self.path_for(key)).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory cache. Clones share the same entries, which lets tests simulate a restart.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    prefix: String,
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_PREFIX)
    }
}

impl MemoryCache {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entries: Rc::default(),
        }
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl LocalCache for MemoryCache {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
