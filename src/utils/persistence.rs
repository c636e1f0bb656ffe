//! Durable key/value storage for state that outlives a run.
//!
//! Values live in `~/.crawler/store.json` as a flat JSON map of key to integer.
//! `CRAWLER_HOME` overrides the directory.

use crate::core::constants::{STORE_DIR_ENV, STORE_DIR_NAME, STORE_FILENAME};
use crate::core::error::PersistenceError;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Integer values by string key.
pub trait ValueStore {
    fn read(&self, key: &str) -> Result<Option<u64>, PersistenceError>;
    fn write(&mut self, key: &str, value: u64) -> Result<(), PersistenceError>;
}

type StoreMap = BTreeMap<String, u64>;

/// Get the store directory, creating it if needed.
pub fn crawler_dir() -> Result<PathBuf, PersistenceError> {
    let dir = crawler_dir_from(std::env::var_os(STORE_DIR_ENV), dirs::home_dir())?;
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Picks the store directory: `custom` when set and non-empty, otherwise
/// `.crawler` under `home`.
pub fn crawler_dir_from(
    custom: Option<OsString>,
    home: Option<PathBuf>,
) -> Result<PathBuf, PersistenceError> {
    match custom {
        Some(custom) if !custom.is_empty() => Ok(PathBuf::from(custom)),
        _ => home
            .map(|home| home.join(STORE_DIR_NAME))
            .ok_or(PersistenceError::NoHomeDir),
    }
}

/// Load a JSON file, returning `T::default()` if it does not exist yet.
pub fn load_json_or_default<T: Default + serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<T, PersistenceError> {
    match fs::read_to_string(path) {
        Ok(json) => Ok(serde_json::from_str(&json)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

/// Save a value as pretty-printed JSON.
pub fn save_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<(), PersistenceError> {
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    Ok(())
}

/// JSON-file backed store. Every write rewrites the whole file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store at `~/.crawler/store.json` (or under `CRAWLER_HOME`).
    pub fn open_default() -> Result<Self, PersistenceError> {
        Ok(Self::in_dir(crawler_dir()?))
    }

    /// Store file inside an explicit directory. The directory must exist.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(STORE_FILENAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<u64>, PersistenceError> {
        let map: StoreMap = load_json_or_default(&self.path)?;
        Ok(map.get(key).copied())
    }

    fn write(&mut self, key: &str, value: u64) -> Result<(), PersistenceError> {
        // A corrupt file is replaced rather than blocking every future write.
        let mut map: StoreMap = load_json_or_default(&self.path).unwrap_or_default();
        map.insert(key.to_string(), value);
        save_json(&self.path, &map)
    }
}

/// Process-local store for tests and simulations.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: StoreMap,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: u64) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }
}

impl ValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<u64>, PersistenceError> {
        Ok(self.values.get(key).copied())
    }

    fn write(&mut self, key: &str, value: u64) -> Result<(), PersistenceError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::in_dir(dir.path());
        assert_eq!(store.read("crawler.shards").unwrap(), None);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::in_dir(dir.path());
        store.write("crawler.shards", 3).unwrap();
        store.write("other", 9).unwrap();

        let reopened = FileStore::in_dir(dir.path());
        assert_eq!(reopened.read("crawler.shards").unwrap(), Some(3));
        assert_eq!(reopened.read("other").unwrap(), Some(9));
        assert!(store.path().ends_with("store.json"));
    }

    #[test]
    fn test_corrupt_file_is_an_error_on_read() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(STORE_FILENAME), "not json").unwrap();
        let store = FileStore::in_dir(dir.path());
        assert!(matches!(
            store.read("crawler.shards"),
            Err(PersistenceError::Json(_))
        ));
    }

    #[test]
    fn test_write_replaces_corrupt_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(STORE_FILENAME), "{{{").unwrap();
        let mut store = FileStore::in_dir(dir.path());
        store.write("crawler.shards", 1).unwrap();
        assert_eq!(store.read("crawler.shards").unwrap(), Some(1));
    }

    #[test]
    fn test_missing_directory_fails_write() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::in_dir(dir.path().join("gone"));
        assert!(matches!(
            store.write("k", 1),
            Err(PersistenceError::Io(_))
        ));
    }

    #[test]
    fn test_store_dir_prefers_override() {
        let dir = crawler_dir_from(Some("/tmp/custom".into()), Some("/home/me".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/custom"));
    }

    #[test]
    fn test_store_dir_defaults_under_home() {
        let dir = crawler_dir_from(None, Some("/home/me".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/home/me").join(STORE_DIR_NAME));
        assert!(dir.ends_with(".crawler"));

        let empty = crawler_dir_from(Some(OsString::new()), Some("/home/me".into())).unwrap();
        assert_eq!(empty, dir);
    }

    #[test]
    fn test_store_dir_needs_a_home() {
        assert!(matches!(
            crawler_dir_from(None, None),
            Err(PersistenceError::NoHomeDir)
        ));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new().with_value("a", 2);
        assert_eq!(store.read("a").unwrap(), Some(2));
        store.write("a", 5).unwrap();
        assert_eq!(store.read("a").unwrap(), Some(5));
        assert_eq!(store.read("b").unwrap(), None);
    }
}
