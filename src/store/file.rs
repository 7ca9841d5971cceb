use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::{Store, StoreError, StoreKey};

/// Stores each key as `<key>.json` inside a directory.
///
/// The directory is created on the first write.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: StoreKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }
}

impl Store for JsonFileStore {
    fn read(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn write(&mut self, key: StoreKey, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(key);
        fs::write(&path, value).map_err(|source| StoreError::Io { path, source })
    }

    fn delete(&mut self, key: StoreKey) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert_eq!(store.read(StoreKey::History).unwrap(), None);
    }

    #[test]
    fn test_write_creates_directory_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nested"));

        store.write(StoreKey::Identity, "\"alice\"").unwrap();
        store.write(StoreKey::Identity, "\"bob\"").unwrap();

        assert!(store.path_for(StoreKey::Identity).ends_with("identity.json"));
        assert_eq!(
            store.read(StoreKey::Identity).unwrap().as_deref(),
            Some("\"bob\"")
        );
    }

    #[test]
    fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path());

        store.write(StoreKey::Progress, "{}").unwrap();
        store.delete(StoreKey::Progress).unwrap();
        store.delete(StoreKey::Progress).unwrap();
        assert_eq!(store.read(StoreKey::Progress).unwrap(), None);
    }

    #[test]
    fn test_keys_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path());

        for key in StoreKey::ALL {
            store.write(key, key.as_str()).unwrap();
        }
        for key in StoreKey::ALL {
            assert_eq!(store.read(key).unwrap().as_deref(), Some(key.as_str()));
        }
    }
}
