//! Key-value persistence.
//!
//! A [`Store`] maps a small fixed set of logical keys to serialized JSON
//! documents. The typed helpers in [`records`] sit on top and take care of
//! tolerant parsing and defaults.

mod file;
mod memory;
pub mod records;

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Logical names of everything the application persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreKey {
    Identity,
    Progress,
    History,
    Statistics,
    Preferences,
}

impl StoreKey {
    pub const ALL: [StoreKey; 5] = [
        StoreKey::Identity,
        StoreKey::Progress,
        StoreKey::History,
        StoreKey::Statistics,
        StoreKey::Preferences,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Identity => "identity",
            StoreKey::Progress => "progress",
            StoreKey::History => "history",
            StoreKey::Statistics => "statistics",
            StoreKey::Preferences => "preferences",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: StoreKey,
        #[source]
        source: serde_json::Error,
    },
}

/// Durable storage of raw values by key.
///
/// Writes replace the previous value entirely. Deleting an absent key succeeds.
pub trait Store {
    fn read(&self, key: StoreKey) -> Result<Option<String>, StoreError>;

    fn write(&mut self, key: StoreKey, value: &str) -> Result<(), StoreError>;

    fn delete(&mut self, key: StoreKey) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn read(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&mut self, key: StoreKey, value: &str) -> Result<(), StoreError> {
        (**self).write(key, value)
    }

    fn delete(&mut self, key: StoreKey) -> Result<(), StoreError> {
        (**self).delete(key)
    }
}
