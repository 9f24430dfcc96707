//! Persistent blob storage
//!
//! The dictionary and the editor settings are stored as JSON text under
//! fixed string keys. A store only knows about keys and text; callers own
//! the serialization.
//!
//! The file-backed store keeps one file per key:
//!
//! ```text
//! ~/.wmltag/
//!     editor-text-tags.json
//!     editor-text-style-settings.json
//!     editor-text-indentation-settings.json
//! ```

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, TagError};

/// Key holding the tag dictionary
pub const TAGS_KEY: &str = "editor-text-tags";

/// Key holding the style settings
pub const STYLE_KEY: &str = "editor-text-style-settings";

/// Key holding the indentation settings
pub const INDENT_KEY: &str = "editor-text-indentation-settings";

/// A string-keyed text blob store
pub trait BlobStore {
    /// Read the blob stored under `key`, or `None` if absent
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob stored under `key`
    fn write(&mut self, key: &str, text: &str) -> Result<()>;

    /// Remove the blob stored under `key` (absent keys are not an error)
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store, used by tests and throwaway sessions
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
    /// When set, every write fails
    pub read_only: bool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with one blob already present
    pub fn with_blob(key: &str, text: &str) -> Self {
        let mut store = Self::new();
        store.blobs.insert(key.to_string(), text.to_string());
        store
    }

    /// Peek at the raw blob for a key
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.blobs.get(key).map(|s| s.as_str())
    }
}

impl BlobStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn write(&mut self, key: &str, text: &str) -> Result<()> {
        if self.read_only {
            return Err(TagError::Persistence {
                key: key.to_string(),
                reason: "store is read-only".to_string(),
            });
        }
        self.blobs.insert(key.to_string(), text.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.read_only {
            return Err(TagError::Persistence {
                key: key.to_string(),
                reason: "store is read-only".to_string(),
            });
        }
        self.blobs.remove(key);
        Ok(())
    }
}

/// Directory-backed store, one `<key>.json` file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir` (created lazily on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default store directory (~/.wmltag or %USERPROFILE%\.wmltag)
    pub fn default_dir() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|p| PathBuf::from(p).join(".wmltag"))
        }
        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|p| PathBuf::from(p).join(".wmltag"))
        }
    }

    /// Directory this store writes into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl BlobStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, text: &str) -> Result<()> {
        let persist = || -> io::Result<()> {
            fs::create_dir_all(&self.dir)?;
            let path = self.path_for(key);
            // Write beside the target, then swap it in
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, text)?;
            fs::rename(&tmp, &path)
        };

        persist().map_err(|e| TagError::Persistence {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TagError::Persistence {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}
