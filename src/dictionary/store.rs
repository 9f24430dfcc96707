//! Versioned tag definition store
//!
//! The whole dictionary is kept as one JSON blob. Every mutation reads the
//! current mapping, changes it and writes the whole mapping back, so a
//! failed write never leaves a half-updated dictionary behind. Reads for
//! display are lenient; reads that precede a write are strict, so data
//! that cannot be decoded is never overwritten.

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::model::{Definition, Key};
use super::Dictionary;
use crate::error::{Result, TagError};
use crate::storage::{BlobStore, TAGS_KEY};

/// How a new definition is combined with existing versions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// Push as an additional version
    Append,
    /// Discard every existing version
    Replace,
}

/// Shape of a stored version: current record, or the bare key list
/// written before versions carried nested tags
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredDefinition {
    Legacy(Vec<Key>),
    Current(Definition),
}

impl From<StoredDefinition> for Definition {
    fn from(stored: StoredDefinition) -> Self {
        match stored {
            StoredDefinition::Legacy(keys) => Definition::new(keys),
            StoredDefinition::Current(def) => def,
        }
    }
}

/// One entry of the student-facing tag list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLabel {
    /// Text shown to the user (`event` or `event 2`)
    pub label: String,
    pub tag: String,
    /// Zero-based version index
    pub index: usize,
}

/// Dictionary of tag definitions backed by a blob store
pub struct DefinitionStore<S: BlobStore> {
    backend: S,
}

impl<S: BlobStore> DefinitionStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    /// Current dictionary. Absent or unreadable data yields an empty map.
    pub fn get(&self) -> Dictionary {
        let text = match self.backend.read(TAGS_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => return Dictionary::new(),
            Err(e) => {
                warn!("Could not read tag dictionary: {}", e);
                return Dictionary::new();
            }
        };

        match migrate(&text, false) {
            Ok(dict) => dict,
            Err(e) => {
                warn!("Discarding unreadable tag dictionary: {}", e);
                Dictionary::new()
            }
        }
    }

    /// Store a definition for `tag`
    pub fn save(&mut self, tag: &str, definition: Definition, mode: SaveMode) -> Result<()> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(TagError::EmptyTagName);
        }

        let mut dict = self.load()?;
        match mode {
            SaveMode::Replace => {
                dict.insert(tag.to_string(), vec![definition]);
            }
            SaveMode::Append => {
                dict.entry(tag.to_string()).or_default().push(definition);
            }
        }

        self.persist(&dict)?;
        info!("Saved tag [{}] ({:?}, {} version(s))", tag, mode, dict[tag].len());
        Ok(())
    }

    /// Remove one version; the tag disappears with its last version
    pub fn delete(&mut self, tag: &str, index: usize) -> Result<()> {
        let mut dict = self.load()?;
        let versions = dict
            .get_mut(tag)
            .ok_or_else(|| TagError::NoSuchTag(tag.to_string()))?;
        if index >= versions.len() {
            return Err(TagError::NoSuchVersion {
                tag: tag.to_string(),
                index,
            });
        }

        versions.remove(index);
        if versions.is_empty() {
            dict.shift_remove(tag);
        }

        self.persist(&dict)?;
        info!("Deleted version {} of tag [{}]", index + 1, tag);
        Ok(())
    }

    /// Look up one version of a tag
    pub fn definition(&self, tag: &str, index: usize) -> Result<Definition> {
        let dict = self.get();
        let versions = dict
            .get(tag)
            .ok_or_else(|| TagError::NoSuchTag(tag.to_string()))?;
        versions
            .get(index)
            .cloned()
            .ok_or_else(|| TagError::NoSuchVersion {
                tag: tag.to_string(),
                index,
            })
    }

    /// Check whether a tag already has at least one version
    pub fn contains(&self, tag: &str) -> bool {
        self.get().get(tag).is_some_and(|v| !v.is_empty())
    }

    /// One label per version, numbered when a tag has several
    pub fn labels(&self) -> Vec<TagLabel> {
        let mut labels = Vec::new();
        for (tag, versions) in &self.get() {
            for index in 0..versions.len() {
                let label = if versions.len() > 1 {
                    format!("{} {}", tag, index + 1)
                } else {
                    tag.clone()
                };
                labels.push(TagLabel {
                    label,
                    tag: tag.clone(),
                    index,
                });
            }
        }
        labels
    }

    /// `tag (count)` list, or `none`
    pub fn summary(&self) -> String {
        let dict = self.get();
        if dict.is_empty() {
            return "none".to_string();
        }
        dict.iter()
            .map(|(tag, versions)| format!("{} ({})", tag, versions.len()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Merge a library additively, skipping versions already present.
    /// Returns whether anything was added.
    pub fn seed(&mut self, library: &Dictionary) -> Result<bool> {
        let mut dict = self.load()?;
        let mut added = 0;

        for (tag, lib_versions) in library {
            let versions = dict.entry(tag.clone()).or_default();
            for def in lib_versions {
                if !versions.contains(def) {
                    versions.push(def.clone());
                    added += 1;
                }
            }
        }

        if added == 0 {
            debug!("Seed library already present");
            return Ok(false);
        }

        self.persist(&dict)?;
        info!("Merged {} seed definition(s) into the dictionary", added);
        Ok(true)
    }

    /// Strict read for write paths: any read or decode failure is an
    /// error, so a partial map is never written back over the blob
    fn load(&self) -> Result<Dictionary> {
        match self.backend.read(TAGS_KEY)? {
            Some(text) => migrate(&text, true),
            None => Ok(Dictionary::new()),
        }
    }

    fn persist(&mut self, dict: &Dictionary) -> Result<()> {
        let text = serde_json::to_string(dict)?;
        self.backend.write(TAGS_KEY, &text)
    }
}

/// Parse a stored dictionary, lifting legacy versions into the current shape.
///
/// A version that does not decode is an error when `strict`, otherwise it
/// is logged and dropped.
fn migrate(text: &str, strict: bool) -> Result<Dictionary> {
    let stored: IndexMap<String, Vec<serde_json::Value>> = serde_json::from_str(text)?;

    let mut dict = Dictionary::new();
    for (tag, versions) in stored {
        if tag.is_empty() || versions.is_empty() {
            debug!("Skipping empty dictionary entry '{}'", tag);
            continue;
        }

        let mut definitions = Vec::with_capacity(versions.len());
        for (index, value) in versions.into_iter().enumerate() {
            match serde_json::from_value::<StoredDefinition>(value) {
                Ok(stored) => definitions.push(Definition::from(stored)),
                Err(e) if strict => {
                    return Err(TagError::MalformedDefinition(format!(
                        "tag '{}' version {}: {}",
                        tag,
                        index + 1,
                        e
                    )));
                }
                Err(e) => warn!("Skipping unreadable version {} of [{}]: {}", index + 1, tag, e),
            }
        }

        if !definitions.is_empty() {
            dict.insert(tag, definitions);
        }
    }
    Ok(dict)
}
