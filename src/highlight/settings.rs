//! Style settings
//!
//! Colors are chosen per key type, bold per mandatory level and italic
//! per scope. Settings are replaced wholesale on save.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::style::{Color, Style};
use crate::dictionary::{Key, KeyType, Mandatory, Scope};
use crate::error::Result;
use crate::storage::{BlobStore, STYLE_KEY};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSettings {
    pub colors: IndexMap<KeyType, Color>,
    pub bold: IndexMap<Mandatory, bool>,
    pub italic: IndexMap<Scope, bool>,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            colors: KeyType::ALL.iter().map(|&t| (t, Color::BLACK)).collect(),
            bold: Mandatory::ALL.iter().map(|&m| (m, false)).collect(),
            italic: Scope::ALL.iter().map(|&s| (s, false)).collect(),
        }
    }
}

impl StyleSettings {
    /// Load saved settings, falling back to defaults
    pub fn load(store: &dyn BlobStore) -> Self {
        match store.read(STYLE_KEY) {
            Ok(Some(text)) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!("Ignoring unreadable style settings: {}", e);
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("Could not read style settings: {}", e);
                Self::default()
            }
        }
    }

    /// Replace the saved settings
    pub fn save(&self, store: &mut dyn BlobStore) -> Result<()> {
        let text = serde_json::to_string(self)?;
        store.write(STYLE_KEY, &text)
    }

    /// Forget the saved settings and return the defaults
    pub fn reset(store: &mut dyn BlobStore) -> Result<Self> {
        store.remove(STYLE_KEY)?;
        Ok(Self::default())
    }

    /// Style for one key: color by type, weight by level, slant by scope
    pub fn key_style(&self, key: &Key) -> Style {
        Style {
            color: self.colors.get(&key.key_type).copied().unwrap_or(Color::BLACK),
            bold: self.bold.get(&key.mandatory).copied().unwrap_or(false),
            italic: self.italic.get(&key.scope).copied().unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn key(key_type: KeyType, mandatory: Mandatory, scope: Scope) -> Key {
        Key::new("k", "v", key_type, mandatory, scope)
    }

    #[test]
    fn test_defaults_are_plain_black() {
        let settings = StyleSettings::default();
        assert_eq!(settings.colors.len(), 6);
        for key_type in KeyType::ALL {
            let style = settings.key_style(&key(key_type, Mandatory::Mandatory, Scope::Umc));
            assert_eq!(style, Style::default());
        }
    }

    #[test]
    fn test_key_style_lookup() {
        let mut settings = StyleSettings::default();
        settings.colors.insert(KeyType::Path, Color::rgb(0, 0, 255));
        settings.bold.insert(Mandatory::Mandatory, true);
        settings.italic.insert(Scope::Umc, true);

        let style = settings.key_style(&key(KeyType::Path, Mandatory::Mandatory, Scope::Umc));
        assert_eq!(style, Style::fg(Color::rgb(0, 0, 255)).with_bold().with_italic());

        let style = settings.key_style(&key(KeyType::String, Mandatory::Optional, Scope::Official));
        assert_eq!(style, Style::default());
    }

    #[test]
    fn test_missing_type_falls_back_to_black() {
        let mut settings = StyleSettings::default();
        settings.colors.clear();
        let style = settings.key_style(&key(KeyType::Integer, Mandatory::Optional, Scope::Umc));
        assert_eq!(style.color, Color::BLACK);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(StyleSettings::default()).unwrap();
        assert_eq!(json["colors"]["translatable"], "#000000");
        assert_eq!(json["bold"]["mandatory"], false);
        assert_eq!(json["italic"]["umc"], false);
    }

    #[test]
    fn test_save_load_reset() {
        let mut store = MemoryStore::new();
        let mut settings = StyleSettings::default();
        settings.colors.insert(KeyType::Boolean, Color::rgb(0, 128, 0));
        settings.save(&mut store).unwrap();
        assert_eq!(StyleSettings::load(&store), settings);

        let defaults = StyleSettings::reset(&mut store).unwrap();
        assert_eq!(defaults, StyleSettings::default());
        assert_eq!(StyleSettings::load(&store), StyleSettings::default());
    }

    #[test]
    fn test_load_corrupt_falls_back() {
        let store = MemoryStore::with_blob(STYLE_KEY, r#"{"colors": {"string": "blue"}}"#);
        assert_eq!(StyleSettings::load(&store), StyleSettings::default());
    }
}
