//! Tag definition data model
//!
//! A tag is described by one or more versions of a `Definition`, each an
//! ordered list of typed `Key`s plus the names of tags nested inside it.

use serde::{Deserialize, Deserializer, Serialize};

/// Value type of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    String,
    Translatable,
    Integer,
    Numeric,
    Boolean,
    Path,
}

impl KeyType {
    /// All key types, in form order
    pub const ALL: [KeyType; 6] = [
        KeyType::String,
        KeyType::Translatable,
        KeyType::Integer,
        KeyType::Numeric,
        KeyType::Boolean,
        KeyType::Path,
    ];

    /// Name as written in definitions and stored JSON
    pub fn name(&self) -> &'static str {
        match self {
            KeyType::String => "string",
            KeyType::Translatable => "translatable",
            KeyType::Integer => "integer",
            KeyType::Numeric => "numeric",
            KeyType::Boolean => "boolean",
            KeyType::Path => "path",
        }
    }

    /// Parse a type name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "string" => Some(KeyType::String),
            "translatable" => Some(KeyType::Translatable),
            "integer" => Some(KeyType::Integer),
            "numeric" => Some(KeyType::Numeric),
            "boolean" => Some(KeyType::Boolean),
            "path" => Some(KeyType::Path),
            _ => None,
        }
    }
}

/// Whether a key must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mandatory {
    Mandatory,
    Optional,
}

impl Mandatory {
    pub const ALL: [Mandatory; 2] = [Mandatory::Mandatory, Mandatory::Optional];

    pub fn name(&self) -> &'static str {
        match self {
            Mandatory::Mandatory => "mandatory",
            Mandatory::Optional => "optional",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "mandatory" => Some(Mandatory::Mandatory),
            "optional" => Some(Mandatory::Optional),
            _ => None,
        }
    }
}

/// Where a key is recognised: the official engine or user-made content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Official,
    Umc,
}

impl Scope {
    pub const ALL: [Scope; 2] = [Scope::Official, Scope::Umc];

    pub fn name(&self) -> &'static str {
        match self {
            Scope::Official => "official",
            Scope::Umc => "umc",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "official" => Some(Scope::Official),
            "umc" => Some(Scope::Umc),
            _ => None,
        }
    }
}

/// A single attribute of a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    pub name: String,
    #[serde(rename = "defaultValue", default, deserialize_with = "empty_if_null")]
    pub default_value: String,
    #[serde(rename = "type")]
    pub key_type: KeyType,
    pub mandatory: Mandatory,
    pub scope: Scope,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub comment: String,
}

impl Key {
    /// Create a key without a comment
    pub fn new(
        name: impl Into<String>,
        default_value: impl Into<String>,
        key_type: KeyType,
        mandatory: Mandatory,
        scope: Scope,
    ) -> Self {
        Self {
            name: name.into(),
            default_value: default_value.into(),
            key_type,
            mandatory,
            scope,
            comment: String::new(),
        }
    }

    /// Builder: attach a comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

/// One version of a tag's key set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default)]
    pub keys: Vec<Key>,
    /// Comma-separated nested tag names, possibly empty
    #[serde(default, deserialize_with = "empty_if_null")]
    pub nested_tags: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub comment: String,
}

/// Stored definitions may carry `null` where a string is expected
fn empty_if_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Definition {
    /// Create a definition from keys alone
    pub fn new(keys: Vec<Key>) -> Self {
        Self {
            keys,
            ..Default::default()
        }
    }

    /// Builder: set nested tags
    pub fn with_nested(mut self, nested_tags: impl Into<String>) -> Self {
        self.nested_tags = nested_tags.into();
        self
    }

    /// Builder: set the tag comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Nested tag names, split on commas and trimmed, empties dropped
    pub fn nested_names(&self) -> Vec<&str> {
        self.nested_tags
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Check that every key has a name
    pub fn check(&self) -> crate::error::Result<()> {
        match self.keys.iter().position(|k| k.name.trim().is_empty()) {
            Some(idx) => Err(crate::error::TagError::MalformedDefinition(format!(
                "key {} has no name",
                idx + 1
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_roundtrip() {
        for key_type in KeyType::ALL {
            assert_eq!(KeyType::from_name(key_type.name()), Some(key_type));
        }
        for level in Mandatory::ALL {
            assert_eq!(Mandatory::from_name(level.name()), Some(level));
        }
        for scope in Scope::ALL {
            assert_eq!(Scope::from_name(scope.name()), Some(scope));
        }
    }

    #[test]
    fn test_from_name_lenient() {
        assert_eq!(KeyType::from_name(" Integer "), Some(KeyType::Integer));
        assert_eq!(Scope::from_name("UMC"), Some(Scope::Umc));
        assert_eq!(KeyType::from_name("float"), None);
        assert_eq!(Mandatory::from_name(""), None);
    }

    #[test]
    fn test_key_json_shape() {
        let key = Key::new("x", "0", KeyType::Integer, Mandatory::Mandatory, Scope::Official);
        let json = serde_json::to_value(&key).unwrap();
        assert_eq!(json["defaultValue"], "0");
        assert_eq!(json["type"], "integer");
        assert_eq!(json["mandatory"], "mandatory");
        assert_eq!(json["scope"], "official");
        assert_eq!(json["comment"], "");
    }

    #[test]
    fn test_definition_missing_fields_default() {
        let def: Definition = serde_json::from_str(r#"{"keys": []}"#).unwrap();
        assert_eq!(def.nested_tags, "");
        assert_eq!(def.comment, "");

        let def: Definition =
            serde_json::from_str(r#"{"keys": [], "nested_tags": null, "comment": null}"#).unwrap();
        assert_eq!(def, Definition::default());
    }

    #[test]
    fn test_nested_names() {
        let def = Definition::default().with_nested("a, b ,, c");
        assert_eq!(def.nested_names(), vec!["a", "b", "c"]);
        assert!(Definition::default().nested_names().is_empty());
    }

    #[test]
    fn test_check_rejects_unnamed_key() {
        let def = Definition::new(vec![Key::new(
            " ",
            "1",
            KeyType::Integer,
            Mandatory::Optional,
            Scope::Umc,
        )]);
        assert!(def.check().is_err());
        assert!(Definition::default().check().is_ok());
    }
}
