//! Definition form validation
//!
//! Holds the raw fields of the tag creation form and turns them into a
//! definition ready for the store.

use super::model::{Definition, Key, KeyType, Mandatory, Scope};
use crate::error::{Result, TagError};
use crate::template::IndentSettings;

/// One key row as entered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRow {
    pub name: String,
    pub default_value: String,
    pub key_type: KeyType,
    pub mandatory: Mandatory,
    pub scope: Scope,
    pub comment: String,
}

impl Default for KeyRow {
    fn default() -> Self {
        Self {
            name: String::new(),
            default_value: String::new(),
            key_type: KeyType::String,
            mandatory: Mandatory::Mandatory,
            scope: Scope::Official,
            comment: String::new(),
        }
    }
}

impl KeyRow {
    pub fn new(name: impl Into<String>, default_value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_value: default_value.into(),
            ..Default::default()
        }
    }
}

/// Raw contents of the tag creation form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagForm {
    pub tag_name: String,
    pub nested_tags: String,
    pub description: String,
    pub keys: Vec<KeyRow>,
}

impl TagForm {
    /// Fill the form from a stored version, for editing
    pub fn from_definition(tag: &str, definition: &Definition) -> Self {
        Self {
            tag_name: tag.to_string(),
            nested_tags: definition.nested_tags.clone(),
            description: definition.comment.clone(),
            keys: definition
                .keys
                .iter()
                .map(|key| KeyRow {
                    name: key.name.clone(),
                    default_value: key.default_value.clone(),
                    key_type: key.key_type,
                    mandatory: key.mandatory,
                    scope: key.scope,
                    comment: key.comment.clone(),
                })
                .collect(),
        }
    }

    /// Validate the form. Rows without a key name are dropped.
    pub fn validate(&self) -> Result<(String, Definition)> {
        let tag_name = self.tag_name.trim();
        if tag_name.is_empty() {
            return Err(TagError::EmptyTagName);
        }

        let keys = self
            .keys
            .iter()
            .filter(|row| !row.name.trim().is_empty())
            .map(|row| {
                Key::new(
                    row.name.trim(),
                    row.default_value.as_str(),
                    row.key_type,
                    row.mandatory,
                    row.scope,
                )
                .with_comment(row.comment.as_str())
            })
            .collect();

        let definition = Definition::new(keys)
            .with_nested(self.nested_tags.trim())
            .with_comment(self.description.trim());

        Ok((tag_name.to_string(), definition))
    }

    /// Live preview text, with placeholders for empty fields
    pub fn preview(&self, indent: &IndentSettings) -> String {
        let tag_name = match self.tag_name.trim() {
            "" => "tag",
            name => name,
        };

        let mut out = format!("[{}]\n", tag_name);
        for row in &self.keys {
            let name = if row.name.is_empty() { "key" } else { row.name.as_str() };
            let default = if row.default_value.is_empty() {
                "\"\""
            } else {
                row.default_value.as_str()
            };
            out.push_str(&format!(
                "{}{}={} ({}, {}, {})\n",
                indent.unit(1),
                name,
                default,
                row.key_type.name(),
                row.mandatory.name(),
                row.scope.name()
            ));
        }
        out.push_str(&format!("[/{}]", tag_name));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_tag_name() {
        let form = TagForm {
            tag_name: "   ".to_string(),
            keys: vec![KeyRow::new("x", "1")],
            ..Default::default()
        };
        assert!(matches!(form.validate(), Err(TagError::EmptyTagName)));
    }

    #[test]
    fn test_validate_drops_unnamed_rows() {
        let form = TagForm {
            tag_name: " unit ".to_string(),
            nested_tags: " modifications ".to_string(),
            description: "A unit".to_string(),
            keys: vec![KeyRow::new(" x ", "0"), KeyRow::new("  ", "ignored")],
        };

        let (name, def) = form.validate().unwrap();
        assert_eq!(name, "unit");
        assert_eq!(def.keys.len(), 1);
        assert_eq!(def.keys[0].name, "x");
        assert_eq!(def.nested_tags, "modifications");
        assert_eq!(def.comment, "A unit");
    }

    #[test]
    fn test_preview_placeholders() {
        let form = TagForm {
            keys: vec![KeyRow::default()],
            ..Default::default()
        };
        assert_eq!(
            form.preview(&IndentSettings::default()),
            "[tag]\n\tkey=\"\" (string, mandatory, official)\n[/tag]"
        );
    }

    #[test]
    fn test_from_definition_round_trip() {
        let definition = Definition::new(vec![
            Key::new("side", "1", KeyType::Integer, Mandatory::Mandatory, Scope::Official)
                .with_comment("Side number"),
            Key::new("image", "\"\"", KeyType::Path, Mandatory::Optional, Scope::Umc),
        ])
        .with_nested("ai, village")
        .with_comment("A playable side");

        let form = TagForm::from_definition("side", &definition);
        assert_eq!(form.tag_name, "side");
        assert_eq!(form.description, "A playable side");
        assert_eq!(form.keys.len(), 2);
        assert_eq!(form.keys[1].key_type, KeyType::Path);

        let (name, validated) = form.validate().unwrap();
        assert_eq!(name, "side");
        assert_eq!(validated, definition);
    }
}
