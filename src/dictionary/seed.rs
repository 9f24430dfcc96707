//! Built-in tag library
//!
//! A small set of common WML tags merged into every dictionary on startup.

use super::model::{Definition, Key, KeyType, Mandatory, Scope};
use super::Dictionary;

use super::model::KeyType::{Integer, Path, Translatable};
use super::model::Mandatory::{Mandatory as Required, Optional};
use super::model::Scope::{Official, Umc};

fn key(name: &str, default: &str, key_type: KeyType, level: Mandatory, scope: Scope, comment: &str) -> Key {
    Key::new(name, default, key_type, level, scope).with_comment(comment)
}

/// The seed dictionary
pub fn library() -> Dictionary {
    let mut lib = Dictionary::new();

    lib.insert(
        "part".to_string(),
        vec![Definition::new(vec![
            key("story", "\"\"", Translatable, Required, Official, "The story text to display"),
            key("image", "\"\"", Path, Optional, Official, "Path to the background image"),
        ])],
    );

    lib.insert(
        "variable".to_string(),
        vec![
            Definition::new(vec![
                key("name", "\"\"", KeyType::String, Required, Official, "The name of the variable"),
                key("equals", "\"\"", KeyType::String, Required, Official, "The value of the variable"),
            ]),
            Definition::new(vec![
                key("name", "\"\"", KeyType::String, Required, Official, "The name of the variable"),
                key(
                    "greater_than",
                    "\"\"",
                    Integer,
                    Optional,
                    Umc,
                    "Condition: variable greater than this value",
                ),
            ]),
        ],
    );

    lib.insert(
        "event".to_string(),
        vec![Definition::new(vec![
            key("name", "\"\"", KeyType::String, Required, Official, "Name of the event"),
            key("description", "\"\"", Translatable, Optional, Official, "Description of the event"),
            key("trigger", "\"\"", KeyType::String, Required, Official, "When the event triggers"),
        ])],
    );

    lib.insert(
        "unit".to_string(),
        vec![Definition::new(vec![
            key("type", "\"\"", KeyType::String, Required, Official, "Type of unit"),
            key("x", "0", Integer, Required, Official, "X coordinate on map"),
            key("y", "0", Integer, Required, Official, "Y coordinate on map"),
            key("side", "1", Integer, Required, Official, "Which side the unit belongs to"),
            key("name", "\"\"", Translatable, Optional, Official, "Custom name for the unit"),
        ])],
    );

    lib.insert(
        "side".to_string(),
        vec![Definition::new(vec![
            key("side", "1", Integer, Required, Official, "Side number"),
            key("controller", "\"human\"", KeyType::String, Required, Official, "Who controls this side"),
            key("team_name", "\"\"", KeyType::String, Optional, Official, "Name of the team"),
        ])],
    );

    lib.insert(
        "message".to_string(),
        vec![Definition::new(vec![
            key("speaker", "\"\"", KeyType::String, Optional, Official, "Name of the speaker"),
            key("message", "\"\"", Translatable, Required, Official, "The message text"),
            key("image", "\"\"", Path, Optional, Official, "Portrait image for speaker"),
        ])],
    );

    lib
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_tags() {
        let lib = library();
        let names: Vec<&str> = lib.keys().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["part", "variable", "event", "unit", "side", "message"]);
        assert_eq!(lib["variable"].len(), 2);
    }

    #[test]
    fn test_library_definitions_are_well_formed() {
        for defs in library().values() {
            for def in defs {
                assert!(def.check().is_ok());
                assert!(!def.keys.is_empty());
            }
        }
    }
}
