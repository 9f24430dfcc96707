//! Template formatting
//!
//! Two renderings of a definition:
//! - the insertable template, `name=default` lines with empty nested blocks
//! - the annotated form, which carries key types and comments and can be
//!   read back by the manual parser

use super::indent::{reindent, IndentSettings};
use crate::dictionary::Definition;

/// Render the insertable template for `tag`
pub fn format(tag: &str, definition: &Definition, indent: &IndentSettings) -> String {
    let mut out = format!("[{}]\n", tag);

    for key in &definition.keys {
        out.push_str(&format!("{}{}={}\n", indent.unit(1), key.name, key.default_value));
    }

    if !definition.nested_tags.is_empty() {
        out.push('\n');
        for nested in definition.nested_names() {
            out.push_str(&format!("{}[{}]\n", indent.unit(1), nested));
            out.push_str(&format!("{}[/{}]\n", indent.unit(1), nested));
        }
    }

    out.push_str(&format!("[/{}]\n", tag));
    out
}

/// Render the template and run the re-indent pass over it
pub fn template(tag: &str, definition: &Definition, indent: &IndentSettings) -> String {
    reindent(&format(tag, definition, indent), indent)
}

/// Render the annotated dictionary form of `tag`
pub fn format_annotated(tag: &str, definition: &Definition, indent: &IndentSettings) -> String {
    let mut out = format!("[{}]\n", tag);
    let pad = indent.unit(1);

    if !definition.comment.is_empty() {
        out.push_str(&format!("{}# {}\n", pad, definition.comment));
    }

    for key in &definition.keys {
        out.push_str(&format!(
            "{}{}={} ({}, {}, {})",
            pad,
            key.name,
            key.default_value,
            key.key_type.name(),
            key.mandatory.name(),
            key.scope.name()
        ));
        if !key.comment.is_empty() {
            out.push_str(&format!(" # {}", key.comment));
        }
        out.push('\n');
    }

    if !definition.nested_tags.is_empty() {
        out.push_str(&format!("{}nested_tags = \"{}\"\n", pad, definition.nested_tags));
    }

    out.push_str(&format!("[/{}]\n", tag));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{parser, Key, KeyType, Mandatory, Scope};

    fn unit_definition() -> Definition {
        Definition::new(vec![
            Key::new("type", "\"\"", KeyType::String, Mandatory::Mandatory, Scope::Official)
                .with_comment("Type of unit"),
            Key::new("x", "0", KeyType::Integer, Mandatory::Mandatory, Scope::Official),
            Key::new("canrecruit", "no", KeyType::Boolean, Mandatory::Optional, Scope::Umc),
        ])
    }

    #[test]
    fn test_format_keys() {
        let def = Definition::new(vec![Key::new(
            "x",
            "1",
            KeyType::Integer,
            Mandatory::Mandatory,
            Scope::Official,
        )]);
        assert_eq!(
            format("foo", &def, &IndentSettings::default()),
            "[foo]\n\tx=1\n[/foo]\n"
        );
    }

    #[test]
    fn test_format_nested_tags() {
        let def = Definition::default().with_nested("filter, message");
        let expected = "[event]\n\n  [filter]\n  [/filter]\n  [message]\n  [/message]\n[/event]\n";
        assert_eq!(format("event", &def, &IndentSettings::spaces(2)), expected);
    }

    #[test]
    fn test_template_reindents_nested() {
        let def = Definition::new(vec![Key::new(
            "name",
            "\"\"",
            KeyType::String,
            Mandatory::Mandatory,
            Scope::Official,
        )])
        .with_nested("filter");
        let text = template("event", &def, &IndentSettings::default());
        assert_eq!(text, "[event]\n\tname=\"\"\n\n\t[filter]\n\t[/filter]\n[/event]\n");
        assert_eq!(reindent(&text, &IndentSettings::default()), text);
    }

    #[test]
    fn test_annotated_roundtrip() {
        let def = unit_definition()
            .with_nested("modifications, status")
            .with_comment("A unit on the map");
        let text = format_annotated("unit", &def, &IndentSettings::default());

        let parsed = parser::parse(&text);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "unit");
        assert_eq!(parsed[0].definition, def);
    }

    #[test]
    fn test_annotated_shape() {
        let def = Definition::new(vec![Key::new(
            "x",
            "0",
            KeyType::Integer,
            Mandatory::Optional,
            Scope::Umc,
        )]);
        assert_eq!(
            format_annotated("pos", &def, &IndentSettings::spaces(2)),
            "[pos]\n  x=0 (integer, optional, umc)\n[/pos]\n"
        );
    }
}
