//! Manual definition parser
//!
//! Reads tag definitions typed by hand:
//!
//! ```text
//! [event]
//! # Fires when something happens
//! name="start" (string, mandatory, official)  # Event name
//! first_time_only=yes (boolean, optional, official)
//! nested_tags = "filter, message"
//! [/event]
//! ```
//!
//! Blocks are matched by literal name: a block ends at the first `[/name]`
//! carrying the same name. Nesting is expressed through `nested_tags`, not
//! by placing blocks inside each other. Lines that fit no pattern are
//! skipped; the parser never fails.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::model::{Definition, Key, KeyType, Mandatory, Scope};

/// A tag read from manual input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTag {
    pub name: String,
    pub definition: Definition,
}

/// Compiled patterns, built once
struct Patterns {
    open_tag: Regex,
    key: Regex,
    nested: Regex,
}

fn patterns() -> Option<&'static Patterns> {
    static PATTERNS: OnceLock<Option<Patterns>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            Some(Patterns {
                open_tag: Regex::new(r"\[(\w+)\]").ok()?,
                key: Regex::new(
                    r#"(\w+)\s*=\s*("[^"]*"|\S+)\s+\(([^,]+),\s*([^,]+),\s*([^)]+)\)(?:\s*#\s*(.*))?"#,
                )
                .ok()?,
                nested: Regex::new(r#"(?i)nested_tags\s*=\s*"([^"]+)""#).ok()?,
            })
        })
        .as_ref()
}

/// Parse every `[name] ... [/name]` block in `input`
pub fn parse(input: &str) -> Vec<ParsedTag> {
    let mut tags = Vec::new();
    let Some(patterns) = patterns() else {
        return tags;
    };
    let mut pos = 0;

    while let Some(caps) = patterns.open_tag.captures_at(input, pos) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let name = name.as_str();
        let close = format!("[/{}]", name);

        match input[whole.end()..].find(&close) {
            Some(rel) => {
                let body = &input[whole.end()..whole.end() + rel];
                tags.push(ParsedTag {
                    name: name.to_string(),
                    definition: parse_body(patterns, body),
                });
                pos = whole.end() + rel + close.len();
            }
            None => {
                // Unclosed: try the next opening bracket
                pos = whole.start() + 1;
            }
        }
    }

    debug!("Parsed {} tag block(s)", tags.len());
    tags
}

/// Parse the content between an opening and closing tag
fn parse_body(patterns: &Patterns, body: &str) -> Definition {
    let content = body.trim();
    let mut definition = Definition::default();

    if let Some(first) = content.lines().next() {
        if let Some(comment) = first.strip_prefix('#') {
            definition.comment = comment.trim().to_string();
        }
    }

    if let Some(caps) = patterns.nested.captures(content) {
        definition.nested_tags = caps[1].to_string();
    }

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || patterns.nested.is_match(line) {
            continue;
        }
        match parse_key(&patterns.key, line) {
            Some(key) => definition.keys.push(key),
            None => debug!("Skipping unrecognised line: {}", line),
        }
    }

    definition
}

/// Parse `name = value (type, mandatory, scope) # comment`
fn parse_key(pattern: &Regex, line: &str) -> Option<Key> {
    let caps = pattern.captures(line)?;
    let key_type = KeyType::from_name(&caps[3])?;
    let mandatory = Mandatory::from_name(&caps[4])?;
    let scope = Scope::from_name(&caps[5])?;

    let mut key = Key::new(&caps[1], &caps[2], key_type, mandatory, scope);
    if let Some(comment) = caps.get(6) {
        key.comment = comment.as_str().trim().to_string();
    }
    Some(key)
}
