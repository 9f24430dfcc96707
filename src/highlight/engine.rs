//! Highlight engine
//!
//! Highlighting re-segments the flat text of a document into plain text,
//! tag brackets and styled `key=value` tokens. Segmenting always starts
//! from the flat text, never from previously rendered output, so a second
//! pass over an unchanged document yields the same runs.

use std::collections::HashMap;

use regex::Regex;
use tracing::{debug, warn};

use super::settings::StyleSettings;
use super::style::Style;
use crate::dictionary::Dictionary;
use crate::document::{mapper, Document, RunKind};

const BRACKET_PATTERN: &str = r"\[[^\[\]\n]+\]";

type Token = (usize, usize, RunKind);

/// Compiled matchers for one dictionary and one set of style settings
pub struct Highlighter {
    bracket: Option<Regex>,
    keys: Option<Regex>,
    styles: HashMap<String, Style>,
}

impl Highlighter {
    /// Build matchers for every key of every stored definition.
    ///
    /// When several definitions share a key name, the style of the last
    /// one in dictionary order is used.
    pub fn new(dictionary: &Dictionary, settings: &StyleSettings) -> Self {
        let mut styles = HashMap::new();
        let mut names: Vec<String> = Vec::new();

        for definition in dictionary.values().flatten() {
            for key in &definition.keys {
                if key.name.is_empty() {
                    continue;
                }
                if styles.insert(key.name.clone(), settings.key_style(key)).is_none() {
                    names.push(regex::escape(&key.name));
                }
            }
        }

        // Longer names first so a name that prefixes another cannot shadow it
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let keys = if names.is_empty() {
            None
        } else {
            let pattern = format!(r"(?:{})=[^\s\[\]]*", names.join("|"));
            compile(&pattern, "key")
        };

        Self {
            bracket: compile(BRACKET_PATTERN, "bracket"),
            keys,
            styles,
        }
    }

    /// Number of distinct key names the highlighter recognises
    pub fn key_count(&self) -> usize {
        self.styles.len()
    }

    /// Split text into typed segments
    pub fn segments(&self, text: &str) -> Vec<(String, RunKind)> {
        let mut out = Vec::new();
        let mut plain_start = 0;
        let mut pos = 0;
        // Next match of each kind; only searched again once passed over
        let mut next_bracket: Option<Option<Token>> = None;
        let mut next_key: Option<Option<Token>> = None;

        while pos < text.len() {
            if matches!(next_bracket, Some(Some(b)) if b.0 < pos) || next_bracket.is_none() {
                next_bracket = Some(self.find_bracket(text, pos));
            }
            if matches!(next_key, Some(Some(k)) if k.0 < pos) || next_key.is_none() {
                next_key = Some(self.find_key(text, pos));
            }
            let bracket = next_bracket.flatten();
            let key = next_key.flatten();

            // At equal starts the bracket token wins
            let (start, end, kind) = match (bracket, key) {
                (Some(b), Some(k)) if k.0 < b.0 => k,
                (Some(b), _) => b,
                (None, Some(k)) => k,
                (None, None) => break,
            };

            if start > plain_start {
                out.push((text[plain_start..start].to_string(), RunKind::Plain));
            }
            out.push((text[start..end].to_string(), kind));
            pos = end;
            plain_start = end;
        }

        if plain_start < text.len() {
            out.push((text[plain_start..].to_string(), RunKind::Plain));
        }
        out
    }

    fn find_bracket(&self, text: &str, start: usize) -> Option<Token> {
        let m = self.bracket.as_ref()?.find_at(text, start)?;
        Some((m.start(), m.end(), RunKind::TagBracket))
    }

    fn find_key(&self, text: &str, start: usize) -> Option<Token> {
        let regex = self.keys.as_ref()?;
        let mut from = start;

        while let Some(m) = regex.find_at(text, from) {
            let preceded_by_word = text[..m.start()]
                .chars()
                .next_back()
                .map_or(false, |c| c.is_alphanumeric() || c == '_');

            if !preceded_by_word {
                let matched = m.as_str();
                let name = matched.split('=').next().unwrap_or(matched);
                if let Some(style) = self.styles.get(name) {
                    return Some((m.start(), m.end(), RunKind::Key(*style)));
                }
            }

            // Step past the first character of the rejected match
            from = m.start() + text[m.start()..].chars().next().map_or(1, |c| c.len_utf8());
        }
        None
    }
}

fn compile(pattern: &str, what: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            warn!("Highlighting disabled for {} tokens: {}", what, e);
            None
        }
    }
}

/// Re-highlight a whole document, keeping the cursor at the same
/// logical index
pub fn highlight(doc: &mut Document, highlighter: &Highlighter) {
    let cursor = mapper::cursor_index(doc);
    let segments = highlighter.segments(&doc.flat_text());
    debug!("Highlight pass: {} segments, cursor at {}", segments.len(), cursor);
    doc.replace_runs(segments);
    mapper::set_cursor(doc, cursor);
}

/// Render a document as HTML-like markup.
///
/// Brackets of tag tokens are written as `&#91;`/`&#93;` and keys are
/// wrapped in spans carrying their inline style.
pub fn markup(doc: &Document) -> String {
    let mut out = String::new();
    for run in doc.runs() {
        match run.kind() {
            RunKind::Plain | RunKind::Template => out.push_str(&escape(run.text())),
            RunKind::TagBracket => {
                let escaped = escape(run.text())
                    .replace('[', "&#91;")
                    .replace(']', "&#93;");
                out.push_str(&escaped);
            }
            RunKind::Key(style) => {
                out.push_str(&format!(
                    "<span style=\"{}\">{}</span>",
                    style.css(),
                    escape(run.text())
                ));
            }
        }
    }
    out
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
