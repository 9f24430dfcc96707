//! Text runs: typed fragments of a document

use crate::highlight::Style;

/// Identity of a run within its document.
///
/// Ids are never reused, so an id taken before a rewrite will not match
/// any run created by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(pub(crate) u64);

/// What a run holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    /// Ordinary text
    Plain,
    /// A freshly inserted template block, not yet highlighted
    Template,
    /// A `[name]` or `[/name]` token
    TagBracket,
    /// A `key=value` token with its style
    Key(Style),
}

/// A contiguous fragment of document text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    id: RunId,
    text: String,
    kind: RunKind,
}

impl Run {
    pub(crate) fn new(id: RunId, text: String, kind: RunKind) -> Self {
        Self { id, text, kind }
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> RunKind {
        self.kind
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte position of a character offset, clamped to the end
    pub fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(pos, _)| pos)
            .unwrap_or(self.text.len())
    }

    /// Split at a character offset, returning the remainder
    pub(crate) fn split_off(&mut self, char_idx: usize) -> String {
        let byte_pos = self.char_to_byte(char_idx);
        self.text.split_off(byte_pos)
    }
}
