//! Template insertion
//!
//! Splices a formatted template into a document at a logical index as a
//! run of its own, moves the cursor past it and re-highlights.

use tracing::info;

use crate::dictionary::Definition;
use crate::document::{mapper, Document, RunKind};
use crate::error::{Result, TagError};
use crate::highlight::{highlight, Highlighter};
use crate::template::{template, IndentSettings};

/// Insert the template for `tag` at `index` and return the new cursor index.
///
/// The template is built and checked before the document is touched, so
/// on error the document is left as it was.
pub fn insert(
    doc: Option<&mut Document>,
    tag: &str,
    definition: &Definition,
    index: usize,
    indent: &IndentSettings,
    highlighter: &Highlighter,
) -> Result<usize> {
    let doc = doc.ok_or(TagError::NoActiveDocument)?;

    let tag = tag.trim();
    if tag.is_empty() {
        return Err(TagError::EmptyTagName);
    }
    definition.check()?;

    let text = template(tag, definition, indent);
    let length = text.chars().count();
    let index = index.min(doc.len());

    let position = mapper::locate(doc, index);
    doc.splice(position, text, RunKind::Template);

    let cursor = index + length;
    mapper::set_cursor(doc, cursor);
    highlight(doc, highlighter);

    info!("Inserted [{}] at {}, cursor now {}", tag, index, cursor);
    Ok(cursor)
}
