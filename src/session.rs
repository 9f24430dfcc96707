//! Authoring session
//!
//! Holds everything that lives between user actions: the dictionary
//! store, the open document, a save waiting on a conflict decision, the
//! last known cursor index and the focus flag.

use std::ops::RangeInclusive;

use tracing::{debug, info};

use crate::dictionary::{parser, Definition, DefinitionStore, ParsedTag, SaveMode, TagForm};
use crate::document::{mapper, Document};
use crate::error::{Result, TagError};
use crate::highlight::{highlight, Highlighter, StyleSettings};
use crate::insert;
use crate::storage::BlobStore;
use crate::template::IndentSettings;

/// Result of a save request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// These tags were appended
    Saved(Vec<String>),
    /// This tag already exists; the save is pending until resolved
    Conflict(String),
}

/// A save held back because the tag already exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    pub tag: String,
    pub definition: Definition,
}

/// Session state, replacing what would otherwise be globals
pub struct Session<S: BlobStore> {
    /// Tag dictionary
    pub store: DefinitionStore<S>,
    /// Document being edited, if any
    pub document: Option<Document>,
    /// Save waiting for an append/replace decision
    pub pending: Option<PendingSave>,
    /// Cursor index recorded on the last focus change
    pub last_cursor: usize,
    /// Whether the document has focus
    pub focused: bool,
    /// Lines in the document after the last update
    pub line_count: usize,
}

impl<S: BlobStore> Session<S> {
    /// Create a session with no open document
    pub fn new(backend: S) -> Self {
        Self {
            store: DefinitionStore::new(backend),
            document: None,
            pending: None,
            last_cursor: 0,
            focused: false,
            line_count: 1,
        }
    }

    /// Make `document` the live document, cursor at the end
    pub fn open(&mut self, mut document: Document) {
        let end = document.len();
        mapper::set_cursor(&mut document, end);
        self.last_cursor = end;
        self.line_count = document.line_count();
        self.document = Some(document);
    }

    /// Close the live document and return it
    pub fn close(&mut self) -> Option<Document> {
        self.focused = false;
        self.line_count = 1;
        self.document.take()
    }

    /// Highlighter for the current dictionary and style settings
    pub fn highlighter(&self) -> Highlighter {
        let settings = StyleSettings::load(self.store.backend());
        Highlighter::new(&self.store.get(), &settings)
    }

    pub fn indentation(&self) -> IndentSettings {
        IndentSettings::load(self.store.backend())
    }

    /// Parse manual input and save every tag found.
    ///
    /// If any tag is already in the dictionary, nothing is saved and the
    /// first such tag becomes the pending save.
    pub fn save_manual(&mut self, input: &str) -> Result<SaveOutcome> {
        let parsed = parse_input(input)?;

        if let Some(conflict) = parsed.iter().find(|p| self.store.contains(&p.name)) {
            info!("Tag [{}] already exists, waiting for decision", conflict.name);
            let tag = conflict.name.clone();
            self.pending = Some(PendingSave {
                tag: tag.clone(),
                definition: conflict.definition.clone(),
            });
            return Ok(SaveOutcome::Conflict(tag));
        }

        let mut saved = Vec::with_capacity(parsed.len());
        for tag in parsed {
            self.store.save(&tag.name, tag.definition, SaveMode::Append)?;
            saved.push(tag.name);
        }
        Ok(SaveOutcome::Saved(saved))
    }

    /// Parse manual input and save every tag with `mode`, skipping the
    /// conflict check
    pub fn save_manual_with(&mut self, input: &str, mode: SaveMode) -> Result<Vec<String>> {
        let parsed = parse_input(input)?;

        let mut saved = Vec::with_capacity(parsed.len());
        for tag in parsed {
            self.store.save(&tag.name, tag.definition, mode)?;
            saved.push(tag.name);
        }
        Ok(saved)
    }

    /// Validate the tag form and save it
    pub fn save_form(&mut self, form: &TagForm) -> Result<SaveOutcome> {
        let (tag, definition) = form.validate()?;

        if self.store.contains(&tag) {
            info!("Tag [{}] already exists, waiting for decision", tag);
            self.pending = Some(PendingSave {
                tag: tag.clone(),
                definition,
            });
            return Ok(SaveOutcome::Conflict(tag));
        }

        self.store.save(&tag, definition, SaveMode::Append)?;
        Ok(SaveOutcome::Saved(vec![tag]))
    }

    /// Load version `index` of `tag` into a form for editing
    pub fn edit_form(&self, tag: &str, index: usize) -> Result<TagForm> {
        let definition = self.store.definition(tag, index)?;
        Ok(TagForm::from_definition(tag, &definition))
    }

    /// Save the pending definition with `mode` and return its tag
    pub fn resolve_pending(&mut self, mode: SaveMode) -> Result<String> {
        let pending = self
            .pending
            .take()
            .ok_or_else(|| TagError::Message("No save is pending".to_string()))?;

        if let Err(e) = self.store.save(&pending.tag, pending.definition.clone(), mode) {
            self.pending = Some(pending);
            return Err(e);
        }
        Ok(pending.tag)
    }

    /// Drop the pending save
    pub fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!("Cancelled pending save of [{}]", pending.tag);
        }
    }

    /// Insert version `index` of `tag` at the cursor
    pub fn insert(&mut self, tag: &str, index: usize) -> Result<usize> {
        let definition = self.store.definition(tag, index)?;
        let indent = self.indentation();
        let highlighter = self.highlighter();

        let at = match &self.document {
            Some(doc) if self.focused => mapper::cursor_index(doc),
            _ => self.last_cursor,
        };

        let cursor = insert::insert(
            self.document.as_mut(),
            tag,
            &definition,
            at,
            &indent,
            &highlighter,
        )?;

        self.last_cursor = cursor;
        self.update_line_count();
        Ok(cursor)
    }

    /// The document gained focus
    pub fn focus(&mut self) {
        self.focused = true;
        self.record_cursor();
    }

    /// The document lost focus: remember the cursor and re-highlight
    pub fn blur(&mut self) {
        self.record_cursor();
        self.focused = false;
        self.refresh();
    }

    /// Re-highlight the live document
    pub fn refresh(&mut self) {
        let highlighter = self.highlighter();
        if let Some(doc) = self.document.as_mut() {
            highlight(doc, &highlighter);
        }
        self.update_line_count();
    }

    /// Persist new style settings and re-highlight
    pub fn apply_style_settings(&mut self, settings: &StyleSettings) -> Result<()> {
        settings.save(self.store.backend_mut())?;
        self.refresh();
        Ok(())
    }

    /// Restore default style settings and re-highlight
    pub fn reset_style_settings(&mut self) -> Result<StyleSettings> {
        let settings = StyleSettings::reset(self.store.backend_mut())?;
        self.refresh();
        Ok(settings)
    }

    pub fn set_indentation(&mut self, settings: &IndentSettings) -> Result<()> {
        settings.save(self.store.backend_mut())
    }

    /// Line numbers for the side display
    pub fn line_numbers(&self) -> RangeInclusive<usize> {
        1..=self.line_count
    }

    fn record_cursor(&mut self) {
        if let Some(doc) = &self.document {
            self.last_cursor = mapper::cursor_index(doc);
        }
    }

    fn update_line_count(&mut self) {
        self.line_count = self.document.as_ref().map_or(1, |d| d.line_count());
    }
}

/// Parse manual input, treating blank input and input without tag
/// blocks as errors
fn parse_input(input: &str) -> Result<Vec<ParsedTag>> {
    if input.trim().is_empty() {
        return Err(TagError::EmptyInput);
    }

    let parsed = parser::parse(input);
    debug!("Parsed {} tag block(s)", parsed.len());
    if parsed.is_empty() {
        return Err(TagError::NoTagsFound);
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::KeyRow;
    use crate::document::RunKind;
    use crate::highlight::Color;
    use crate::storage::MemoryStore;

    const EVENT: &str = "[event]\nname=foo (string, mandatory, official)\n[/event]";

    fn session() -> Session<MemoryStore> {
        Session::new(MemoryStore::new())
    }

    #[test]
    fn test_save_manual_guards() {
        let mut s = session();
        assert!(matches!(s.save_manual("   \n"), Err(TagError::EmptyInput)));
        assert!(matches!(s.save_manual("no tags here"), Err(TagError::NoTagsFound)));
        assert!(s.store.get().is_empty());
    }

    #[test]
    fn test_save_manual_then_conflict() {
        let mut s = session();
        let outcome = s.save_manual(EVENT).unwrap();
        assert_eq!(outcome, SaveOutcome::Saved(vec!["event".to_string()]));

        let input = format!("[unit]\nx=1 (integer, optional, umc)\n[/unit]\n{}", EVENT);
        let outcome = s.save_manual(&input).unwrap();
        assert_eq!(outcome, SaveOutcome::Conflict("event".to_string()));
        assert_eq!(s.pending.as_ref().map(|p| p.tag.as_str()), Some("event"));
        // Nothing from the conflicting batch was written
        assert!(!s.store.contains("unit"));

        assert_eq!(s.resolve_pending(SaveMode::Append).unwrap(), "event");
        assert!(s.pending.is_none());
        assert_eq!(s.store.get()["event"].len(), 2);
    }

    #[test]
    fn test_resolve_replace_and_cancel() {
        let mut s = session();
        s.save_manual(EVENT).unwrap();
        s.save_manual(EVENT).unwrap();
        s.resolve_pending(SaveMode::Replace).unwrap();
        assert_eq!(s.store.get()["event"].len(), 1);

        s.save_manual(EVENT).unwrap();
        s.cancel_pending();
        assert!(s.pending.is_none());
        assert!(s.resolve_pending(SaveMode::Append).is_err());
    }

    #[test]
    fn test_resolve_keeps_pending_on_write_failure() {
        let mut s = session();
        s.save_manual(EVENT).unwrap();
        s.save_manual(EVENT).unwrap();
        s.store.backend_mut().read_only = true;

        assert!(s.resolve_pending(SaveMode::Append).is_err());
        assert!(s.pending.is_some());
    }

    #[test]
    fn test_save_manual_with_mode() {
        let mut s = session();
        s.save_manual(EVENT).unwrap();

        let saved = s.save_manual_with(EVENT, SaveMode::Append).unwrap();
        assert_eq!(saved, vec!["event".to_string()]);
        assert_eq!(s.store.get()["event"].len(), 2);

        s.save_manual_with(EVENT, SaveMode::Replace).unwrap();
        assert_eq!(s.store.get()["event"].len(), 1);
        assert!(s.pending.is_none());

        assert!(matches!(
            s.save_manual_with("", SaveMode::Append),
            Err(TagError::EmptyInput)
        ));
    }

    #[test]
    fn test_save_form() {
        let mut s = session();
        let form = TagForm {
            tag_name: "side".to_string(),
            keys: vec![KeyRow::new("side", "1")],
            ..Default::default()
        };
        assert_eq!(
            s.save_form(&form).unwrap(),
            SaveOutcome::Saved(vec!["side".to_string()])
        );
        assert_eq!(
            s.save_form(&form).unwrap(),
            SaveOutcome::Conflict("side".to_string())
        );

        let empty = TagForm::default();
        assert!(matches!(s.save_form(&empty), Err(TagError::EmptyTagName)));
    }

    #[test]
    fn test_edit_form_and_replace() {
        let mut s = session();
        s.save_manual(EVENT).unwrap();

        let mut form = s.edit_form("event", 0).unwrap();
        assert_eq!(form.keys[0].name, "name");
        form.keys[0].default_value = "bar".to_string();

        assert_eq!(
            s.save_form(&form).unwrap(),
            SaveOutcome::Conflict("event".to_string())
        );
        s.resolve_pending(SaveMode::Replace).unwrap();

        let stored = s.store.definition("event", 0).unwrap();
        assert_eq!(stored.keys[0].default_value, "bar");
        assert_eq!(s.store.get()["event"].len(), 1);
        assert!(matches!(s.edit_form("event", 1), Err(TagError::NoSuchVersion { .. })));
    }

    #[test]
    fn test_insert_without_document() {
        let mut s = session();
        s.save_manual(EVENT).unwrap();
        assert!(matches!(s.insert("event", 0), Err(TagError::NoActiveDocument)));
        assert!(matches!(s.insert("nope", 0), Err(TagError::NoSuchTag(_))));
    }

    #[test]
    fn test_insert_uses_recorded_cursor() {
        let mut s = session();
        s.save_manual("[foo]\nx=1 (integer, mandatory, official)\n[/foo]").unwrap();
        s.open(Document::from_text("bar"));

        // Focus at the start, then lose focus: the recorded index is used
        if let Some(doc) = s.document.as_mut() {
            mapper::set_cursor(doc, 0);
        }
        s.focus();
        s.blur();
        assert_eq!(s.last_cursor, 0);

        let cursor = s.insert("foo", 0).unwrap();
        let doc = s.document.as_ref().unwrap();
        assert_eq!(doc.flat_text(), "[foo]\n\tx=1\n[/foo]\nbar");
        assert_eq!(cursor, 18);
        assert_eq!(s.last_cursor, 18);
        assert_eq!(s.line_numbers(), 1..=4);
    }

    #[test]
    fn test_insert_while_focused_follows_selection() {
        let mut s = session();
        s.save_manual("[foo]\nx=1 (integer, mandatory, official)\n[/foo]").unwrap();
        s.open(Document::from_text("ab"));
        s.focus();
        if let Some(doc) = s.document.as_mut() {
            mapper::set_cursor(doc, 1);
        }

        s.insert("foo", 0).unwrap();
        let doc = s.document.as_ref().unwrap();
        assert_eq!(doc.flat_text(), "a[foo]\n\tx=1\n[/foo]\nb");
    }

    #[test]
    fn test_style_settings_rehighlight() {
        let mut s = session();
        s.save_manual("[foo]\nx=1 (integer, mandatory, official)\n[/foo]").unwrap();
        s.open(Document::from_text("x=1"));

        let mut settings = StyleSettings::default();
        settings.colors.insert(crate::dictionary::KeyType::Integer, Color::rgb(0, 0, 255));
        s.apply_style_settings(&settings).unwrap();

        let kind = s.document.as_ref().unwrap().runs()[0].kind();
        match kind {
            RunKind::Key(style) => assert_eq!(style.color, Color::rgb(0, 0, 255)),
            other => panic!("expected key run, got {:?}", other),
        }

        assert_eq!(s.reset_style_settings().unwrap(), StyleSettings::default());
        let kind = s.document.as_ref().unwrap().runs()[0].kind();
        assert!(matches!(kind, RunKind::Key(style) if style.color == Color::BLACK));
    }

    #[test]
    fn test_indentation_round_trip() {
        let mut s = session();
        assert_eq!(s.indentation(), IndentSettings::default());
        s.set_indentation(&IndentSettings::spaces(2)).unwrap();
        assert_eq!(s.indentation(), IndentSettings::spaces(2));
    }

    #[test]
    fn test_close() {
        let mut s = session();
        s.open(Document::from_text("a\nb"));
        assert_eq!(s.line_count, 2);
        assert!(s.close().is_some());
        assert!(s.document.is_none());
        assert_eq!(s.line_numbers(), 1..=1);
    }
}
