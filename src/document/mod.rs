//! Live document model
//!
//! A document is an ordered sequence of typed text runs. Its flat text is
//! the concatenation of the runs; a logical index is a character offset
//! into that flat text. The selection is held as a run id plus offset and
//! becomes stale whenever the runs are rebuilt, so callers resolve it to a
//! logical index before any rewrite (see `mapper`).

pub mod mapper;
mod run;

pub use mapper::Position;
pub use run::{Run, RunId, RunKind};

/// Live selection anchor: a run and a character offset inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub run: RunId,
    pub offset: usize,
}

/// A document made of text runs
#[derive(Debug, Clone, Default)]
pub struct Document {
    runs: Vec<Run>,
    selection: Option<Anchor>,
    next_id: u64,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document holding `text` as one plain run
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        if !text.is_empty() {
            let run = doc.make_run(text.to_string(), RunKind::Plain);
            doc.runs.push(run);
        }
        doc
    }

    /// Runs in document order
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Concatenated text of all runs
    pub fn flat_text(&self) -> String {
        self.runs.iter().map(|r| r.text()).collect()
    }

    /// Length of the flat text in characters
    pub fn len(&self) -> usize {
        self.runs.iter().map(|r| r.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.is_empty())
    }

    /// Number of lines in the flat text (an empty document has one)
    pub fn line_count(&self) -> usize {
        self.runs
            .iter()
            .map(|r| r.text().matches('\n').count())
            .sum::<usize>()
            + 1
    }

    pub fn selection(&self) -> Option<Anchor> {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Option<Anchor>) {
        self.selection = selection;
    }

    /// Position of a run by id
    pub fn run_position(&self, id: RunId) -> Option<usize> {
        self.runs.iter().position(|r| r.id() == id)
    }

    /// Place `text` as a run of its own at `position`.
    ///
    /// A run that contains the position is split in two and the new run
    /// goes between the halves. Returns the id of the new run.
    pub fn splice(&mut self, position: Position, text: String, kind: RunKind) -> RunId {
        let run = self.make_run(text, kind);
        let id = run.id();

        match position {
            Position::End => self.runs.push(run),
            Position::InRun { run: idx, offset } if idx < self.runs.len() => {
                let len = self.runs[idx].len();
                if offset == 0 {
                    self.runs.insert(idx, run);
                } else if offset >= len {
                    self.runs.insert(idx + 1, run);
                } else {
                    let rest = self.runs[idx].split_off(offset);
                    let rest_kind = self.runs[idx].kind();
                    let tail = self.make_run(rest, rest_kind);
                    self.runs.insert(idx + 1, run);
                    self.runs.insert(idx + 2, tail);
                }
            }
            Position::InRun { .. } => self.runs.push(run),
        }

        id
    }

    /// Discard every run and rebuild from `segments`.
    ///
    /// All previous run ids are invalidated; the selection is left as is
    /// and will no longer resolve.
    pub fn replace_runs(&mut self, segments: Vec<(String, RunKind)>) {
        let mut runs = Vec::with_capacity(segments.len());
        for (text, kind) in segments {
            if !text.is_empty() {
                runs.push(self.make_run(text, kind));
            }
        }
        self.runs = runs;
    }

    fn make_run(&mut self, text: String, kind: RunKind) -> Run {
        let id = RunId(self.next_id);
        self.next_id += 1;
        Run::new(id, text, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text() {
        let doc = Document::from_text("bar");
        assert_eq!(doc.runs().len(), 1);
        assert_eq!(doc.flat_text(), "bar");
        assert_eq!(doc.len(), 3);

        let empty = Document::from_text("");
        assert!(empty.runs().is_empty());
        assert!(empty.is_empty());
        assert_eq!(empty.line_count(), 1);
    }

    #[test]
    fn test_splice_mid_run_splits() {
        let mut doc = Document::from_text("abcd");
        let id = doc.splice(
            Position::InRun { run: 0, offset: 2 },
            "XY".to_string(),
            RunKind::Template,
        );

        let texts: Vec<&str> = doc.runs().iter().map(|r| r.text()).collect();
        assert_eq!(texts, vec!["ab", "XY", "cd"]);
        assert_eq!(doc.runs()[1].id(), id);
        assert_eq!(doc.runs()[1].kind(), RunKind::Template);
        assert_eq!(doc.runs()[2].kind(), RunKind::Plain);
    }

    #[test]
    fn test_splice_at_edges() {
        let mut doc = Document::from_text("ab");
        doc.splice(Position::InRun { run: 0, offset: 0 }, "<".to_string(), RunKind::Plain);
        doc.splice(Position::InRun { run: 1, offset: 2 }, ">".to_string(), RunKind::Plain);
        doc.splice(Position::End, "!".to_string(), RunKind::Plain);

        let texts: Vec<&str> = doc.runs().iter().map(|r| r.text()).collect();
        assert_eq!(texts, vec!["<", "ab", ">", "!"]);
    }

    #[test]
    fn test_replace_runs_invalidates_ids() {
        let mut doc = Document::from_text("abc");
        let old = doc.runs()[0].id();
        doc.replace_runs(vec![
            ("a".to_string(), RunKind::Plain),
            (String::new(), RunKind::Plain),
            ("bc".to_string(), RunKind::TagBracket),
        ]);

        assert_eq!(doc.runs().len(), 2);
        assert_eq!(doc.flat_text(), "abc");
        assert_eq!(doc.run_position(old), None);
    }

    #[test]
    fn test_line_count() {
        let doc = Document::from_text("a\nb\n");
        assert_eq!(doc.line_count(), 3);
    }
}
