//! Logical index <-> run position mapping
//!
//! A logical index is a character offset into the flat text. Ties at a
//! run boundary resolve to the end of the earlier run; the inverse maps
//! both sides of a boundary to the same index, so `current_index` after
//! `set_cursor(i)` is always `i` for `0 <= i <= len`.

use tracing::debug;

use super::{Anchor, Document};

/// Where a logical index falls in the run sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Inside run number `run` (by position, not id) at a character offset
    InRun { run: usize, offset: usize },
    /// Past the last character: append
    End,
}

/// Find the run holding `index`.
///
/// The first run whose cumulative end is at least `index` is chosen. An
/// index beyond the text, or any index in an empty document, maps to
/// `Position::End`.
pub fn locate(doc: &Document, index: usize) -> Position {
    let mut start = 0;
    for (i, run) in doc.runs().iter().enumerate() {
        let end = start + run.len();
        if end >= index {
            return Position::InRun {
                run: i,
                offset: index - start,
            };
        }
        start = end;
    }
    Position::End
}

/// Logical index of a selection anchor.
///
/// A missing anchor, or one whose run no longer exists, counts as the end
/// of the document.
pub fn current_index(doc: &Document, anchor: Option<Anchor>) -> usize {
    let Some(anchor) = anchor else {
        return doc.len();
    };

    let mut start = 0;
    for run in doc.runs() {
        if run.id() == anchor.run {
            return start + anchor.offset.min(run.len());
        }
        start += run.len();
    }

    debug!("Selection anchor not in document, using end");
    start
}

/// Anchor for a logical index, clamped to the document
pub fn anchor_at(doc: &Document, index: usize) -> Option<Anchor> {
    match locate(doc, index) {
        Position::InRun { run, offset } => doc.runs().get(run).map(|r| Anchor {
            run: r.id(),
            offset,
        }),
        Position::End => doc.runs().last().map(|r| Anchor {
            run: r.id(),
            offset: r.len(),
        }),
    }
}

/// Logical index of the document's live selection
pub fn cursor_index(doc: &Document) -> usize {
    current_index(doc, doc.selection())
}

/// Move the live selection to a logical index
pub fn set_cursor(doc: &mut Document, index: usize) {
    let anchor = anchor_at(doc, index);
    doc.set_selection(anchor);
}
