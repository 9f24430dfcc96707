//! Template rendering
//!
//! Turns stored definitions into indentation-correct markup.

mod formatter;
mod indent;

pub use formatter::{format, format_annotated, template};
pub use indent::{reindent, IndentMethod, IndentSettings};
