//! Type-aware key highlighting
//!
//! Keys found in the dictionary are styled by type (color), mandatory
//! level (bold) and scope (italic).

mod engine;
mod settings;
mod style;

pub use engine::{highlight, markup, Highlighter};
pub use settings::StyleSettings;
pub use style::{Color, Style};
