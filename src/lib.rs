//! wmltag - tag dictionary and template insertion for WML-style markup
//!
//! Tags are defined once, with typed and scoped keys, and stored as
//! versioned definitions. A definition is rendered into an indented
//! template, inserted into a document at a logical cursor index and
//! highlighted by key type.

pub mod config;
pub mod dictionary;
pub mod display;
pub mod document;
pub mod error;
pub mod highlight;
pub mod insert;
pub mod logging;
pub mod session;
pub mod storage;
pub mod template;

pub use error::{Result, TagError};
