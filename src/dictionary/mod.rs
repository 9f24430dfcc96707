//! Tag dictionary
//!
//! Versioned tag definitions, the built-in library, and the two ways
//! definitions are authored: free-text manual entry and the tag form.

mod form;
mod model;
pub mod parser;
pub mod seed;
mod store;

use indexmap::IndexMap;

pub use form::{KeyRow, TagForm};
pub use model::{Definition, Key, KeyType, Mandatory, Scope};
pub use parser::ParsedTag;
pub use store::{DefinitionStore, SaveMode, TagLabel};

/// Tag name to its versions, in insertion order
pub type Dictionary = IndexMap<String, Vec<Definition>>;
