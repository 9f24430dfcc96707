//! Error types for wmltag

use thiserror::Error;

/// Result type alias for wmltag operations
pub type Result<T> = std::result::Result<T, TagError>;

/// Tag dictionary and insertion errors
#[derive(Error, Debug)]
pub enum TagError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not write '{key}': {reason}")]
    Persistence { key: String, reason: String },

    #[error("Tag name cannot be empty")]
    EmptyTagName,

    #[error("Enter some tag definitions first")]
    EmptyInput,

    #[error("No tags found")]
    NoTagsFound,

    #[error("No such tag: {0}")]
    NoSuchTag(String),

    #[error("Tag '{tag}' has no version {index}")]
    NoSuchVersion { tag: String, index: usize },

    #[error("No active document")]
    NoActiveDocument,

    #[error("Malformed definition: {0}")]
    MalformedDefinition(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Message(String),
}
