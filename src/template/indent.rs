//! Indentation settings and the re-indent pass

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::storage::{BlobStore, INDENT_KEY};

/// Indent with tabs or with spaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentMethod {
    Tab,
    Space,
}

/// Indentation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndentSettings {
    pub method: IndentMethod,
    /// Spaces per level when indenting with spaces
    pub space_size: usize,
    /// Tabs per level when indenting with tabs
    pub tab_count: usize,
}

impl Default for IndentSettings {
    fn default() -> Self {
        Self {
            method: IndentMethod::Tab,
            space_size: 4,
            tab_count: 1,
        }
    }
}

impl IndentSettings {
    /// Indent with `size` spaces per level
    pub fn spaces(size: usize) -> Self {
        Self {
            method: IndentMethod::Space,
            space_size: size,
            ..Default::default()
        }
    }

    /// Indent with `count` tabs per level
    pub fn tabs(count: usize) -> Self {
        Self {
            method: IndentMethod::Tab,
            tab_count: count,
            ..Default::default()
        }
    }

    /// Load saved settings, falling back to defaults
    pub fn load(store: &dyn BlobStore) -> Self {
        match store.read(INDENT_KEY) {
            Ok(Some(text)) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!("Ignoring unreadable indentation settings: {}", e);
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("Could not read indentation settings: {}", e);
                Self::default()
            }
        }
    }

    /// Replace the saved settings
    pub fn save(&self, store: &mut dyn BlobStore) -> Result<()> {
        let text = serde_json::to_string(self)?;
        store.write(INDENT_KEY, &text)
    }

    /// Forget the saved settings and return the defaults
    pub fn reset(store: &mut dyn BlobStore) -> Result<Self> {
        store.remove(INDENT_KEY)?;
        Ok(Self::default())
    }

    /// Whitespace for `level` levels of nesting
    pub fn unit(&self, level: usize) -> String {
        match self.method {
            IndentMethod::Space => " ".repeat(self.space_size * level),
            IndentMethod::Tab => "\t".repeat(self.tab_count * level),
        }
    }
}

/// Re-indent tag markup by nesting depth.
///
/// Every line is trimmed and re-prefixed. Depth drops before a line that
/// starts with `[/` and rises after any other line that starts with `[`.
/// Blank lines stay blank. Applying the pass to its own output changes
/// nothing.
pub fn reindent(content: &str, settings: &IndentSettings) -> String {
    let mut depth: usize = 0;
    let mut lines = Vec::new();

    for line in content.split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            lines.push(String::new());
            continue;
        }

        let closing = trimmed.starts_with("[/");
        if closing {
            depth = depth.saturating_sub(1);
        }

        lines.push(format!("{}{}", settings.unit(depth), trimmed));

        if trimmed.starts_with('[') && !closing {
            depth += 1;
        }
    }

    lines.join("\n")
}
