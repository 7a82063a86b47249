//! Output configuration.

/// Spaces per indentation level.
pub const INDENT_WIDTH: usize = 2;

/// File extension of generated sources.
pub const SOURCE_EXTENSION: &str = "java";

/// Configuration for source generation.
///
/// Flows from the unit builder into every class and method buffer, so all
/// artifacts of a unit share one layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Indentation size in spaces.
    pub indent_width: usize,
    /// Whether each artifact starts with a `// Generated from ...` comment.
    pub provenance: bool,
    /// Extension appended to artifact paths, without the dot.
    pub extension: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            indent_width: INDENT_WIDTH,
            provenance: true,
            extension: SOURCE_EXTENSION.to_string(),
        }
    }
}

impl SourceConfig {
    /// Create a config with the specified indentation size.
    pub fn with_indent_width(indent_width: usize) -> Self {
        Self {
            indent_width,
            ..Default::default()
        }
    }

    /// Same config without provenance comments.
    #[must_use]
    pub fn without_provenance(mut self) -> Self {
        self.provenance = false;
        self
    }

    /// Same config with a different file extension.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}
