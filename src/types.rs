//! Core types used throughout the project.

use std::fmt;

/// A location in the GUI source code a message was extracted from.
///
/// Catalogs record the file and line at which the string-extraction tool
/// saw the call, with the path written relative to the catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// Path of the originating source file, as written in the catalog.
    pub filename: String,
    /// 1-indexed line of the extracted string.
    pub line: u32,
}

impl SourceLocation {
    /// Creates a new source location.
    #[must_use]
    pub fn new(filename: impl Into<String>, line: u32) -> Self {
        Self { filename: filename.into(), line }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.filename, self.line)
    }
}
