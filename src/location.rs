//! Source positions of hook and step declarations.

use std::fmt;
use std::panic::Location;

/// Where a hook or step was declared. Used for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Source file of the declaration.
    pub file: &'static str,
    /// One-based line.
    pub line: u32,
    /// One-based column.
    pub column: u32,
}

impl SourceLocation {
    /// Capture the location of the code calling into the declaring function.
    ///
    /// Every function between the author's code and this call must carry
    /// `#[track_caller]` for the position to point at the declaration.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        Location::caller().into()
    }
}

impl From<&Location<'static>> for SourceLocation {
    fn from(location: &Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
