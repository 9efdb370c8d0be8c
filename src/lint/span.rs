//! Source location spans.
//!
//! This module provides the range type attached to every parsed HCL
//! construct and every diagnostic, enabling precise error reporting.

use std::fmt;
use std::path::PathBuf;

/// A source location span representing a range in a file.
///
/// Lines and columns are 1-indexed; `end_col` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    /// File path.
    pub file: PathBuf,
    /// Starting line (1-indexed).
    pub start_line: usize,
    /// Starting column (1-indexed).
    pub start_col: usize,
    /// Ending line (1-indexed).
    pub end_line: usize,
    /// Ending column (1-indexed, exclusive).
    pub end_col: usize,
}

impl Span {
    /// Create a span covering a single line.
    pub fn line(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: file.into(),
            start_line: line,
            start_col: 1,
            end_line: line,
            end_col: usize::MAX,
        }
    }

    /// Create a zero-width span at a position.
    pub fn point(file: impl Into<PathBuf>, line: usize, col: usize) -> Self {
        Self::new(file, line, col, line, col)
    }

    /// Create a span with precise positions.
    pub fn new(
        file: impl Into<PathBuf>,
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
    ) -> Self {
        Self {
            file: file.into(),
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Span from the start of `self` to the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            file: self.file.clone(),
            start_line: self.start_line,
            start_col: self.start_col,
            end_line: other.end_line,
            end_col: other.end_col,
        }
    }

    /// Whether `other` lies within this span (same file, inclusive bounds).
    pub fn contains(&self, other: &Span) -> bool {
        self.file == other.file
            && (self.start_line, self.start_col) <= (other.start_line, other.start_col)
            && (other.end_line, other.end_col) <= (self.end_line, self.end_col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file.display(),
            self.start_line,
            self.start_col
        )
    }
}
