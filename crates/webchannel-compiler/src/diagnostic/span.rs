//! Declaration locations.

use std::fmt;
use std::path::{Path, PathBuf};

use tree_sitter::Point;

/// Where a class or member is declared. Lines and columns are 1-based,
/// matching `file:line:col` links in editors and terminals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    /// Last line of the declaration, inclusive.
    pub end_line: usize,
}

impl Span {
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            end_line: line,
        }
    }

    /// From the zero-based positions tree-sitter reports.
    pub fn from_points(file: &Path, start: Point, end: Point) -> Self {
        Self {
            file: file.to_path_buf(),
            line: start.row + 1,
            column: start.column + 1,
            end_line: end.row.max(start.row) + 1,
        }
    }

    /// Number of source lines the declaration covers.
    pub fn line_count(&self) -> usize {
        self.end_line - self.line + 1
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_become_editor_positions() {
        let span = Span::from_points(
            Path::new("controllers/TodoController.py"),
            Point { row: 9, column: 0 },
            Point { row: 14, column: 12 },
        );
        assert_eq!(span.to_string(), "controllers/TodoController.py:10:1");
        assert_eq!(span.line_count(), 6);
        assert_eq!(Span::new("a.py", 3, 5).line_count(), 1);
    }
}
