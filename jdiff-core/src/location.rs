//! Source positions and spans.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CompareError, Result};

/// A 1-based (line, column) position in one source file.
///
/// Ordered by line, then column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// The first position of a file.
    pub const fn start_of_file() -> Self {
        Self { line: 1, column: 1 }
    }

    /// Location of the last character of `text` when it begins at `self`.
    ///
    /// Only meaningful for single-line text.
    pub fn end_of_text(self, text: &str) -> Self {
        let len = text.len() as u32;
        Self {
            line: self.line,
            column: (self.column + len).saturating_sub(1).max(1),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span between two locations of the same file, both inclusive.
///
/// `start == end` is either a zero-width insertion point or a span over a
/// single character (a one-letter name, a `{`). The range alone cannot tell
/// the two apart; the [`DiffKind`](crate::differ::DiffKind) of the difference
/// holding it does: the absent side of an Add or Delete is the insertion
/// point.
///
/// Deserialization goes through [`LocationRange::new`], so a reversed range
/// is rejected there too.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct LocationRange {
    start: Location,
    end: Location,
}

#[derive(Deserialize)]
struct RawRange {
    start: Location,
    end: Location,
}

impl TryFrom<RawRange> for LocationRange {
    type Error = CompareError;

    fn try_from(raw: RawRange) -> Result<Self> {
        LocationRange::new(raw.start, raw.end)
    }
}

impl LocationRange {
    /// Create a range, rejecting `start > end`.
    pub fn new(start: Location, end: Location) -> Result<Self> {
        if start > end {
            return Err(CompareError::InvariantViolation(format!(
                "location range starts at {} after its end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Zero-width range marking an insertion point.
    pub const fn point(at: Location) -> Self {
        Self { start: at, end: at }
    }

    /// Range covering `text` starting at `start`; single-line text only.
    pub fn of_text(start: Location, text: &str) -> Self {
        Self {
            start,
            end: start.end_of_text(text),
        }
    }

    pub fn start(&self) -> Location {
        self.start
    }

    pub fn end(&self) -> Location {
        self.end
    }

    /// True for an insertion point, and also for a one-character span.
    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    /// Smallest range covering both `self` and `other`.
    pub fn cover(&self, other: &LocationRange) -> LocationRange {
        LocationRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Number of lines touched by this range.
    pub fn line_count(&self) -> u32 {
        self.end.line - self.start.line + 1
    }
}

impl fmt::Display for LocationRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.start, self.end)
    }
}
