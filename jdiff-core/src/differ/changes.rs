//! Difference records and result structures.

use serde::{Deserialize, Serialize};

use super::messages;
use crate::location::LocationRange;

/// Kind of a reported difference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiffKind {
    Add,
    Delete,
    Change,
}

impl DiffKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffKind::Add => "add",
            DiffKind::Delete => "delete",
            DiffKind::Change => "change",
        }
    }

    /// Single-letter code used by the brief and no-context writers.
    pub fn code(&self) -> char {
        match self {
            DiffKind::Add => 'a',
            DiffKind::Delete => 'd',
            DiffKind::Change => 'c',
        }
    }

    /// The kind seen from the other side.
    pub fn reversed(&self) -> DiffKind {
        match self {
            DiffKind::Add => DiffKind::Delete,
            DiffKind::Delete => DiffKind::Add,
            DiffKind::Change => DiffKind::Change,
        }
    }
}

/// One reported discrepancy between the from and to sources.
///
/// `first` is always a from-side range and `second` a to-side range. For
/// `Add` the first range is a zero-width insertion point, for `Delete` the
/// second is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difference {
    pub kind: DiffKind,
    pub message: String,
    pub first: LocationRange,
    pub second: LocationRange,
}

impl Difference {
    pub fn new(
        kind: DiffKind,
        message: impl Into<String>,
        first: LocationRange,
        second: LocationRange,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            first,
            second,
        }
    }

    pub fn added(message: impl Into<String>, first: LocationRange, second: LocationRange) -> Self {
        Self::new(DiffKind::Add, message, first, second)
    }

    pub fn deleted(message: impl Into<String>, first: LocationRange, second: LocationRange) -> Self {
        Self::new(DiffKind::Delete, message, first, second)
    }

    pub fn changed(message: impl Into<String>, first: LocationRange, second: LocationRange) -> Self {
        Self::new(DiffKind::Change, message, first, second)
    }
}

/// Ordered, append-only collection of differences for one comparison.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    differences: Vec<Difference>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, difference: Difference) {
        self.differences.push(difference);
    }

    /// Append a Change whose message is `template` filled with `args`.
    pub fn changed(&mut self, first: LocationRange, second: LocationRange, template: &str, args: &[&str]) {
        self.append(Difference::changed(messages::format(template, args), first, second));
    }

    pub fn all(&self) -> &[Difference] {
        &self.differences
    }

    pub fn count(&self) -> usize {
        self.differences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Difference> {
        self.differences.iter()
    }
}

impl Extend<Difference> for Report {
    fn extend<I: IntoIterator<Item = Difference>>(&mut self, iter: I) {
        self.differences.extend(iter);
    }
}

impl FromIterator<Difference> for Report {
    fn from_iter<I: IntoIterator<Item = Difference>>(iter: I) -> Self {
        Self {
            differences: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Report {
    type Item = Difference;
    type IntoIter = std::vec::IntoIter<Difference>;

    fn into_iter(self) -> Self::IntoIter {
        self.differences.into_iter()
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a Difference;
    type IntoIter = std::slice::Iter<'a, Difference>;

    fn into_iter(self) -> Self::IntoIter {
        self.differences.iter()
    }
}

/// Outcome of comparing one file pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Compared { differences: Report },
    /// The pair could not be compared (unreadable or unparsable file).
    Failed { error: String },
}

/// Result of comparing one file pair, with the sources kept for writers that
/// print context lines.
#[derive(Clone, Debug, Serialize)]
pub struct FileComparison {
    pub from_path: String,
    pub to_path: String,
    #[serde(skip)]
    pub from_source: String,
    #[serde(skip)]
    pub to_source: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

impl FileComparison {
    pub fn compared(
        from_path: impl Into<String>,
        to_path: impl Into<String>,
        from_source: String,
        to_source: String,
        report: Report,
    ) -> Self {
        Self {
            from_path: from_path.into(),
            to_path: to_path.into(),
            from_source,
            to_source,
            outcome: FileOutcome::Compared {
                differences: report,
            },
        }
    }

    pub fn failed(
        from_path: impl Into<String>,
        to_path: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            from_path: from_path.into(),
            to_path: to_path.into(),
            from_source: String::new(),
            to_source: String::new(),
            outcome: FileOutcome::Failed {
                error: error.into(),
            },
        }
    }

    /// The report, when the pair was compared.
    pub fn report(&self) -> Option<&Report> {
        match &self.outcome {
            FileOutcome::Compared { differences } => Some(differences),
            FileOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            FileOutcome::Compared { .. } => None,
            FileOutcome::Failed { error } => Some(error),
        }
    }

    pub fn has_differences(&self) -> bool {
        self.report().is_some_and(|r| !r.is_empty())
    }
}

/// Results of comparing a set of file pairs, in traversal order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DirectoryComparison {
    pub files: Vec<FileComparison>,
    /// Set when a cancellation request stopped the run early.
    pub cancelled: bool,
}

impl DirectoryComparison {
    /// All differences concatenated in traversal order.
    pub fn merged(&self) -> Report {
        self.files
            .iter()
            .filter_map(FileComparison::report)
            .flat_map(|r| r.iter().cloned())
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileComparison> {
        self.files.iter().filter(|f| f.error().is_some())
    }

    pub fn difference_count(&self) -> usize {
        self.files
            .iter()
            .filter_map(FileComparison::report)
            .map(Report::count)
            .sum()
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}
