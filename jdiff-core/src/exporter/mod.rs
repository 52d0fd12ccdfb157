//! Writers for comparison results.
//!
//! Text writers print a `from <=> to` header for every file pair with
//! differences, then one block per difference:
//!
//! - [`brief`]: the summary line only, e.g. `6c5: code changed in f()`
//! - [`no_context`]: the summary line followed by the affected lines
//! - [`context`]: the affected lines with surrounding context, optionally
//!   highlighting the exact span that differs
//!
//! [`json`] serializes the results as they are.

pub mod brief;
pub mod context;
pub mod json;
pub mod no_context;

use serde::{Deserialize, Serialize};

use crate::differ::{Difference, DirectoryComparison, FileComparison};
use crate::location::LocationRange;

/// Layout of text output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputStyle {
    Brief,
    #[default]
    NoContext,
    Context,
}

/// Export configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportConfig {
    pub style: OutputStyle,
    /// Colour the differing span (context style only).
    pub highlight: bool,
    /// Unchanged lines shown around a difference (context style only).
    pub context_lines: usize,
    pub pretty_print: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            style: OutputStyle::NoContext,
            highlight: false,
            context_lines: 2,
            pretty_print: true,
        }
    }
}

/// Source lines of both sides of a file pair.
pub struct SourceLines<'a> {
    pub from: Vec<&'a str>,
    pub to: Vec<&'a str>,
}

impl<'a> SourceLines<'a> {
    pub fn new(from: &'a str, to: &'a str) -> Self {
        Self {
            from: from.lines().collect(),
            to: to.lines().collect(),
        }
    }
}

/// Export every compared file pair with differences as text.
pub fn export_text(result: &DirectoryComparison, config: &ExportConfig) -> String {
    result
        .files
        .iter()
        .map(|file| export_file(file, config))
        .collect()
}

/// Export one file pair as text; empty when there is nothing to report.
pub fn export_file(file: &FileComparison, config: &ExportConfig) -> String {
    let Some(report) = file.report().filter(|r| !r.is_empty()) else {
        return String::new();
    };

    let lines = SourceLines::new(&file.from_source, &file.to_source);
    let mut out = format!("{} <=> {}\n", file.from_path, file.to_path);
    for diff in report {
        match config.style {
            OutputStyle::Brief => brief::write_difference(&mut out, diff),
            OutputStyle::NoContext => no_context::write_difference(&mut out, diff, &lines),
            OutputStyle::Context => context::write_difference(&mut out, diff, &lines, config),
        }
    }
    out
}

/// `6` for a single line, `6,8` for a line span.
pub(crate) fn line_spec(range: &LocationRange) -> String {
    let (start, end) = (range.start().line, range.end().line);
    if start == end {
        start.to_string()
    } else {
        format!("{},{}", start, end)
    }
}

/// Summary line shared by all text writers.
pub(crate) fn summary_line(diff: &Difference) -> String {
    format!(
        "{}{}{}: {}",
        line_spec(&diff.first),
        diff.kind.code(),
        line_spec(&diff.second),
        diff.message
    )
}

/// 1-based inclusive line numbers of `range`, clipped to `lines`.
pub(crate) fn line_numbers(range: &LocationRange, lines: &[&str]) -> std::ops::RangeInclusive<usize> {
    let start = range.start().line as usize;
    let end = (range.end().line as usize).min(lines.len());
    start..=end
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::location::{Location, LocationRange};

    pub const FROM: &str = "\
And pleasant was his absolution.
He was an easy man to give penance,
There as he wist to have a good pittance:
For unto a poor order for to give
Is signe that a man is well y-shrive.
For if he gave, he durste make avant,
He wiste that the man was repentant.
";

    pub const TO: &str = "\
And pleasant was his absolution.
Where he know he would get good payment
For unto a poor order for to give
Is signe that a man is well y-shrive.
For if he gave, he dared to boast,
He knew that the man was repentant.
For many a man so hard is of his heart,
He may not weep although him sore smart.
";

    pub fn rg(l1: u32, c1: u32, l2: u32, c2: u32) -> LocationRange {
        LocationRange::new(Location::new(l1, c1), Location::new(l2, c2)).unwrap()
    }
}
