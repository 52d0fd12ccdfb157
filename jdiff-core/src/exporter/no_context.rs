//! No-context writer: the summary line followed by the affected lines.

use super::{line_numbers, summary_line, SourceLines};
use crate::differ::{DiffKind, Difference};
use crate::location::LocationRange;

pub fn write_difference(out: &mut String, diff: &Difference, lines: &SourceLines) {
    out.push_str(&summary_line(diff));
    out.push('\n');

    match diff.kind {
        DiffKind::Add => write_lines(out, "> ", &lines.to, &diff.second),
        DiffKind::Delete => write_lines(out, "< ", &lines.from, &diff.first),
        DiffKind::Change => {
            write_lines(out, "< ", &lines.from, &diff.first);
            out.push_str("---\n");
            write_lines(out, "> ", &lines.to, &diff.second);
        }
    }
    out.push('\n');
}

fn write_lines(out: &mut String, prefix: &str, lines: &[&str], range: &LocationRange) {
    for n in line_numbers(range, lines) {
        out.push_str(prefix);
        out.push_str(lines[n - 1]);
        out.push('\n');
    }
}
