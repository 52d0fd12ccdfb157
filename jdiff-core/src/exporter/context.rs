//! Context writer: affected lines with surrounding unchanged lines.
//!
//! Changed lines are prefixed `! `, deleted `- `, added `+ ` and context
//! lines two spaces. With highlighting the exact column span is coloured.

use colored::{Color, Colorize};

use super::{line_numbers, summary_line, ExportConfig, SourceLines};
use crate::differ::{DiffKind, Difference};
use crate::location::LocationRange;

pub fn write_difference(out: &mut String, diff: &Difference, lines: &SourceLines, config: &ExportConfig) {
    out.push_str(&summary_line(diff));
    out.push('\n');

    let side = |prefix, color| Side {
        prefix,
        color: config.highlight.then_some(color),
        context: config.context_lines,
    };
    match diff.kind {
        DiffKind::Add => side("+ ", Color::Green).write(out, &lines.to, &diff.second),
        DiffKind::Delete => side("- ", Color::Red).write(out, &lines.from, &diff.first),
        DiffKind::Change => {
            side("! ", Color::Red).write(out, &lines.from, &diff.first);
            out.push_str("---\n");
            side("! ", Color::Yellow).write(out, &lines.to, &diff.second);
        }
    }
    out.push('\n');
}

/// How one side of a difference is printed.
struct Side {
    prefix: &'static str,
    color: Option<Color>,
    context: usize,
}

impl Side {
    fn write(&self, out: &mut String, lines: &[&str], range: &LocationRange) {
        let marked = line_numbers(range, lines);
        let (first, last) = (*marked.start(), *marked.end());
        let before = first.saturating_sub(self.context).max(1);
        let after = (last + self.context).min(lines.len());

        for n in before..first {
            push_line(out, "  ", lines[n - 1]);
        }
        for n in marked {
            match self.color {
                Some(color) => {
                    let text = highlight(lines[n - 1], n, range, color);
                    push_line(out, self.prefix, &text);
                }
                None => push_line(out, self.prefix, lines[n - 1]),
            }
        }
        for n in (last + 1)..=after {
            push_line(out, "  ", lines[n - 1]);
        }
    }
}

fn push_line(out: &mut String, prefix: &str, text: &str) {
    out.push_str(prefix);
    out.push_str(text);
    out.push('\n');
}

/// Colour the part of line `n` covered by `range`.
fn highlight(line: &str, n: usize, range: &LocationRange, color: Color) -> String {
    let (start, end) = (range.start(), range.end());
    let from = if n == start.line as usize {
        start.column as usize - 1
    } else {
        0
    };
    let to = if n == end.line as usize {
        (end.column as usize).min(line.len())
    } else {
        line.len()
    };

    match (line.get(..from), line.get(from..to), line.get(to..)) {
        (Some(head), Some(mid), Some(tail)) if from < to => {
            format!("{}{}{}", head, mid.color(color), tail)
        }
        _ => line.color(color).to_string(),
    }
}
