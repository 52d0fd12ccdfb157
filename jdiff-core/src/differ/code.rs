//! Token-level comparison of code bodies.

use similar::{capture_diff_slices, Algorithm, DiffOp};

use super::changes::{DiffKind, Difference};
use super::messages;
use crate::location::{Location, LocationRange};
use crate::types::Token;

/// Compare two token streams of the declaration `name`.
///
/// `from_end`/`to_end` locate insertion points when a side has no tokens.
/// Differences starting on the same from-side line as the previous one are
/// merged into a single change.
pub fn compare_code(
    name: &str,
    from: &[Token],
    to: &[Token],
    from_end: Location,
    to_end: Location,
) -> Vec<Difference> {
    let old: Vec<(&str, &str)> = from.iter().map(|t| (t.kind.as_str(), t.text.as_str())).collect();
    let new: Vec<(&str, &str)> = to.iter().map(|t| (t.kind.as_str(), t.text.as_str())).collect();

    let mut diffs: Vec<Difference> = Vec::new();
    for op in capture_diff_slices(Algorithm::Myers, &old, &new) {
        let (kind, first, second) = match op {
            DiffOp::Equal { .. } => continue,
            DiffOp::Delete {
                old_index,
                old_len,
                new_index,
            } => (
                DiffKind::Delete,
                span(from, old_index, old_len),
                insertion_point(to, new_index, to_end),
            ),
            DiffOp::Insert {
                old_index,
                new_index,
                new_len,
            } => (
                DiffKind::Add,
                insertion_point(from, old_index, from_end),
                span(to, new_index, new_len),
            ),
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => (
                DiffKind::Change,
                span(from, old_index, old_len),
                span(to, new_index, new_len),
            ),
        };

        if let Some(prev) = diffs.last_mut() {
            if prev.first.start().line == first.start().line {
                prev.kind = DiffKind::Change;
                prev.message = messages::format(messages::CODE_CHANGED, &[name]);
                prev.first = prev.first.cover(&first);
                prev.second = prev.second.cover(&second);
                continue;
            }
        }

        let template = match kind {
            DiffKind::Add => messages::CODE_ADDED,
            DiffKind::Delete => messages::CODE_REMOVED,
            DiffKind::Change => messages::CODE_CHANGED,
        };
        diffs.push(Difference::new(
            kind,
            messages::format(template, &[name]),
            first,
            second,
        ));
    }
    diffs
}

/// Range covering `tokens[index..index + len]`.
fn span(tokens: &[Token], index: usize, len: usize) -> LocationRange {
    let first = &tokens[index];
    let last = &tokens[index + len - 1];
    first.range.cover(&last.range)
}

/// Zero-width point before `tokens[index]`, or after the last token.
fn insertion_point(tokens: &[Token], index: usize, fallback: Location) -> LocationRange {
    let at = match tokens.get(index) {
        Some(token) => token.range.start(),
        None => tokens.last().map(|t| t.range.end()).unwrap_or(fallback),
    };
    LocationRange::point(at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    fn body(source: &str) -> Vec<Token> {
        let mut unit = parse_source(source, "T.java").unwrap();
        unit.children.remove(0).children.remove(0).body
    }

    fn diff(from: &str, to: &str) -> Vec<Difference> {
        let (a, b) = (body(from), body(to));
        compare_code("f()", &a, &b, Location::new(1, 1), Location::new(1, 1))
    }

    #[test]
    fn test_same_code_ignores_whitespace_and_comments() {
        let diffs = diff(
            "class T { void f() { int i = 0; } }",
            "class T {\n  void f() {\n    // counter\n    int   i =  0;\n  }\n}",
        );
        assert!(diffs.is_empty());
    }

    #[test]
    fn test_code_added() {
        let diffs = diff(
            "class T {\n void f() {\n  a();\n }\n}",
            "class T {\n void f() {\n  a();\n  b();\n }\n}",
        );
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DiffKind::Add);
        assert_eq!(diffs[0].message, "code added in f()");
        assert!(diffs[0].first.is_point());
        assert_eq!(diffs[0].second.end().line, 4);
    }

    #[test]
    fn test_code_removed() {
        let diffs = diff(
            "class T {\n void f() {\n  a();\n  b();\n }\n}",
            "class T {\n void f() {\n  a();\n }\n}",
        );
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DiffKind::Delete);
        assert_eq!(diffs[0].message, "code removed in f()");
        assert!(diffs[0].second.is_point());
        assert_eq!(diffs[0].first.end().line, 4);
    }

    #[test]
    fn test_same_line_runs_merge_into_change() {
        let diffs = diff(
            "class T { void f() { int i = 0; } }",
            "class T { void f() { long i = 1; } }",
        );
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DiffKind::Change);
        assert_eq!(diffs[0].message, "code changed in f()");
        assert_eq!(diffs[0].first.start(), Location::new(1, 22));
        assert_eq!(diffs[0].first.end(), Location::new(1, 30));
    }

    #[test]
    fn test_empty_side_uses_fallback() {
        let to = body("class T { void f() { x(); } }");
        let diffs = compare_code("f()", &[], &to, Location::new(7, 3), Location::new(1, 1));
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DiffKind::Add);
        assert_eq!(diffs[0].first, LocationRange::point(Location::new(7, 3)));
    }
}
