//! Helper functions for tree-sitter AST navigation.

use tree_sitter::Node;

use crate::location::{Location, LocationRange};
use crate::types::Token;

/// Node kinds that never take part in comparison.
const COMMENT_KINDS: &[&str] = &["line_comment", "block_comment"];

/// Get the text content of a node.
pub fn get_node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    let start = node.start_byte();
    let end = node.end_byte();
    if start < source.len() && end <= source.len() && start < end {
        &source[start..end]
    } else {
        ""
    }
}

/// Find the first child of a specific type.
#[allow(clippy::manual_find)]
pub fn find_child_by_type<'a>(node: &Node<'a>, type_name: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == type_name {
            return Some(child);
        }
    }
    None
}

/// Find all children of a specific type.
pub fn find_children_by_type<'a>(node: &Node<'a>, type_name: &str) -> Vec<Node<'a>> {
    let mut results = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == type_name {
            results.push(child);
        }
    }
    results
}

/// Named children, comments excluded.
pub fn named_children<'a>(node: &Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| !is_comment(c))
        .collect()
}

pub fn is_comment(node: &Node) -> bool {
    COMMENT_KINDS.contains(&node.kind())
}

/// Start location (1-based line and column) of a node.
pub fn start_location(node: &Node) -> Location {
    let pos = node.start_position();
    Location::new(pos.row as u32 + 1, pos.column as u32 + 1)
}

/// Inclusive range of a node: its end is the last character it covers.
pub fn node_range(node: &Node) -> LocationRange {
    let start = start_location(node);
    let pos = node.end_position();
    let end = Location::new(pos.row as u32 + 1, (pos.column as u32).max(1));
    LocationRange::new(start, end).unwrap_or(LocationRange::point(start))
}

/// Range from the start of `first` to the end of `last`.
pub fn span_range(first: &Node, last: &Node) -> LocationRange {
    let start = node_range(first);
    let end = node_range(last);
    start.cover(&end)
}

/// Convert a node to a token carrying its kind, text and range.
pub fn token_from_node(node: &Node, source: &str) -> Token {
    Token::new(node.kind(), get_node_text(node, source), node_range(node))
}

/// Leaf tokens under `node` in source order, comments excluded.
pub fn leaf_tokens(node: &Node, source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    collect_leaves(node, source, &mut tokens);
    tokens
}

fn collect_leaves(node: &Node, source: &str, tokens: &mut Vec<Token>) {
    if is_comment(node) || node.is_missing() {
        return;
    }
    if node.child_count() == 0 {
        let text = get_node_text(node, source);
        if !text.is_empty() {
            tokens.push(Token::new(node.kind(), text, node_range(node)));
        }
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_leaves(&child, source, tokens);
    }
}

/// First `ERROR` or missing node in a subtree, in source order.
pub fn first_error<'a>(node: &Node<'a>) -> Option<Node<'a>> {
    if node.is_error() || node.is_missing() {
        return Some(*node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(&child) {
            return Some(found);
        }
    }
    None
}

/// Count total lines in source.
pub fn count_lines(source: &str) -> u32 {
    source.lines().count() as u32
}

/// Location of the last character of `source` (start of file when empty).
pub fn end_of_source(source: &str) -> Location {
    let trimmed = source.trim_end_matches(['\n', '\r']);
    if trimmed.is_empty() {
        return Location::start_of_file();
    }
    let line = count_lines(trimmed).max(1);
    let last = trimmed.rsplit('\n').next().unwrap_or("");
    Location::new(line, (last.trim_end_matches('\r').len() as u32).max(1))
}
