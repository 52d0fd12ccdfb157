//! Comparison of matched declarations.
//!
//! A matched pair is compared attribute by attribute (type kind, access,
//! modifiers, annotations, type parameters, supertypes or return type,
//! parameters, throws, code), then its children are matched and compared
//! recursively. Unmatched declarations produce a single Add or Delete whose
//! absent side is a zero-width insertion point.

use std::collections::HashSet;

use super::changes::{Difference, Report};
use super::code::compare_code;
use super::matcher::{match_declarations, Pairing};
use super::messages;
use super::params::{compare_parameters, compare_throws};
use crate::error::{CompareError, Result};
use crate::location::LocationRange;
use crate::types::{Declaration, DeclarationKind, Token};
use crate::version::ComparisonRules;

const TYPE_MODIFIERS: &[&str] = &["abstract", "final", "static", "strictfp", "sealed", "non-sealed"];
const METHOD_MODIFIERS: &[&str] = &[
    "abstract",
    "final",
    "native",
    "static",
    "strictfp",
    "synchronized",
    "default",
];
const FIELD_MODIFIERS: &[&str] = &["final", "static", "transient", "volatile"];

/// Compare two compilation units (or any two matched roots).
pub fn compare_units(from: &Declaration, to: &Declaration, rules: &ComparisonRules) -> Result<Report> {
    let mut out = Report::new();
    Comparator::new(rules).compare_matched(from, to, &mut out)?;
    Ok(out)
}

/// Compare one pairing produced at the sibling level of `from_parent` and
/// `to_parent`.
pub fn compare(
    pairing: &Pairing,
    from_parent: &Declaration,
    to_parent: &Declaration,
    rules: &ComparisonRules,
) -> Result<Vec<Difference>> {
    let mut out = Report::new();
    Comparator::new(rules).compare_pairing(pairing, from_parent, to_parent, &mut out)?;
    Ok(out.into_iter().collect())
}

/// Walks matched declaration trees under one set of comparison rules.
struct Comparator<'r> {
    rules: &'r ComparisonRules,
}

impl<'r> Comparator<'r> {
    pub fn new(rules: &'r ComparisonRules) -> Self {
        Self { rules }
    }

    fn compare_pairing(
        &self,
        pairing: &Pairing,
        from_parent: &Declaration,
        to_parent: &Declaration,
        out: &mut Report,
    ) -> Result<()> {
        match pairing {
            Pairing::Matched { from, to } => self.compare_matched(from, to, out),
            Pairing::Removed { from, .. } => {
                let Some(noun) = declaration_noun(from, from_parent) else {
                    return Ok(());
                };
                let at = pairing
                    .insertion_point(to_parent.body_start)
                    .unwrap_or(LocationRange::point(to_parent.body_start));
                let message = format!("{} removed: {}", noun, from.display_name());
                out.append(Difference::deleted(message, from.range, at));
                Ok(())
            }
            Pairing::Added { to, .. } => {
                let Some(noun) = declaration_noun(to, to_parent) else {
                    return Ok(());
                };
                let at = pairing
                    .insertion_point(from_parent.body_start)
                    .unwrap_or(LocationRange::point(from_parent.body_start));
                let message = format!("{} added: {}", noun, to.display_name());
                out.append(Difference::added(message, at, to.range));
                Ok(())
            }
        }
    }

    fn compare_matched(&self, from: &Declaration, to: &Declaration, out: &mut Report) -> Result<()> {
        if from.kind.category() != to.kind.category() {
            return Err(CompareError::InvariantViolation(format!(
                "matched {:?} `{}` with {:?} `{}`",
                from.kind, from.name, to.kind, to.name
            )));
        }

        if let DeclarationKind::Unsupported(kind) = &from.kind {
            tracing::warn!("Skipping unsupported declaration {} `{}`", kind, from.name);
            return Ok(());
        }

        if let (DeclarationKind::Type(a), DeclarationKind::Type(b)) = (&from.kind, &to.kind) {
            if a != b {
                out.changed(
                    from.name_range,
                    to.name_range,
                    messages::TYPE_CHANGED,
                    &[a.as_str(), b.as_str()],
                );
            }
        }

        if from.kind.has_modifiers() {
            self.compare_access(from, to, out);
            self.compare_modifiers(from, to, out);
        }
        if self.rules.compare_annotations {
            self.compare_annotations(from, to, out);
        }
        if self.rules.compare_generics {
            self.compare_type_parameters(from, to, out);
        }

        match &from.kind {
            DeclarationKind::Package => {
                if from.name != to.name {
                    out.changed(
                        from.name_range,
                        to.name_range,
                        messages::PACKAGE_NAME_CHANGED,
                        &[&from.name, &to.name],
                    );
                }
            }
            DeclarationKind::Type(_) => {
                self.compare_supertypes(
                    from,
                    to,
                    (from.extends.as_slice(), to.extends.as_slice()),
                    messages::EXTENDED_TYPE_ADDED,
                    messages::EXTENDED_TYPE_REMOVED,
                    Some(messages::EXTENDED_TYPE_CHANGED),
                    out,
                );
                self.compare_supertypes(
                    from,
                    to,
                    (from.implements.as_slice(), to.implements.as_slice()),
                    messages::IMPLEMENTED_TYPE_ADDED,
                    messages::IMPLEMENTED_TYPE_REMOVED,
                    None,
                    out,
                );
            }
            DeclarationKind::Method => {
                self.compare_return_type(from, to, out);
                compare_parameters(from, to, self.rules, out);
                compare_throws(from, to, self.rules, out);
                self.compare_body(from, to, out);
            }
            DeclarationKind::Constructor => {
                compare_parameters(from, to, self.rules, out);
                compare_throws(from, to, self.rules, out);
                self.compare_body(from, to, out);
            }
            DeclarationKind::Field => {
                self.compare_variable_type(from, to, out);
                self.compare_initializer(from, to, out);
            }
            DeclarationKind::Initializer { .. } | DeclarationKind::EnumConstant => {
                self.compare_body(from, to, out);
            }
            DeclarationKind::CompilationUnit
            | DeclarationKind::Import
            | DeclarationKind::Unsupported(_) => {}
        }

        if from.kind.has_children() {
            self.compare_children(from, to, out)?;
        }
        Ok(())
    }

    fn compare_children(&self, from: &Declaration, to: &Declaration, out: &mut Report) -> Result<()> {
        let pairings = match_declarations(&from.children, &to.children, self.rules);
        tracing::trace!(
            "Matched {} pairings under `{}`",
            pairings.len(),
            from.display_name()
        );
        for pairing in &pairings {
            self.compare_pairing(pairing, from, to, out)?;
        }
        Ok(())
    }

    fn compare_access(&self, from: &Declaration, to: &Declaration, out: &mut Report) {
        match (from.access(), to.access()) {
            (None, Some(t)) => out.changed(
                from.first_token_range(),
                t.range,
                messages::ACCESS_ADDED,
                &[&t.text],
            ),
            (Some(f), None) => out.changed(
                f.range,
                to.first_token_range(),
                messages::ACCESS_REMOVED,
                &[&f.text],
            ),
            (Some(f), Some(t)) if f.text != t.text => out.changed(
                f.range,
                t.range,
                messages::ACCESS_CHANGED,
                &[&f.text, &t.text],
            ),
            _ => {}
        }
    }

    fn compare_modifiers(&self, from: &Declaration, to: &Declaration, out: &mut Report) {
        let keywords = match from.kind {
            DeclarationKind::Type(_) => TYPE_MODIFIERS,
            DeclarationKind::Method => METHOD_MODIFIERS,
            DeclarationKind::Field => FIELD_MODIFIERS,
            _ => return,
        };
        for &keyword in keywords {
            match (from.modifier(keyword), to.modifier(keyword)) {
                (None, Some(t)) => out.changed(
                    from.first_token_range(),
                    t.range,
                    messages::MODIFIER_ADDED,
                    &[keyword],
                ),
                (Some(f), None) => out.changed(
                    f.range,
                    to.first_token_range(),
                    messages::MODIFIER_REMOVED,
                    &[keyword],
                ),
                _ => {}
            }
        }
    }

    fn compare_annotations(&self, from: &Declaration, to: &Declaration, out: &mut Report) {
        let from_set: HashSet<String> = from.annotations.iter().map(|a| compact(&a.text)).collect();
        let to_set: HashSet<String> = to.annotations.iter().map(|a| compact(&a.text)).collect();

        for annotation in &from.annotations {
            let text = compact(&annotation.text);
            if !to_set.contains(&text) {
                out.changed(
                    annotation.range,
                    to.first_token_range(),
                    messages::ANNOTATION_REMOVED,
                    &[&text],
                );
            }
        }
        for annotation in &to.annotations {
            let text = compact(&annotation.text);
            if !from_set.contains(&text) {
                out.changed(
                    from.first_token_range(),
                    annotation.range,
                    messages::ANNOTATION_ADDED,
                    &[&text],
                );
            }
        }
    }

    fn compare_type_parameters(&self, from: &Declaration, to: &Declaration, out: &mut Report) {
        match (&from.type_parameters, &to.type_parameters) {
            (None, Some(t)) => out.changed(
                from.name_range,
                t.range,
                messages::TYPE_PARAMETERS_ADDED,
                &[&compact(&t.text)],
            ),
            (Some(f), None) => out.changed(
                f.range,
                to.name_range,
                messages::TYPE_PARAMETERS_REMOVED,
                &[&compact(&f.text)],
            ),
            (Some(f), Some(t)) => {
                let (a, b) = (compact(&f.text), compact(&t.text));
                if a != b {
                    out.changed(f.range, t.range, messages::TYPE_PARAMETERS_CHANGED, &[&a, &b]);
                }
            }
            (None, None) => {}
        }
    }

    /// Extended or implemented types. A single supertype replaced by another
    /// is one change when `changed` is given; otherwise types are compared as
    /// sets.
    #[allow(clippy::too_many_arguments)]
    fn compare_supertypes(
        &self,
        from: &Declaration,
        to: &Declaration,
        (from_types, to_types): (&[Token], &[Token]),
        added: &str,
        removed: &str,
        changed: Option<&str>,
        out: &mut Report,
    ) {
        let from_names: Vec<String> = from_types.iter().map(|t| self.rules.normalize_type(&t.text)).collect();
        let to_names: Vec<String> = to_types.iter().map(|t| self.rules.normalize_type(&t.text)).collect();

        if let (Some(template), [f], [t]) = (changed, from_types, to_types) {
            if from_names[0] != to_names[0] {
                out.changed(f.range, t.range, template, &[&compact(&f.text), &compact(&t.text)]);
            }
            return;
        }

        for (token, name) in from_types.iter().zip(&from_names) {
            if !to_names.contains(name) {
                out.changed(token.range, to.name_range, removed, &[&compact(&token.text)]);
            }
        }
        for (token, name) in to_types.iter().zip(&to_names) {
            if !from_names.contains(name) {
                out.changed(from.name_range, token.range, added, &[&compact(&token.text)]);
            }
        }
    }

    fn compare_return_type(&self, from: &Declaration, to: &Declaration, out: &mut Report) {
        if let (Some(f), Some(t)) = (&from.value_type, &to.value_type) {
            if self.rules.normalize_type(&f.text) != self.rules.normalize_type(&t.text) {
                out.changed(
                    f.range,
                    t.range,
                    messages::RETURN_TYPE_CHANGED,
                    &[&from.display_name(), &compact(&f.text), &compact(&t.text)],
                );
            }
        }
    }

    fn compare_variable_type(&self, from: &Declaration, to: &Declaration, out: &mut Report) {
        if let (Some(f), Some(t)) = (&from.value_type, &to.value_type) {
            if self.rules.normalize_type(&f.text) != self.rules.normalize_type(&t.text) {
                out.changed(
                    f.range,
                    t.range,
                    messages::VARIABLE_TYPE_CHANGED,
                    &[&from.name, &compact(&f.text), &compact(&t.text)],
                );
            }
        }
    }

    fn compare_initializer(&self, from: &Declaration, to: &Declaration, out: &mut Report) {
        match (token_span(&from.initializer), token_span(&to.initializer)) {
            (None, None) => {}
            (None, Some(t)) => out.changed(
                from.name_range,
                t,
                messages::INITIALIZER_ADDED,
                &[&from.name],
            ),
            (Some(f), None) => out.changed(
                f,
                to.name_range,
                messages::INITIALIZER_REMOVED,
                &[&from.name],
            ),
            (Some(_), Some(_)) => out.extend(compare_code(
                &from.name,
                &from.initializer,
                &to.initializer,
                from.name_range.end(),
                to.name_range.end(),
            )),
        }
    }

    fn compare_body(&self, from: &Declaration, to: &Declaration, out: &mut Report) {
        out.extend(compare_code(
            &from.display_name(),
            &from.body,
            &to.body,
            from.range.end(),
            to.range.end(),
        ));
    }
}

/// Noun naming a declaration in added/removed messages; `None` for
/// declarations that are not reported.
fn declaration_noun(decl: &Declaration, parent: &Declaration) -> Option<&'static str> {
    let noun = match &decl.kind {
        DeclarationKind::CompilationUnit => "file",
        DeclarationKind::Package => "package",
        DeclarationKind::Import => "import",
        DeclarationKind::Type(_) if parent.kind == DeclarationKind::CompilationUnit => "type",
        DeclarationKind::Type(_) => "inner type",
        DeclarationKind::Field => "field",
        DeclarationKind::Method => "method",
        DeclarationKind::Constructor => "constructor",
        DeclarationKind::Initializer { .. } => "initializer",
        DeclarationKind::EnumConstant => "enum constant",
        DeclarationKind::Unsupported(kind) => {
            tracing::warn!("Skipping unsupported declaration {} `{}`", kind, decl.name);
            return None;
        }
    };
    Some(noun)
}

fn token_span(tokens: &[Token]) -> Option<LocationRange> {
    let first = tokens.first()?;
    let last = tokens.last()?;
    Some(first.range.cover(&last.range))
}

fn compact(text: &str) -> String {
    text.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::differ::changes::DiffKind;
    use crate::location::Location;
    use crate::parser::parse_source;

    fn diff_sources(from: &str, to: &str) -> Report {
        let rules = ComparisonRules::default();
        let a = parse_source(from, "From.java").unwrap();
        let b = parse_source(to, "To.java").unwrap();
        compare_units(&a, &b, &rules).unwrap()
    }

    fn msgs(report: &Report) -> Vec<String> {
        report.iter().map(|d| d.message.clone()).collect()
    }

    fn rg(l1: u32, c1: u32, l2: u32, c2: u32) -> LocationRange {
        LocationRange::new(Location::new(l1, c1), Location::new(l2, c2)).unwrap()
    }

    const SAMPLE: &str = r#"package org.example;

import java.util.List;

public abstract class Sample<T> extends Base implements Runnable {
    private static final int LIMIT = 10;

    @Deprecated
    protected Sample(int size) throws IllegalStateException {
        super(size);
    }

    public abstract void run();

    public <R> List<R> map(List<T> items, int depth) {
        return helper(items, depth);
    }

    static {
        init();
    }

    class Inner {
        void touch() {}
    }
}
"#;

    #[test]
    fn test_self_compare_is_empty() {
        assert!(diff_sources(SAMPLE, SAMPLE).is_empty());
    }

    #[test]
    fn test_empty_files() {
        assert!(diff_sources("", "").is_empty());
    }

    #[test]
    fn test_method_removed_then_added() {
        let report = diff_sources(
            "class T {\n    void a() {}\n    void b() {}\n}\n",
            "class T {\n    void a() {}\n    void c() {}\n}\n",
        );
        assert_eq!(msgs(&report), vec!["method removed: b()", "method added: c()"]);

        let removed = &report.all()[0];
        assert_eq!(removed.kind, DiffKind::Delete);
        assert_eq!(removed.first, rg(3, 5, 3, 15));
        assert_eq!(removed.second, LocationRange::point(Location::new(2, 15)));

        let added = &report.all()[1];
        assert_eq!(added.kind, DiffKind::Add);
        assert_eq!(added.first, LocationRange::point(Location::new(2, 15)));
        assert_eq!(added.second, rg(3, 5, 3, 15));
    }

    #[test]
    fn test_return_type_change() {
        let report = diff_sources(
            "class T { void foo(int x) { bar(); } }",
            "class T { int foo(int x) { bar(); } }",
        );
        assert_eq!(report.count(), 1);
        let diff = &report.all()[0];
        assert_eq!(diff.kind, DiffKind::Change);
        assert!(diff.message.contains("foo"));
        assert_eq!(diff.message, "return type of foo(int) changed from void to int");
        assert_eq!(diff.first, rg(1, 11, 1, 14));
        assert_eq!(diff.second, rg(1, 11, 1, 13));
    }

    #[test]
    fn test_add_delete_symmetry() {
        let a = "class T {\n    int x;\n    void f(int a) {}\n}\n";
        let b = "class T {\n    void f(int a) {}\n    void g() {}\n    class I {}\n}\n";
        let forward = diff_sources(a, b);
        let backward = diff_sources(b, a);

        let flip = |d: &Difference| {
            let message = if d.message.contains(" added: ") {
                d.message.replace(" added: ", " removed: ")
            } else {
                d.message.replace(" removed: ", " added: ")
            };
            Difference::new(d.kind.reversed(), message, d.second, d.first)
        };

        let mut flipped: Vec<Difference> = backward.iter().map(flip).collect();
        let mut expected: Vec<Difference> = forward.iter().cloned().collect();
        flipped.sort_by(|x, y| x.message.cmp(&y.message));
        expected.sort_by(|x, y| x.message.cmp(&y.message));
        assert_eq!(flipped, expected);
        assert_eq!(
            msgs(&forward),
            vec!["field removed: x", "method added: g()", "inner type added: I"]
        );
    }

    #[test]
    fn test_modifiers_and_access() {
        let report = diff_sources(
            "class T { public static void f() {} int x; }",
            "class T { protected final void f() {} private int x; }",
        );
        assert_eq!(
            msgs(&report),
            vec![
                "access changed from public to protected",
                "modifier added: final",
                "modifier removed: static",
                "access added: private",
            ]
        );
        // Added access points at the first token of the from declaration.
        assert_eq!(report.all()[3].first, rg(1, 37, 1, 39));
    }

    #[test]
    fn test_type_level_changes() {
        let report = diff_sources(
            "public class A extends B implements I, J { }",
            "interface A<T> extends C { }",
        );
        assert_eq!(
            msgs(&report),
            vec![
                "type changed from class to interface",
                "access removed: public",
                "type parameters added: <T>",
                "extended type changed from B to C",
                "implemented type removed: I",
                "implemented type removed: J",
            ]
        );
    }

    #[test]
    fn test_generics_ignored_for_old_versions() {
        let legacy = ComparisonRules::for_versions("1.4".parse().unwrap(), "1.4".parse().unwrap());
        let a = parse_source("class T { List<String> f() { return null; } }", "A.java").unwrap();
        let b = parse_source("class T { List<Long> f() { return null; } }", "B.java").unwrap();
        assert!(compare_units(&a, &b, &legacy).unwrap().is_empty());
        assert_eq!(compare_units(&a, &b, &ComparisonRules::default()).unwrap().count(), 1);
    }

    #[test]
    fn test_annotations() {
        let report = diff_sources(
            "class T { @Deprecated void f() {} }",
            "class T { @Override void f() {} }",
        );
        assert_eq!(
            msgs(&report),
            vec!["annotation removed: @Deprecated", "annotation added: @Override"]
        );
    }

    #[test]
    fn test_field_changes() {
        let report = diff_sources(
            "class T { int a = 1; int b; long c = 2; }",
            "class T { long a = 1; int b = 3; long c = 4; }",
        );
        assert_eq!(
            msgs(&report),
            vec![
                "variable type for a changed from int to long",
                "initializer added: b",
                "code changed in c",
            ]
        );
    }

    #[test]
    fn test_field_array_dimensions() {
        let report = diff_sources("class T { int x[]; }", "class T { int x; }");
        assert_eq!(msgs(&report), vec!["variable type for x changed from int[] to int"]);

        let report = diff_sources("class T { int x[]; }", "class T { int[] x; }");
        assert!(report.is_empty());
    }

    #[test]
    fn test_package_and_imports() {
        let report = diff_sources(
            "package a.b;\nimport java.util.List;\nclass T {}\n",
            "package a.c;\nimport java.util.Map;\nclass T {}\n",
        );
        assert_eq!(
            msgs(&report),
            vec![
                "package name changed from a.b to a.c",
                "import removed: java.util.List",
                "import added: java.util.Map",
            ]
        );
    }

    #[test]
    fn test_nested_differences_follow_container() {
        let report = diff_sources(
            "class T { class I { void f() { a(); } } }",
            "final class T { class I { void f() { b(); } } }",
        );
        assert_eq!(
            msgs(&report),
            vec!["modifier added: final", "code changed in f()"]
        );
    }

    #[test]
    fn test_unsupported_is_skipped() {
        let report = diff_sources(
            "class T { record P(int x) {} }",
            "class T { record P(long x) {} }",
        );
        assert!(report.is_empty());

        let report = diff_sources("class T { record P(int x) {} }", "class T { }");
        assert!(report.is_empty());
    }

    #[test]
    fn test_pairing_with_mismatched_categories_is_rejected() {
        let rules = ComparisonRules::default();
        let unit = parse_source("class T { int x; void f() {} }", "T.java").unwrap();
        let class = &unit.children[0];
        let pairing = Pairing::Matched {
            from: &class.children[0],
            to: &class.children[1],
        };
        let err = compare(&pairing, class, class, &rules).unwrap_err();
        assert!(err.is_invariant_violation());
    }
}
