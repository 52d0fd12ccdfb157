//! Parameter-list and throws-clause comparison.

use super::changes::Report;
use super::messages;
use crate::location::LocationRange;
use crate::types::{Declaration, Parameter, ParameterList};
use crate::version::ComparisonRules;

/// How a from-side parameter relates to the to-side list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ParamMatch {
    /// Same type and name at the same position.
    Exact,
    /// Same type at the same position, name changed.
    TypeAt,
    /// Same name at the same position, type changed.
    NameAt,
    /// Same type at another position.
    TypeMoved(usize),
    /// Same name at another position.
    NameMoved(usize),
    Unmatched,
}

/// Compare the parameter lists of two matched methods or constructors.
pub(crate) fn compare_parameters(
    from: &Declaration,
    to: &Declaration,
    rules: &ComparisonRules,
    out: &mut Report,
) {
    let (Some(from_list), Some(to_list)) = (&from.parameters, &to.parameters) else {
        return;
    };

    match (from_list.is_empty(), to_list.is_empty()) {
        (true, true) => {}
        (false, true) => {
            for param in &from_list.params {
                out.changed(
                    param.name.range,
                    to_list.range,
                    messages::PARAMETER_REMOVED,
                    &[&param.name.text],
                );
            }
        }
        (true, false) => {
            for param in &to_list.params {
                out.changed(
                    from_list.range,
                    param.name.range,
                    messages::PARAMETER_ADDED,
                    &[&param.name.text],
                );
            }
        }
        (false, false) => compare_each_parameter(from_list, to_list, rules, out),
    }
}

fn compare_each_parameter(
    from: &ParameterList,
    to: &ParameterList,
    rules: &ComparisonRules,
    out: &mut Report,
) {
    let from_types = from.types(rules);
    let to_types = to.types(rules);
    let (matches, consumed) = match_parameters(&from.params, &to.params, &from_types, &to_types);

    for (idx, (param, matched)) in from.params.iter().zip(&matches).enumerate() {
        match *matched {
            ParamMatch::Exact => {}
            ParamMatch::TypeAt => {
                let other = &to.params[idx];
                out.changed(
                    param.name.range,
                    other.name.range,
                    messages::PARAMETER_NAME_CHANGED,
                    &[&param.name.text, &other.name.text],
                );
            }
            ParamMatch::NameAt => {
                out.changed(
                    param.range,
                    to.params[idx].range,
                    messages::PARAMETER_TYPE_CHANGED,
                    &[&from_types[idx], &to_types[idx]],
                );
            }
            ParamMatch::TypeMoved(to_idx) => {
                let other = &to.params[to_idx];
                let (from_pos, to_pos) = (idx.to_string(), to_idx.to_string());
                if param.name.text == other.name.text {
                    out.changed(
                        param.name.range,
                        other.name.range,
                        messages::PARAMETER_REORDERED,
                        &[&param.name.text, &from_pos, &to_pos],
                    );
                } else {
                    out.changed(
                        param.name.range,
                        other.name.range,
                        messages::PARAMETER_REORDERED_AND_RENAMED,
                        &[&param.name.text, &from_pos, &to_pos, &other.name.text],
                    );
                }
            }
            ParamMatch::NameMoved(to_idx) => {
                out.changed(
                    param.range,
                    to.params[to_idx].range,
                    messages::PARAMETER_REORDERED,
                    &[&param.name.text, &idx.to_string(), &to_idx.to_string()],
                );
            }
            ParamMatch::Unmatched => {
                out.changed(
                    param.range,
                    to.range,
                    messages::PARAMETER_REMOVED,
                    &[&param.name.text],
                );
            }
        }
    }

    for (param, _) in to.params.iter().zip(&consumed).filter(|(_, used)| !**used) {
        out.changed(
            from.range,
            param.range,
            messages::PARAMETER_ADDED,
            &[&param.name.text],
        );
    }
}

/// Classify each from-parameter, strongest evidence first: exact positions,
/// then same-position type or name, then moved type or name.
fn match_parameters(
    from: &[Parameter],
    to: &[Parameter],
    from_types: &[String],
    to_types: &[String],
) -> (Vec<ParamMatch>, Vec<bool>) {
    let mut matches = vec![ParamMatch::Unmatched; from.len()];
    let mut consumed = vec![false; to.len()];

    let same_type = |i: usize, j: usize| from_types[i] == to_types[j];
    let same_name = |i: usize, j: usize| from[i].name.text == to[j].name.text;

    for i in 0..from.len().min(to.len()) {
        if same_type(i, i) && same_name(i, i) {
            matches[i] = ParamMatch::Exact;
            consumed[i] = true;
        }
    }

    for i in 0..from.len().min(to.len()) {
        if matches[i] != ParamMatch::Unmatched || consumed[i] {
            continue;
        }
        if same_type(i, i) {
            matches[i] = ParamMatch::TypeAt;
            consumed[i] = true;
        } else if same_name(i, i) {
            matches[i] = ParamMatch::NameAt;
            consumed[i] = true;
        }
    }

    for i in 0..from.len() {
        if matches[i] != ParamMatch::Unmatched {
            continue;
        }
        // Prefer a moved parameter that kept its name as well.
        let moved = (0..to.len())
            .filter(|&j| !consumed[j] && same_type(i, j))
            .min_by_key(|&j| !same_name(i, j));
        if let Some(j) = moved {
            matches[i] = ParamMatch::TypeMoved(j);
            consumed[j] = true;
        } else if let Some(j) = (0..to.len()).find(|&j| !consumed[j] && same_name(i, j)) {
            matches[i] = ParamMatch::NameMoved(j);
            consumed[j] = true;
        }
    }

    (matches, consumed)
}

/// Compare the throws clauses of two matched methods or constructors.
pub(crate) fn compare_throws(
    from: &Declaration,
    to: &Declaration,
    rules: &ComparisonRules,
    out: &mut Report,
) {
    let from_names: Vec<String> = from.throws.iter().map(|t| rules.normalize_type(&t.text)).collect();
    let to_names: Vec<String> = to.throws.iter().map(|t| rules.normalize_type(&t.text)).collect();
    let mut consumed = vec![false; to_names.len()];

    for (idx, (token, name)) in from.throws.iter().zip(&from_names).enumerate() {
        let found = (0..to_names.len())
            .filter(|&j| !consumed[j] && to_names[j] == *name)
            .min_by_key(|&j| j != idx);
        match found {
            Some(j) => {
                consumed[j] = true;
                if j != idx {
                    out.changed(
                        token.range,
                        to.throws[j].range,
                        messages::THROWS_REORDERED,
                        &[name, &idx.to_string(), &j.to_string()],
                    );
                }
            }
            None => out.changed(
                token.range,
                throws_anchor(to),
                messages::THROWS_REMOVED,
                &[name],
            ),
        }
    }

    for (j, token) in to.throws.iter().enumerate() {
        if !consumed[j] {
            out.changed(
                throws_anchor(from),
                token.range,
                messages::THROWS_ADDED,
                &[&to_names[j]],
            );
        }
    }
}

/// Where a throws difference points on the side lacking the type: the
/// throws clause, else the parameter list, else the name.
fn throws_anchor(decl: &Declaration) -> LocationRange {
    decl.throws_range
        .or_else(|| decl.parameters.as_ref().map(|p| p.range))
        .unwrap_or(decl.name_range)
}
