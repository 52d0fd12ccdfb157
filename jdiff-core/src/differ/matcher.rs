//! Pairing of sibling declarations across the from and to trees.
//!
//! Matching runs in two greedy passes over one sibling level:
//!
//! 1. exact identity key (category, name, parameter types), consumed in
//!    source order so duplicate keys pair first-to-first;
//! 2. similarity score for what is left, each from-declaration in source
//!    order taking its best unconsumed candidate (earliest on ties).
//!
//! A declaration whose name and signature both changed has no positive score
//! and is reported as a removal plus an addition.

use std::collections::{HashMap, VecDeque};

use crate::location::{Location, LocationRange};
use crate::types::{Category, Declaration, IdentityKey, ParameterList};
use crate::version::ComparisonRules;

/// Outcome of matching at one sibling level.
///
/// Unmatched declarations carry an anchor: the other-side counterpart of the
/// nearest preceding matched sibling, which locates the insertion point.
#[derive(Clone, Copy, Debug)]
pub enum Pairing<'a> {
    Matched {
        from: &'a Declaration,
        to: &'a Declaration,
    },
    Removed {
        from: &'a Declaration,
        anchor: Option<&'a Declaration>,
    },
    Added {
        to: &'a Declaration,
        anchor: Option<&'a Declaration>,
    },
}

impl<'a> Pairing<'a> {
    pub fn from(&self) -> Option<&'a Declaration> {
        match self {
            Pairing::Matched { from, .. } | Pairing::Removed { from, .. } => Some(from),
            Pairing::Added { .. } => None,
        }
    }

    pub fn to(&self) -> Option<&'a Declaration> {
        match self {
            Pairing::Matched { to, .. } | Pairing::Added { to, .. } => Some(to),
            Pairing::Removed { .. } => None,
        }
    }

    /// Zero-width point on the side where the declaration is absent.
    ///
    /// `fallback` is where members of the absent side's parent begin. Matched
    /// pairings have no insertion point.
    pub fn insertion_point(&self, fallback: Location) -> Option<LocationRange> {
        match self {
            Pairing::Matched { .. } => None,
            Pairing::Removed { anchor, .. } | Pairing::Added { anchor, .. } => {
                let at = anchor.map(|a| a.range.end()).unwrap_or(fallback);
                Some(LocationRange::point(at))
            }
        }
    }
}

/// Pair `from` siblings against `to` siblings.
///
/// Every input declaration appears in exactly one pairing. The result lists
/// from-declarations in source order (matched or removed), then unmatched
/// to-declarations in source order (added).
pub fn match_declarations<'a>(
    from: &'a [Declaration],
    to: &'a [Declaration],
    rules: &ComparisonRules,
) -> Vec<Pairing<'a>> {
    let mut from_match: Vec<Option<usize>> = vec![None; from.len()];
    let mut to_match: Vec<Option<usize>> = vec![None; to.len()];

    // Pass 1: identity keys
    let mut by_key: HashMap<IdentityKey, VecDeque<usize>> = HashMap::new();
    for (j, decl) in to.iter().enumerate() {
        by_key.entry(decl.identity_key(rules)).or_default().push_back(j);
    }
    for (i, decl) in from.iter().enumerate() {
        if let Some(j) = by_key
            .get_mut(&decl.identity_key(rules))
            .and_then(VecDeque::pop_front)
        {
            from_match[i] = Some(j);
            to_match[j] = Some(i);
        }
    }

    // Pass 2: similarity
    for (i, decl) in from.iter().enumerate() {
        if from_match[i].is_some() {
            continue;
        }
        let mut best: Option<(f64, usize)> = None;
        for (j, candidate) in to.iter().enumerate() {
            if to_match[j].is_some() {
                continue;
            }
            let score = similarity(decl, candidate, rules);
            if score > 0.0 && best.map_or(true, |(s, _)| score > s) {
                best = Some((score, j));
            }
        }
        if let Some((_, j)) = best {
            from_match[i] = Some(j);
            to_match[j] = Some(i);
        }
    }

    let mut pairings = Vec::with_capacity(from.len() + to.len());

    let mut anchor = None;
    for (i, decl) in from.iter().enumerate() {
        match from_match[i] {
            Some(j) => {
                pairings.push(Pairing::Matched {
                    from: decl,
                    to: &to[j],
                });
                anchor = Some(&to[j]);
            }
            None => pairings.push(Pairing::Removed { from: decl, anchor }),
        }
    }

    let mut anchor = None;
    for (j, decl) in to.iter().enumerate() {
        match to_match[j] {
            Some(i) => anchor = Some(&from[i]),
            None => pairings.push(Pairing::Added { to: decl, anchor }),
        }
    }

    pairings
}

/// Similarity of two unmatched declarations, in `[0, 1]`.
///
/// Only declarations that keep their name are worth pairing: overloads that
/// changed parameters, constructors, and packages (at most one per file).
pub fn similarity(from: &Declaration, to: &Declaration, rules: &ComparisonRules) -> f64 {
    let category = from.kind.category();
    if category != to.kind.category() {
        return 0.0;
    }
    match category {
        Category::Package => 0.5,
        Category::Method if from.name == to.name => {
            0.5 + 0.5 * parameter_score(from.parameters.as_ref(), to.parameters.as_ref(), rules)
        }
        Category::Constructor => {
            0.5 + 0.5 * parameter_score(from.parameters.as_ref(), to.parameters.as_ref(), rules)
        }
        _ => 0.0,
    }
}

/// Fraction of parameter types kept: full credit in place, half credit when
/// moved to another position.
fn parameter_score(
    from: Option<&ParameterList>,
    to: Option<&ParameterList>,
    rules: &ComparisonRules,
) -> f64 {
    let from_types = from.map(|p| p.types(rules)).unwrap_or_default();
    let to_types = to.map(|p| p.types(rules)).unwrap_or_default();

    let longest = from_types.len().max(to_types.len());
    if longest == 0 {
        return 1.0;
    }

    let mut score = 0.0;
    for (i, ty) in from_types.iter().enumerate() {
        if to_types.get(i) == Some(ty) {
            score += 1.0;
        } else if to_types.contains(ty) {
            score += 0.5;
        }
    }
    score / longest as f64
}
