//! Java source versions and the comparison rules they enable.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CompareError;

/// Accepts both "1.N" and plain "N" spellings.
static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:1\.)?(\d{1,2})\s*$").expect("valid version regex"));

/// First feature level with generics and annotations.
const GENERICS_LEVEL: u8 = 5;
const ANNOTATIONS_LEVEL: u8 = 5;

/// A Java source level, stored as its feature number (1.4 -> 4, 17 -> 17).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceVersion(u8);

impl SourceVersion {
    pub const DEFAULT: SourceVersion = SourceVersion(5);

    pub fn level(&self) -> u8 {
        self.0
    }
}

impl Default for SourceVersion {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for SourceVersion {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = VERSION_PATTERN
            .captures(s)
            .ok_or_else(|| CompareError::InvalidVersion(s.to_string()))?;
        let level: u8 = caps[1]
            .parse()
            .map_err(|_| CompareError::InvalidVersion(s.to_string()))?;
        if !(1..=30).contains(&level) {
            return Err(CompareError::InvalidVersion(s.to_string()));
        }
        Ok(SourceVersion(level))
    }
}

impl fmt::Display for SourceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 9 {
            write!(f, "1.{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Version-dependent switches consulted by the matcher and comparator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRules {
    /// Compare type arguments and type parameter lists.
    pub compare_generics: bool,
    /// Compare annotations on declarations.
    pub compare_annotations: bool,
}

impl ComparisonRules {
    /// A rule is on only when both sides are at or above its threshold.
    pub fn for_versions(from: SourceVersion, to: SourceVersion) -> Self {
        let level = from.level().min(to.level());
        Self {
            compare_generics: level >= GENERICS_LEVEL,
            compare_annotations: level >= ANNOTATIONS_LEVEL,
        }
    }

    /// Normalize a type text for comparison: drop whitespace, and erase type
    /// arguments when generics are not compared.
    pub fn normalize_type(&self, text: &str) -> String {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if self.compare_generics {
            compact
        } else {
            erase_type_arguments(&compact)
        }
    }
}

impl Default for ComparisonRules {
    fn default() -> Self {
        Self::for_versions(SourceVersion::DEFAULT, SourceVersion::DEFAULT)
    }
}

/// `Map<K,List<V>>[]` -> `Map[]`
fn erase_type_arguments(text: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}
