//! Structural diff engine for Java declaration trees.
//!
//! The engine pairs declarations of the from and to trees sibling level by
//! sibling level ([`matcher`]), compares each pairing ([`comparator`]) and
//! collects the resulting differences in a [`Report`] in pre-order: a
//! container's own differences come before those of its members.
//!
//! # Example
//!
//! ```
//! use jdiff_core::differ::compare_units;
//! use jdiff_core::parser::parse_source;
//! use jdiff_core::ComparisonRules;
//!
//! let from = parse_source("class T { void a() {} void b() {} }", "T.java").unwrap();
//! let to = parse_source("class T { void a() {} void c() {} }", "T.java").unwrap();
//!
//! let report = compare_units(&from, &to, &ComparisonRules::default()).unwrap();
//! let messages: Vec<&str> = report.iter().map(|d| d.message.as_str()).collect();
//! assert_eq!(messages, ["method removed: b()", "method added: c()"]);
//! ```

pub mod changes;
pub mod code;
pub mod comparator;
pub mod matcher;
pub mod messages;
mod params;

pub use changes::{
    DiffKind, Difference, DirectoryComparison, FileComparison, FileOutcome, Report,
};
pub use comparator::{compare, compare_units};
pub use matcher::{match_declarations, similarity, Pairing};
