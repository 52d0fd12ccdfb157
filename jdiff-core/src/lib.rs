//! jdiff core - structural comparison engine for Java sources.
//!
//! Instead of comparing lines, jdiff parses both versions of a file into
//! declaration trees, pairs declarations across the two trees and reports
//! what was added, removed or changed, each with exact source ranges on both
//! sides.
//!
//! # Features
//!
//! - **Declaration matching**: identity keys first, similarity scoring second
//! - **Attribute comparison**: access, modifiers, annotations, generics,
//!   supertypes, return and variable types, parameters, throws
//! - **Code comparison**: token-level LCS over method and initializer bodies,
//!   insensitive to whitespace and comments
//! - **Parallel directory comparison**: independent file pairs on Rayon
//! - **Multiple writers**: brief, no-context, context (with highlighting), JSON
//!
//! # Usage
//!
//! ```
//! use jdiff_core::{Processor, ProcessorConfig};
//!
//! let processor = Processor::new(ProcessorConfig::default());
//! let result = processor.process_sources(
//!     "a/T.java",
//!     "class T { void f(int x) {} }".to_string(),
//!     "b/T.java",
//!     "class T { int f(int x) { return x; } }".to_string(),
//! );
//! assert_eq!(result.report().map(|r| r.count()), Some(2));
//! ```

pub mod differ;
pub mod error;
pub mod exporter;
pub mod location;
pub mod parser;
pub mod processor;
pub mod scanner;
pub mod types;
pub mod version;

pub use differ::{
    DiffKind, Difference, DirectoryComparison, FileComparison, FileOutcome, Pairing, Report,
};
pub use error::{CompareError, Result};
pub use exporter::{ExportConfig, OutputStyle};
pub use location::{Location, LocationRange};
pub use processor::{Processor, ProcessorConfig};
pub use types::{Declaration, DeclarationKind, TypeKind};
pub use version::{ComparisonRules, SourceVersion};
