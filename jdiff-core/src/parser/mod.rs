//! Java source parsing.
//!
//! Converts tree-sitter ASTs into the `Declaration` tree the differ walks.
//! Parsing is a pure function of the source text; reading files is left to
//! the caller except for the `parse_file` convenience.

use std::path::Path;

use rayon::prelude::*;

use crate::error::{CompareError, Result};
use crate::types::Declaration;

pub mod java;

pub(crate) mod helpers;

/// Parse Java source into its compilation-unit declaration.
///
/// `path` is only used for naming the unit and for error messages.
pub fn parse_source(source: &str, path: &str) -> Result<Declaration> {
    java::parse(source, path)
}

/// Read and parse a Java file.
pub fn parse_file(path: &Path) -> Result<Declaration> {
    let source = std::fs::read_to_string(path).map_err(|e| CompareError::io(path, e))?;
    parse_source(&source, &path.display().to_string())
}

/// Parse several `(path, source)` pairs in parallel using rayon.
pub fn parse_sources_parallel(sources: &[(String, String)]) -> Vec<Result<Declaration>> {
    sources
        .par_iter()
        .map(|(path, source)| parse_source(source, path))
        .collect()
}
