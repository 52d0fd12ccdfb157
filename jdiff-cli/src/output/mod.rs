//! Output formatting for jdiff results.
//!
//! Text output is diff-like and goes through the core text writers; JSON
//! output serializes every file comparison, failures included.

use clap::ValueEnum;
use jdiff_core::exporter::{self, json};
use jdiff_core::{DirectoryComparison, ExportConfig};
use std::str::FromStr;

/// Output format for comparison results
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Diff-like text (default)
    #[default]
    Text,
    /// JSON for machine consumption
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: '{}'", s)),
        }
    }
}

/// Render comparison results in the given format.
pub fn render(
    result: &DirectoryComparison,
    format: OutputFormat,
    config: &ExportConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(exporter::export_text(result, config)),
        OutputFormat::Json => {
            let mut out = json::export(result, config)?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// One line per file pair that could not be compared.
pub fn failure_lines(result: &DirectoryComparison) -> Vec<String> {
    result
        .failures()
        .map(|file| match file.error() {
            Some(error) => format!("{} <=> {}: {}", file.from_path, file.to_path, error),
            None => format!("{} <=> {}: comparison failed", file.from_path, file.to_path),
        })
        .collect()
}
