//! JSON format exporter.

use super::ExportConfig;
use crate::differ::DirectoryComparison;

/// Export comparison results to JSON.
pub fn export(result: &DirectoryComparison, config: &ExportConfig) -> Result<String, serde_json::Error> {
    if config.pretty_print {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    }
}
