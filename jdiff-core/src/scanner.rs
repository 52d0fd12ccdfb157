//! Java file discovery using the `ignore` crate.
//!
//! Walks a directory tree with gitignore support, a custom `.jdiffignore`
//! file and extra override patterns, and returns the `*.java` files found
//! with their size, line count and xxh3 content hash.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::{CompareError, Result};

/// Name of the per-directory ignore file.
pub const IGNORE_FILENAME: &str = ".jdiffignore";

/// Options controlling a scan.
#[derive(Clone, Debug, Default)]
pub struct ScanOptions {
    /// Descend into subdirectories.
    pub recurse: bool,
    /// Additional gitignore-style patterns to exclude.
    pub ignore_patterns: Vec<String>,
    pub follow_symlinks: bool,
}

/// Information about a scanned file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedFile {
    /// Path relative to the scan root, `/`-separated.
    pub path: String,

    pub size_bytes: u64,

    /// xxHash3 of the file content.
    pub hash: u64,

    /// Number of lines in the file.
    pub lines: u32,

    /// Why the file could not be read. Unreadable files stay in the listing
    /// so that a directory comparison reports them instead of pairing around
    /// them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScannedFile {
    pub fn is_readable(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of scanning a directory.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScanResult {
    /// Discovered files sorted by path.
    pub files: Vec<ScannedFile>,

    /// Number of files listed with a read error.
    pub error_count: usize,

    /// Time taken for the scan in milliseconds.
    pub duration_ms: f64,
}

impl ScanResult {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// xxHash3 of a file's content, used to skip identical files.
pub fn content_hash(content: &[u8]) -> u64 {
    xxh3_64(content)
}

/// Count lines efficiently; a last line without a newline still counts.
pub fn count_lines(content: &[u8]) -> u32 {
    let newlines = bytecount::count(content, b'\n');
    let unterminated = !content.is_empty() && !content.ends_with(b"\n");
    (newlines + usize::from(unterminated)) as u32
}

fn is_java_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("java"))
}

/// Scan `root` for Java source files.
pub fn scan_java_files(root: &Path, options: &ScanOptions) -> Result<ScanResult> {
    let start = Instant::now();

    if !root.is_dir() {
        return Err(CompareError::Scan(format!(
            "Not a directory: {}",
            root.display()
        )));
    }

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .require_git(false)
        .follow_links(options.follow_symlinks)
        .add_custom_ignore_filename(IGNORE_FILENAME);
    if !options.recurse {
        builder.max_depth(Some(1));
    }

    if !options.ignore_patterns.is_empty() {
        let mut override_builder = OverrideBuilder::new(root);
        for pattern in &options.ignore_patterns {
            // `!` turns an override glob into an exclusion
            if let Err(e) = override_builder.add(&format!("!{}", pattern)) {
                tracing::warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }
        match override_builder.build() {
            Ok(overrides) => {
                builder.overrides(overrides);
            }
            Err(e) => tracing::warn!("Ignoring override patterns: {}", e),
        }
    }

    let paths: Vec<PathBuf> = builder
        .build()
        .filter_map(|entry| entry.ok())
        // Symlinks are kept whether or not they are followed; a dangling one
        // shows up as a read error below.
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file() || ft.is_symlink()))
        .map(|entry| entry.into_path())
        .filter(|path| is_java_file(path))
        .collect();

    let errors = AtomicUsize::new(0);
    let mut files: Vec<ScannedFile> = paths
        .par_iter()
        .map(|path| match fs::read(path) {
            Ok(content) => ScannedFile {
                path: relative_path(root, path),
                size_bytes: content.len() as u64,
                hash: content_hash(&content),
                lines: count_lines(&content),
                error: None,
            },
            Err(e) => {
                tracing::debug!("Failed to read {}: {}", path.display(), e);
                errors.fetch_add(1, Ordering::Relaxed);
                ScannedFile {
                    path: relative_path(root, path),
                    size_bytes: 0,
                    hash: 0,
                    lines: 0,
                    error: Some(CompareError::io(path, e).to_string()),
                }
            }
        })
        .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));

    tracing::debug!(
        "Scanned {} Java files ({} lines) under {} in {:.1}ms",
        files.len(),
        files.iter().map(|f| u64::from(f.lines)).sum::<u64>(),
        root.display(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(ScanResult {
        files,
        error_count: errors.load(Ordering::Relaxed),
        duration_ms: start.elapsed().as_secs_f64() * 1000.0,
    })
}

fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
