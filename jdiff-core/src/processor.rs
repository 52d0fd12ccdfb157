//! Comparison driver for file pairs, directory pairs and name lists.
//!
//! Each file pair is compared on its own with no shared mutable state, so a
//! directory comparison runs its pairs on the rayon pool and concatenates the
//! results in traversal order. Cancellation is checked between file pairs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::differ::{compare_units, Difference, DirectoryComparison, FileComparison, Report};
use crate::differ::messages;
use crate::error::{CompareError, Result};
use crate::location::{Location, LocationRange};
use crate::parser::helpers::end_of_source;
use crate::parser::parse_source;
use crate::scanner::{scan_java_files, ScanOptions, ScannedFile};
use crate::types::Declaration;
use crate::version::ComparisonRules;

/// Configuration threaded into a [`Processor`] at construction.
#[derive(Clone, Debug, Default)]
pub struct ProcessorConfig {
    pub rules: ComparisonRules,
    /// Descend into subdirectories when comparing directories.
    pub recurse: bool,
    /// Worker threads for directory comparison; rayon's default when `None`.
    pub threads: Option<usize>,
    /// Extra ignore patterns applied when scanning directories.
    pub ignore_patterns: Vec<String>,
}

/// One unit of directory work, in traversal order.
enum Task<'a> {
    Pair(&'a ScannedFile, &'a ScannedFile),
    Removed(&'a ScannedFile),
    Added(&'a ScannedFile),
}

/// Runs comparisons.
pub struct Processor {
    config: ProcessorConfig,
    cancelled: Arc<AtomicBool>,
}

impl Processor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Flag that stops a directory comparison before its next file pair.
    pub fn cancellation_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Compare two already parsed roots as one top-level pairing.
    pub fn process(&self, from_root: &Declaration, to_root: &Declaration) -> Result<Report> {
        compare_units(from_root, to_root, &self.config.rules)
    }

    /// Compare two sources held in memory.
    ///
    /// Parse failures and invariant violations become a failed outcome
    /// rather than a partial report.
    pub fn process_sources(
        &self,
        from_name: &str,
        from_source: String,
        to_name: &str,
        to_source: String,
    ) -> FileComparison {
        let outcome = parse_source(&from_source, from_name).and_then(|from_root| {
            // Identical text needs no second parse once the first one succeeded.
            if from_source == to_source {
                tracing::debug!("{} and {} are identical", from_name, to_name);
                return Ok(Report::new());
            }
            let to_root = parse_source(&to_source, to_name)?;
            self.process(&from_root, &to_root)
        });

        match outcome {
            Ok(report) => {
                tracing::debug!(
                    "{} differences between {} and {}",
                    report.count(),
                    from_name,
                    to_name
                );
                FileComparison::compared(from_name, to_name, from_source, to_source, report)
            }
            Err(e) => {
                if e.is_invariant_violation() {
                    tracing::error!("Comparing {} to {}: {}", from_name, to_name, e);
                }
                FileComparison::failed(from_name, to_name, e.to_string())
            }
        }
    }

    /// Read and compare two files.
    pub fn process_files(&self, from: &Path, to: &Path) -> FileComparison {
        let (from_name, to_name) = (display(from), display(to));
        let sources = read_source(from).and_then(|f| Ok((f, read_source(to)?)));
        match sources {
            Ok((from_source, to_source)) => {
                self.process_sources(&from_name, from_source, &to_name, to_source)
            }
            Err(e) => FileComparison::failed(from_name, to_name, e.to_string()),
        }
    }

    /// Compare two directory trees file by file.
    ///
    /// Files are paired by relative path. Results list from-side paths in
    /// sorted order (compared or removed), then to-only paths (added).
    pub fn process_directories(&self, from_dir: &Path, to_dir: &Path) -> Result<DirectoryComparison> {
        let options = ScanOptions {
            recurse: self.config.recurse,
            ignore_patterns: self.config.ignore_patterns.clone(),
            follow_symlinks: false,
        };
        let from_files = scan_java_files(from_dir, &options)?;
        let to_files = scan_java_files(to_dir, &options)?;

        let to_by_path: BTreeMap<&str, &ScannedFile> =
            to_files.files.iter().map(|f| (f.path.as_str(), f)).collect();
        let from_by_path: BTreeMap<&str, &ScannedFile> =
            from_files.files.iter().map(|f| (f.path.as_str(), f)).collect();

        let mut tasks: Vec<Task> = from_files
            .files
            .iter()
            .map(|f| match to_by_path.get(f.path.as_str()) {
                Some(to) => Task::Pair(f, to),
                None => Task::Removed(f),
            })
            .collect();
        tasks.extend(
            to_files
                .files
                .iter()
                .filter(|f| !from_by_path.contains_key(f.path.as_str()))
                .map(Task::Added),
        );

        let unchanged = tasks
            .iter()
            .filter(|t| matches!(t, Task::Pair(from, to) if from.is_readable() && from.hash == to.hash))
            .count();
        tracing::debug!(
            "Comparing {} with {}: {} file tasks, {} with identical content, {} unreadable",
            from_dir.display(),
            to_dir.display(),
            tasks.len(),
            unchanged,
            from_files.error_count + to_files.error_count
        );

        let run = |task: &Task| -> Option<FileComparison> {
            if self.is_cancelled() {
                return None;
            }
            Some(match *task {
                Task::Pair(from, to) => {
                    let (from_path, to_path) = (from_dir.join(&from.path), to_dir.join(&to.path));
                    match from.error.as_ref().or(to.error.as_ref()) {
                        Some(error) => FileComparison::failed(display(&from_path), display(&to_path), error.clone()),
                        None => self.process_files(&from_path, &to_path),
                    }
                }
                Task::Removed(file) => one_sided(from_dir, to_dir, file, false),
                Task::Added(file) => one_sided(from_dir, to_dir, file, true),
            })
        };

        let pool = match self.config.threads {
            Some(n) if n > 0 => rayon::ThreadPoolBuilder::new().num_threads(n).build().ok(),
            _ => None,
        };
        let results: Vec<Option<FileComparison>> = match pool {
            Some(pool) => pool.install(|| tasks.par_iter().map(run).collect()),
            None => tasks.par_iter().map(run).collect(),
        };

        let cancelled = results.iter().any(Option::is_none);
        if cancelled {
            tracing::warn!("Directory comparison cancelled");
        }
        Ok(DirectoryComparison {
            files: results.into_iter().flatten().collect(),
            cancelled,
        })
    }

    /// Compare two names: file and file, directory and directory, or a file
    /// and a directory (the file is compared with the same-named file in the
    /// directory).
    pub fn process_names(&self, names: &[PathBuf]) -> Result<DirectoryComparison> {
        let [from, to] = names else {
            return Err(CompareError::Usage(format!(
                "expected two files or directories, got {}",
                names.len()
            )));
        };

        let single = |comparison: FileComparison| DirectoryComparison {
            files: vec![comparison],
            cancelled: false,
        };

        match (from.is_dir(), to.is_dir()) {
            (true, true) => self.process_directories(from, to),
            (false, false) => Ok(single(self.process_files(from, to))),
            (true, false) => {
                let inner = from.join(file_name(to)?);
                Ok(single(self.process_files(&inner, to)))
            }
            (false, true) => {
                let inner = to.join(file_name(from)?);
                Ok(single(self.process_files(from, &inner)))
            }
        }
    }
}

fn file_name(path: &Path) -> Result<&std::ffi::OsStr> {
    path.file_name()
        .ok_or_else(|| CompareError::Usage(format!("no file name in {}", path.display())))
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| CompareError::io(path, e))
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn one_sided(from_dir: &Path, to_dir: &Path, file: &ScannedFile, added: bool) -> FileComparison {
    let (from, to) = (from_dir.join(&file.path), to_dir.join(&file.path));
    match &file.error {
        Some(error) => FileComparison::failed(display(&from), display(&to), error.clone()),
        None => whole_file(&from, &to, &file.path, added),
    }
}

/// Comparison of a file present on one side only: one whole-file difference.
fn whole_file(from: &Path, to: &Path, rel: &str, added: bool) -> FileComparison {
    let present = if added { to } else { from };
    let source = match read_source(present) {
        Ok(source) => source,
        Err(e) => return FileComparison::failed(display(from), display(to), e.to_string()),
    };

    let start = Location::start_of_file();
    let span = LocationRange::new(start, end_of_source(&source)).unwrap_or(LocationRange::point(start));
    let absent = LocationRange::point(start);

    let mut report = Report::new();
    let (from_source, to_source) = if added {
        report.append(Difference::added(
            messages::format(messages::FILE_ADDED, &[rel]),
            absent,
            span,
        ));
        (String::new(), source)
    } else {
        report.append(Difference::deleted(
            messages::format(messages::FILE_REMOVED, &[rel]),
            span,
            absent,
        ));
        (source, String::new())
    };
    FileComparison::compared(display(from), display(to), from_source, to_source, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::differ::DiffKind;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        File::create(path).unwrap().write_all(content.as_bytes()).unwrap();
    }

    fn processor() -> Processor {
        Processor::new(ProcessorConfig::default())
    }

    #[test]
    fn test_directory_pair() {
        let d0 = TempDir::new().unwrap();
        let d1 = TempDir::new().unwrap();
        write(d0.path(), "X.java", "class X {\n    int a;\n}\n");
        write(d0.path(), "Y.java", "class Y {\n}\n");
        write(d1.path(), "X.java", "class X {\n    long a;\n}\n");
        write(d1.path(), "Z.java", "class Z {}\n");

        let result = processor().process_directories(d0.path(), d1.path()).unwrap();
        assert!(!result.cancelled);
        assert_eq!(result.files.len(), 3);

        let merged = result.merged();
        let messages: Vec<&str> = merged.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "variable type for a changed from int to long",
                "file removed: Y.java",
                "file added: Z.java",
            ]
        );

        let removed = &merged.all()[1];
        assert_eq!(removed.kind, DiffKind::Delete);
        assert_eq!(removed.first.start(), Location::new(1, 1));
        assert_eq!(removed.first.end(), Location::new(2, 1));
        assert!(removed.second.is_point());

        let added = &merged.all()[2];
        assert_eq!(added.kind, DiffKind::Add);
        assert!(added.first.is_point());
        assert_eq!(added.second.end(), Location::new(1, 10));
    }

    #[test]
    fn test_identical_sources_short_circuit() {
        let source = "class A { void f() { g(); } }".to_string();
        let result = processor().process_sources("a/A.java", source.clone(), "b/A.java", source);
        assert_eq!(result.report().map(Report::count), Some(0));
    }

    #[test]
    fn test_identical_malformed_sources_fail() {
        let source = "class A { void f( { }".to_string();
        let result = processor().process_sources("a/A.java", source.clone(), "b/A.java", source);
        assert!(result.report().is_none());
        assert!(result.error().unwrap().starts_with("Parse error in a/A.java"));
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_pair_through_symlink() {
        let d0 = TempDir::new().unwrap();
        let d1 = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        write(elsewhere.path(), "X.java", "class X { int a; }\n");
        std::os::unix::fs::symlink(elsewhere.path().join("X.java"), d0.path().join("X.java")).unwrap();
        write(d1.path(), "X.java", "class X { long a; }\n");

        let result = processor().process_directories(d0.path(), d1.path()).unwrap();
        let merged = result.merged();
        let messages: Vec<&str> = merged.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["variable type for a changed from int to long"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_fails_its_pair() {
        let d0 = TempDir::new().unwrap();
        let d1 = TempDir::new().unwrap();
        std::os::unix::fs::symlink(d0.path().join("Missing.java"), d0.path().join("X.java")).unwrap();
        write(d1.path(), "X.java", "class X {}\n");

        let result = processor().process_directories(d0.path(), d1.path()).unwrap();
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.difference_count(), 0);
        assert!(result.has_failures());
        assert!(result.files[0].error().unwrap().contains("X.java"));
    }

    #[test]
    fn test_parse_failure_is_reported_as_failure() {
        let result = processor().process_sources(
            "a/A.java",
            "class A {".to_string(),
            "b/A.java",
            "class A {}".to_string(),
        );
        assert!(result.report().is_none());
        assert!(result.error().unwrap().contains("a/A.java"));
    }

    #[test]
    fn test_empty_files_are_equal() {
        let d0 = TempDir::new().unwrap();
        write(d0.path(), "a/E.java", "");
        write(d0.path(), "b/E.java", "\n");
        let result = processor().process_files(&d0.path().join("a/E.java"), &d0.path().join("b/E.java"));
        assert_eq!(result.report().map(Report::count), Some(0));
    }

    #[test]
    fn test_names_file_and_directory() {
        let d0 = TempDir::new().unwrap();
        write(d0.path(), "old/T.java", "class T { void a() {} }\n");
        write(d0.path(), "new/T.java", "class T { void a() {} void b() {} }\n");

        let names = vec![d0.path().join("old/T.java"), d0.path().join("new")];
        let result = processor().process_names(&names).unwrap();
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.difference_count(), 1);
        assert!(result.files[0].to_path.ends_with("T.java"));

        let names = vec![d0.path().join("old"), d0.path().join("new/T.java")];
        let result = processor().process_names(&names).unwrap();
        assert_eq!(result.difference_count(), 1);
    }

    #[test]
    fn test_names_require_two() {
        let err = processor().process_names(&[PathBuf::from("A.java")]).unwrap_err();
        assert!(matches!(err, CompareError::Usage(_)));
    }

    #[test]
    fn test_missing_file_fails() {
        let d0 = TempDir::new().unwrap();
        write(d0.path(), "A.java", "class A {}");
        let result = processor().process_files(&d0.path().join("A.java"), &d0.path().join("Missing.java"));
        assert!(result.error().is_some());
    }

    #[test]
    fn test_recurse_controls_subdirectories() {
        let d0 = TempDir::new().unwrap();
        let d1 = TempDir::new().unwrap();
        write(d0.path(), "pkg/A.java", "class A {}");
        write(d1.path(), "pkg/A.java", "class A { int x; }");

        let flat = processor().process_directories(d0.path(), d1.path()).unwrap();
        assert!(flat.files.is_empty());

        let deep = Processor::new(ProcessorConfig {
            recurse: true,
            threads: Some(2),
            ..Default::default()
        })
        .process_directories(d0.path(), d1.path())
        .unwrap();
        assert_eq!(deep.difference_count(), 1);
    }

    #[test]
    fn test_cancelled_before_start() {
        let d0 = TempDir::new().unwrap();
        let d1 = TempDir::new().unwrap();
        write(d0.path(), "A.java", "class A {}");
        write(d1.path(), "A.java", "class A { int x; }");

        let processor = processor();
        processor.cancellation_flag().store(true, Ordering::Relaxed);
        let result = processor.process_directories(d0.path(), d1.path()).unwrap();
        assert!(result.cancelled);
        assert!(result.files.is_empty());
    }
}
