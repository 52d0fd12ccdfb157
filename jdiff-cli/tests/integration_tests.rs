//! Integration tests for the jdiff CLI
//!
//! Drives the built binary against Java sources in temporary directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// Get the path to the jdiff binary (built by cargo)
fn jdiff_binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_jdiff"))
}

/// Run jdiff with the given args in the specified directory
fn run_jdiff(dir: &Path, args: &[&str]) -> Output {
    jdiff_binary()
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute jdiff command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn write_java(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create directory");
    }
    fs::write(&path, content).expect("Failed to write Java file");
    path
}

const ORIGINAL: &str = "\
package org.example;

public class Greeter {
    private String name;

    public String greet() {
        return \"Hello, \" + name;
    }
}
";

/// Same as ORIGINAL apart from whitespace and a comment.
const REFORMATTED: &str = "\
package org.example;

// greets people
public class Greeter
{
    private String   name;

    public String greet()
    {
        return \"Hello, \" +
            name;
    }
}
";

const WITH_FAREWELL: &str = "\
package org.example;

public class Greeter {
    private String name;

    public String greet() {
        return \"Hello, \" + name;
    }

    public String farewell() {
        return \"Bye\";
    }
}
";

fn setup_pair(dir: &Path, to: &str) {
    write_java(dir, "from/Greeter.java", ORIGINAL);
    write_java(dir, "to/Greeter.java", to);
}

// ============================================================================
// Exit status and output
// ============================================================================

#[test]
fn test_identical_structure_exits_zero() {
    let temp = TempDir::new().unwrap();
    setup_pair(temp.path(), REFORMATTED);

    let output = run_jdiff(temp.path(), &["from/Greeter.java", "to/Greeter.java"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_method_added_exits_one() {
    let temp = TempDir::new().unwrap();
    setup_pair(temp.path(), WITH_FAREWELL);

    let output = run_jdiff(temp.path(), &["from/Greeter.java", "to/Greeter.java"]);
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.starts_with("from/Greeter.java <=> to/Greeter.java\n"), "{}", out);
    assert!(out.contains("method added: farewell()"), "{}", out);
    assert!(out.contains("> "), "{}", out);
}

#[test]
fn test_brief_output() {
    let temp = TempDir::new().unwrap();
    setup_pair(temp.path(), WITH_FAREWELL);

    let output = run_jdiff(temp.path(), &["--brief", "from/Greeter.java", "to/Greeter.java"]);
    assert_eq!(output.status.code(), Some(1));

    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2, "{}", out);
    assert!(lines[1].ends_with(": method added: farewell()"), "{}", out);
    assert!(lines[1].contains('a'));
}

#[test]
fn test_context_output() {
    let temp = TempDir::new().unwrap();
    setup_pair(temp.path(), WITH_FAREWELL);

    let output = run_jdiff(
        temp.path(),
        &["--brief", "--context", "from/Greeter.java", "to/Greeter.java"],
    );
    assert_eq!(output.status.code(), Some(1));

    let out = stdout(&output);
    assert!(out.contains("+ "), "{}", out);
    assert!(out.lines().any(|l| l.starts_with("  ")), "{}", out);
}

#[test]
fn test_json_output() {
    let temp = TempDir::new().unwrap();
    setup_pair(temp.path(), WITH_FAREWELL);

    let output = run_jdiff(
        temp.path(),
        &["--format", "json", "from/Greeter.java", "to/Greeter.java"],
    );
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    let file = &value["files"][0];
    assert_eq!(file["status"], "compared");
    assert_eq!(file["differences"][0]["kind"], "Add");
    assert_eq!(file["differences"][0]["message"], "method added: farewell()");
}

#[test]
fn test_labels_replace_paths() {
    let temp = TempDir::new().unwrap();
    setup_pair(temp.path(), WITH_FAREWELL);

    let output = run_jdiff(
        temp.path(),
        &[
            "-u",
            "-L",
            "Greeter.java (r1)",
            "-L",
            "Greeter.java (r2)",
            "from/Greeter.java",
            "to/Greeter.java",
        ],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("Greeter.java (r1) <=> Greeter.java (r2)\n"));
}

#[test]
fn test_parse_failure_exits_two() {
    let temp = TempDir::new().unwrap();
    write_java(temp.path(), "from/Broken.java", "public class Broken {\n    void f( {\n}\n");
    write_java(temp.path(), "to/Broken.java", "public class Broken {}\n");

    let output = run_jdiff(temp.path(), &["from/Broken.java", "to/Broken.java"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Parse error"), "{}", stderr(&output));
}

#[test]
fn test_identical_malformed_files_exit_two() {
    let temp = TempDir::new().unwrap();
    let broken = "public class Broken {\n    void f( {\n}\n";
    write_java(temp.path(), "from/Broken.java", broken);
    write_java(temp.path(), "to/Broken.java", broken);

    let output = run_jdiff(temp.path(), &["from/Broken.java", "to/Broken.java"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Parse error"), "{}", stderr(&output));
}

#[test]
fn test_missing_file_exits_two() {
    let temp = TempDir::new().unwrap();
    write_java(temp.path(), "from/Greeter.java", ORIGINAL);

    let output = run_jdiff(temp.path(), &["from/Greeter.java", "to/Greeter.java"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_invalid_version_exits_two() {
    let temp = TempDir::new().unwrap();
    setup_pair(temp.path(), ORIGINAL);

    let output = run_jdiff(
        temp.path(),
        &["--source", "banana", "from/Greeter.java", "to/Greeter.java"],
    );
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("banana"));
}

#[test]
fn test_one_name_exits_two() {
    let temp = TempDir::new().unwrap();
    setup_pair(temp.path(), ORIGINAL);

    let output = run_jdiff(temp.path(), &["from/Greeter.java"]);
    assert_eq!(output.status.code(), Some(2));
}

// ============================================================================
// Directories
// ============================================================================

#[test]
fn test_directory_comparison() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    write_java(dir, "a/X.java", "class X { void f() {} }\n");
    write_java(dir, "b/X.java", "class X { void f() {} void g() {} }\n");
    write_java(dir, "a/Y.java", "class Y {}\n");
    write_java(dir, "b/Z.java", "class Z {}\n");
    write_java(dir, "a/Same.java", "class Same {}\n");
    write_java(dir, "b/Same.java", "class Same {}\n");

    let output = run_jdiff(dir, &["--brief", "a", "b"]);
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("method added: g()"), "{}", out);
    assert!(out.contains("file removed: Y.java"), "{}", out);
    assert!(out.contains("file added: Z.java"), "{}", out);
    assert!(!out.contains("Same.java"), "{}", out);
}

#[test]
fn test_directory_recursion_flag() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    write_java(dir, "a/pkg/X.java", "class X {}\n");
    write_java(dir, "b/pkg/X.java", "class X { int n; }\n");

    let shallow = run_jdiff(dir, &["a", "b"]);
    assert_eq!(shallow.status.code(), Some(0));

    let deep = run_jdiff(dir, &["-r", "--brief", "a", "b"]);
    assert_eq!(deep.status.code(), Some(1));
    assert!(stdout(&deep).contains("field added: n"), "{}", stdout(&deep));
}

#[test]
fn test_file_against_directory() {
    let temp = TempDir::new().unwrap();
    setup_pair(temp.path(), WITH_FAREWELL);

    let output = run_jdiff(temp.path(), &["from/Greeter.java", "to"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("method added: farewell()"));
}

// ============================================================================
// Configuration and misc
// ============================================================================

#[test]
fn test_config_file_sets_format() {
    let temp = TempDir::new().unwrap();
    setup_pair(temp.path(), WITH_FAREWELL);
    fs::write(temp.path().join(".jdiffrc.toml"), "[output]\nformat = \"json\"\n").unwrap();

    let output = run_jdiff(temp.path(), &["from/Greeter.java", "to/Greeter.java"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(serde_json::from_str::<serde_json::Value>(&stdout(&output)).is_ok());
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    for flag in ["-v", "--version"] {
        let output = run_jdiff(temp.path(), &[flag]);
        assert_eq!(output.status.code(), Some(0));
        assert!(stdout(&output).starts_with("jdiff, version "));
    }
}

#[test]
fn test_help_flag() {
    let temp = TempDir::new().unwrap();
    let output = run_jdiff(temp.path(), &["--help"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("--brief"));
    assert!(out.contains("--from-source"));
}
