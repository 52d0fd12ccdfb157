//! jdiff - structural comparison of Java source files
//!
//! Compares two Java files, or two directory trees of Java files, by their
//! declarations rather than their lines, and reports what was added,
//! removed or changed in a diff-like format.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, CommandFactory, Parser};
use jdiff_core::{DirectoryComparison, ExportConfig, Processor, ProcessorConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod options;
mod output;

use config::JdiffConfig;
use options::Options;
use output::OutputFormat;

/// Exit status when the sources are equivalent.
const EXIT_EQUAL: i32 = 0;
/// Exit status when differences were found.
const EXIT_DIFFERENT: i32 = 1;
/// Exit status when a comparison could not be made.
const EXIT_FAILURE: i32 = 2;

/// Compare Java source files by structure.
///
/// jdiff matches packages, imports, types, methods, constructors, fields
/// and initializers between two versions of a file and reports each
/// addition, removal and change, ignoring whitespace and comments.
#[derive(Parser)]
#[command(name = "jdiff")]
#[command(author)]
#[command(about = "Compare Java source files by structure")]
#[command(disable_version_flag = true)]
#[command(next_help_heading = "Options")]
#[command(after_help = "Examples:
  jdiff Old.java New.java          Compare two files
  jdiff -r old/ new/               Compare two source trees
  jdiff --context Old.java New.java
  jdiff -u -L Old.java -L New.java a.java b.java
                                   Use as an external diff command

Exit status is 0 if the sources are equivalent, 1 if they differ, 2 on failure.")]
pub struct Cli {
    /// The two files or directories to compare
    #[arg(value_name = "NAME")]
    names: Vec<PathBuf>,

    /// Display output in brief form
    #[arg(long)]
    brief: bool,

    /// Show context around each difference (implies --highlight)
    #[arg(long)]
    context: bool,

    /// Use colors for the differing span (context output only)
    #[arg(long)]
    highlight: bool,

    /// Process directories recursively
    #[arg(short, long)]
    recurse: bool,

    /// Java source version of the from-file(s)
    #[arg(long, value_name = "VERSION")]
    from_source: Option<String>,

    /// Java source version of the to-file(s)
    #[arg(long, value_name = "VERSION")]
    to_source: Option<String>,

    /// Java source version of all files
    #[arg(long, value_name = "VERSION")]
    source: Option<String>,

    /// Display name of the first file, then of the second
    #[arg(short = 'L', long = "name", value_name = "NAME", action = ArgAction::Append)]
    labels: Vec<String>,

    /// Unified format (accepted for diff-command compatibility, ignored)
    #[arg(short = 'u')]
    unified: bool,

    /// Display the version
    #[arg(short = 'v', long)]
    version: bool,

    /// Enable verbose output (debug logging)
    #[arg(long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

/// Print version information
fn print_version() {
    use colored::Colorize;

    let version = env!("CARGO_PKG_VERSION");
    let platform = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    println!("jdiff, version {}", version);
    println!("  {:<12} {}", "jdiff-cli:".cyan(), version);
    println!("  {:<12} {}", "jdiff-core:".cyan(), version);
    println!("  {:<12} {}", "Platform:".cyan(), platform);
}

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("jdiff: {:#}", e);
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}

fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();

    if cli.version {
        print_version();
        return Ok(EXIT_EQUAL);
    }

    setup_logging(cli.verbose, cli.quiet);

    if cli.names.is_empty() {
        let _ = Cli::command().print_help();
        println!();
        return Ok(EXIT_FAILURE);
    }

    // Load configuration from .jdiffrc.toml
    let config = JdiffConfig::load(Path::new("."));

    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or_default()
    });

    if let Some(use_color) = config.use_color() {
        colored::control::set_override(use_color);
    }

    if cli.unified {
        tracing::debug!("Ignoring -u");
    }

    let opts = Options::default()
        .with_display(cli.brief, cli.context, cli.highlight)
        .with_versions(
            cli.from_source.as_deref(),
            cli.to_source.as_deref(),
            cli.source.as_deref(),
            (config.from_version(), config.to_version()),
        )?
        .with_names(&cli.labels);
    tracing::debug!("Options: {:?}", opts);

    let processor = Processor::new(ProcessorConfig {
        rules: opts.rules(),
        recurse: cli.recurse,
        threads: config.threads(),
        ignore_patterns: config.ignore_patterns().to_vec(),
    });

    let mut result = processor
        .process_names(&cli.names)
        .context("Comparison failed")?;
    apply_labels(&mut result, &opts);

    let export_config = ExportConfig {
        style: opts.output_style(),
        highlight: opts.highlight,
        context_lines: config.context_lines().unwrap_or(ExportConfig::default().context_lines),
        ..Default::default()
    };

    print!("{}", output::render(&result, format, &export_config)?);
    for line in output::failure_lines(&result) {
        eprintln!("jdiff: {}", line);
    }

    Ok(exit_code(&result))
}

/// `-L` names replace the displayed paths of a single file pair.
fn apply_labels(result: &mut DirectoryComparison, opts: &Options) {
    if let [file] = result.files.as_mut_slice() {
        if let Some(name) = &opts.first_file_name {
            file.from_path = name.clone();
        }
        if let Some(name) = &opts.second_file_name {
            file.to_path = name.clone();
        }
    }
}

fn exit_code(result: &DirectoryComparison) -> i32 {
    if result.has_failures() || result.cancelled {
        EXIT_FAILURE
    } else if result.difference_count() > 0 {
        EXIT_DIFFERENT
    } else {
        EXIT_EQUAL
    }
}
