//! CLI argument parsing.
//!
//! Clap catches the obvious flag conflicts; `config::RunConfig::from_args`
//! re-checks them and does the path and version validation.
use crate::content::DEFAULT_COMMENT_PREFIX;
use crate::version::{Component, COMPONENT_MAX_LIMIT, DEFAULT_COMPONENT_MAX};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

pub const DEFAULT_EXTENSION: &str = ".cs";

fn component_max_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(0..=i64::from(COMPONENT_MAX_LIMIT))
}

/// Stamp `// Version: MAJOR.MINOR.BUILD.REVISION` markers into source files
/// whose content changed since the last run.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "verstamp",
    version,
    about = "Bump embedded version markers in source files whose content changed",
    after_help = "Examples:\n  verstamp --path src --extensions .cs,.ts\n  verstamp --path . --increment build\n  verstamp --path . --set-version 2.0.0.0\n  verstamp --path . --target src/Core.cs --target-version 3.1.0.0\n  verstamp --path . --set-minor 5 --dry-run"
)]
pub struct RootArgs {
    /// Directory to scan recursively
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub path: PathBuf,

    /// File extensions to track, each with a leading dot
    #[arg(
        long,
        value_name = "EXT",
        value_delimiter = ',',
        default_value = DEFAULT_EXTENSION
    )]
    pub extensions: Vec<String>,

    /// Ignore-pattern file (defaults to <path>/.versionignore when present)
    #[arg(long, value_name = "PATH")]
    pub ignore_file: Option<PathBuf>,

    /// Where to write the run report (defaults to <path>/version_report.txt)
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Directory holding hashes.json and history.json (defaults to <path>)
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Ceiling for the major component
    #[arg(long, value_name = "N", default_value_t = DEFAULT_COMPONENT_MAX, value_parser = component_max_parser())]
    pub max_major: u32,

    /// Ceiling for the minor component
    #[arg(long, value_name = "N", default_value_t = DEFAULT_COMPONENT_MAX, value_parser = component_max_parser())]
    pub max_minor: u32,

    /// Ceiling for the build component
    #[arg(long, value_name = "N", default_value_t = DEFAULT_COMPONENT_MAX, value_parser = component_max_parser())]
    pub max_build: u32,

    /// Ceiling for the revision component
    #[arg(long, value_name = "N", default_value_t = DEFAULT_COMPONENT_MAX, value_parser = component_max_parser())]
    pub max_revision: u32,

    /// Component bumped when content changes
    #[arg(long, value_enum, default_value_t = Component::Revision)]
    pub increment: Component,

    /// Force this version on every tracked file
    #[arg(
        long,
        value_name = "VERSION",
        conflicts_with_all = ["targets", "target_version", "set_major", "set_minor", "set_build", "set_revision"]
    )]
    pub set_version: Option<String>,

    /// Limit manual overrides to this file (repeatable)
    #[arg(long = "target", value_name = "FILE")]
    pub targets: Vec<PathBuf>,

    /// Version to force on the --target files
    #[arg(long, value_name = "VERSION", requires = "targets")]
    pub target_version: Option<String>,

    /// Force the major component
    #[arg(long, value_name = "N", conflicts_with = "target_version")]
    pub set_major: Option<u32>,

    /// Force the minor component
    #[arg(long, value_name = "N", conflicts_with = "target_version")]
    pub set_minor: Option<u32>,

    /// Force the build component
    #[arg(long, value_name = "N", conflicts_with = "target_version")]
    pub set_build: Option<u32>,

    /// Force the revision component
    #[arg(long, value_name = "N", conflicts_with = "target_version")]
    pub set_revision: Option<u32>,

    /// Comment syntax that introduces the marker line
    #[arg(long, value_name = "STR", default_value = DEFAULT_COMMENT_PREFIX)]
    pub comment_prefix: String,

    /// Report what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Exit non-zero when any file could not be processed
    #[arg(long)]
    pub strict: bool,

    /// Increase log detail (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
