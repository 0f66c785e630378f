//! Command-line interface definitions.
//!
//! Defines the argument parser and subcommands using clap's derive API.
//! Each subcommand corresponds to a distinct operation: checking import
//! blocks, rewriting them, inspecting the workspace registry, or listing scan
//! targets.

use crate::scanner::ScanOptions;
use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Group, merge and order `use` declarations across a Rust source tree.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Print additional diagnostics to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report files whose import blocks are not in canonical form.
    /// Exits with status 1 if any file would change.
    Check {
        #[command(flatten)]
        scan: ScanArgs,

        #[command(flatten)]
        classify: ClassifyArgs,

        /// Show the lines that would change in each file.
        #[arg(long)]
        diff: bool,

        /// Emit JSON instead of human-readable output.
        #[arg(long)]
        json: bool,
    },

    /// Rewrite import blocks in place.
    Apply {
        /// Interactively confirm each file's changes before writing.
        #[arg(short, long)]
        interactive: bool,

        /// Skip running `cargo fmt` after files were changed.
        #[arg(long)]
        no_fmt: bool,

        #[command(flatten)]
        scan: ScanArgs,

        #[command(flatten)]
        classify: ClassifyArgs,

        /// Emit JSON instead of human-readable output.
        #[arg(long)]
        json: bool,
    },

    /// Print the crate names treated as workspace-owned.
    Registry {
        #[command(flatten)]
        scan: ScanArgs,

        /// Extra crate names to treat as workspace-owned.
        #[arg(long, value_delimiter = ',')]
        internal: Vec<String>,

        /// Emit JSON instead of a plain list.
        #[arg(long)]
        json: bool,
    },

    /// List files that would be processed without touching them.
    Scan {
        #[command(flatten)]
        scan: ScanArgs,
    },
}

/// Where to look for sources and manifests.
#[derive(Debug, Clone, ClapArgs)]
pub struct ScanArgs {
    /// Paths to scan. Defaults to current directory.
    #[arg(short, long)]
    pub paths: Option<Vec<PathBuf>>,

    /// Glob patterns for directories/files to exclude (e.g., "generated", "*_pb.rs").
    /// By default, hidden entries and `target` directories are excluded.
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Disable default exclusion of hidden entries and `target` directories.
    #[arg(long)]
    pub no_default_excludes: bool,
}

impl ScanArgs {
    pub fn roots(&self) -> Vec<PathBuf> {
        self.paths
            .clone()
            .unwrap_or_else(|| vec![PathBuf::from(".")])
    }

    pub fn options(&self) -> Result<ScanOptions> {
        ScanOptions::new(&self.exclude, !self.no_default_excludes)
    }
}

/// Adjustments to how import paths are grouped.
#[derive(Debug, Clone, ClapArgs)]
pub struct ClassifyArgs {
    /// Extra crates to place in the first group alongside `std`.
    #[arg(long, value_delimiter = ',')]
    pub utility: Vec<String>,

    /// Extra crate names to treat as workspace-owned.
    #[arg(long, value_delimiter = ',')]
    pub internal: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_check_with_shared_flags() {
        let args = Args::parse_from([
            "use-groups",
            "check",
            "-p",
            "crates",
            "-e",
            "generated",
            "--utility",
            "clap,thiserror",
            "--internal",
            "xtask",
            "--diff",
            "-v",
        ]);
        assert!(args.verbose);
        let Commands::Check {
            scan,
            classify,
            diff,
            json,
        } = args.command
        else {
            panic!("expected check");
        };
        assert_eq!(scan.roots(), vec![PathBuf::from("crates")]);
        assert_eq!(scan.exclude, vec!["generated"]);
        assert_eq!(classify.utility, vec!["clap", "thiserror"]);
        assert_eq!(classify.internal, vec!["xtask"]);
        assert!(diff);
        assert!(!json);
    }

    #[test]
    fn scan_defaults_to_current_directory() {
        let args = Args::parse_from(["use-groups", "scan"]);
        let Commands::Scan { scan } = args.command else {
            panic!("expected scan");
        };
        assert_eq!(scan.roots(), vec![PathBuf::from(".")]);
        assert!(scan.options().is_ok());
    }

    #[test]
    fn invalid_exclude_pattern_is_rejected() {
        let args = Args::parse_from(["use-groups", "scan", "--exclude", "[unclosed"]);
        let Commands::Scan { scan } = args.command else {
            panic!("expected scan");
        };
        let err = scan.options().unwrap_err();
        assert!(err.to_string().contains("Invalid exclude pattern"));
    }

    #[test]
    fn apply_flags() {
        let args = Args::parse_from(["use-groups", "apply", "--interactive", "--no-fmt"]);
        assert!(matches!(
            args.command,
            Commands::Apply {
                interactive: true,
                no_fmt: true,
                json: false,
                ..
            }
        ));
    }
}
