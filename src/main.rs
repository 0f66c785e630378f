//! use-groups: Group, merge and order `use` declarations in Rust sources.
//!
//! Walks the given paths for `.rs` files, discovers workspace crate names from
//! `Cargo.toml` manifests, and rewrites each file's leading import block into
//! three blank-line separated groups with sibling imports merged.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use use_groups::batch::{self, BatchResult, FileOutcome, FileReport, Hunk, Mode};
use use_groups::cli::{Args, ClassifyArgs, Commands, ScanArgs};
use use_groups::{Classifier, WorkspaceRegistry, scanner};

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    match args.command {
        Commands::Check {
            scan,
            classify,
            diff,
            json,
        } => cmd_check(&scan, &classify, diff, json),
        Commands::Apply {
            interactive,
            no_fmt,
            scan,
            classify,
            json,
        } => cmd_apply(&scan, &classify, interactive, no_fmt, json),
        Commands::Registry {
            scan,
            internal,
            json,
        } => cmd_registry(&scan, &internal, json),
        Commands::Scan { scan } => cmd_scan(&scan),
    }
}

fn cmd_check(scan: &ScanArgs, classify: &ClassifyArgs, diff: bool, json: bool) -> Result<()> {
    let result = run_batch(scan, classify, Mode::Check)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for report in &result.files {
            print_report(report, "Would update:");
            if diff && let Some(hunk) = &report.hunk {
                print_hunk(hunk);
            }
        }
        print_summary(&result);
    }

    if result.has_changes() {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_apply(
    scan: &ScanArgs,
    classify: &ClassifyArgs,
    interactive: bool,
    no_fmt: bool,
    json: bool,
) -> Result<()> {
    let mode = if interactive {
        Mode::Interactive
    } else {
        Mode::Write
    };
    let result = run_batch(scan, classify, mode)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for report in &result.files {
            print_report(report, "Updated:");
        }
        print_summary(&result);
    }

    if result.has_changes() && !no_fmt {
        for dir in format_roots(&scan.roots()) {
            debug!("Running cargo fmt in {}", dir.display());
            if let Err(err) = batch::run_cargo_fmt(&dir) {
                warn!("{:#}", err);
            }
        }
    }

    Ok(())
}

fn cmd_registry(scan: &ScanArgs, internal: &[String], json: bool) -> Result<()> {
    let mut registry = WorkspaceRegistry::discover(&scan.roots(), &scan.options()?)?;
    registry.extend(internal);

    if json {
        println!("{}", serde_json::to_string_pretty(&registry)?);
        return Ok(());
    }

    if registry.is_empty() {
        println!("{} No workspace crates found", "info:".blue().bold());
        return Ok(());
    }
    println!("{} workspace crate(s):", registry.len());
    for name in registry.names() {
        println!("  {}", name);
    }
    Ok(())
}

fn cmd_scan(scan: &ScanArgs) -> Result<()> {
    let files = scanner::collect_rust_files(&scan.roots(), &scan.options()?)?;

    println!("Would scan {} files:", files.len());
    for file in files {
        println!("  {}", file.display());
    }

    Ok(())
}

/// Collects files, builds the registry once and runs the batch.
fn run_batch(scan: &ScanArgs, classify: &ClassifyArgs, mode: Mode) -> Result<BatchResult> {
    let roots = scan.roots();
    let options = scan.options()?;

    let files = scanner::collect_rust_files(&roots, &options)?;
    let mut registry = WorkspaceRegistry::discover(&roots, &options)?;
    registry.extend(&classify.internal);

    let classifier = Classifier::new(&registry).with_utility_crates(&classify.utility);
    debug!(
        "Scanning {} files with {} workspace crates",
        files.len(),
        classifier.registry().len()
    );

    batch::run(&files, &classifier, mode)
}

/// Directories to format: each root, or the parent of a root given as a file.
fn format_roots(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = roots
        .iter()
        .map(|root| {
            if root.is_file() {
                root.parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."))
            } else {
                root.clone()
            }
        })
        .collect();
    dirs.dedup();
    dirs
}

fn print_report(report: &FileReport, changed_label: &str) {
    let path = report.path.display();
    match &report.outcome {
        FileOutcome::Changed => println!("{} {}", changed_label.yellow().bold(), path),
        FileOutcome::Declined => println!("{} {}", "Declined:".dimmed(), path),
        FileOutcome::Skipped { reason } => println!(
            "{} {} {}",
            "warn:".yellow().bold(),
            path,
            format!("({})", reason).dimmed()
        ),
        FileOutcome::Unchanged => {}
    }
}

fn print_hunk(hunk: &Hunk) {
    for line in batch::render_hunk(hunk) {
        let line = line.trim_end_matches(['\r', '\n']);
        let styled = match line.chars().next() {
            Some('-') => line.red(),
            Some('+') => line.green(),
            _ => line.cyan(),
        };
        println!("  {}", styled);
    }
}

fn print_summary(result: &BatchResult) {
    let d = &result.diagnostics;
    println!(
        "\n{} Files: {}, changed: {}, skipped: {}, declined: {}",
        "Summary:".bold(),
        d.files_scanned,
        d.files_changed,
        d.files_skipped,
        d.files_declined
    );

    if d.files_changed == 0 && d.files_skipped == 0 {
        println!("{} All import blocks are canonical", "ok:".green().bold());
    }
}
