//! Batch processing over collected files.
//!
//! Runs the rewriter over every file in order, writes or previews the result
//! depending on [`Mode`], and tallies the outcome of each file. Per-file
//! problems never stop the batch: they are recorded as skipped with a reason.

use crate::classifier::Classifier;
use crate::rewriter::{Rewrite, rewrite_file};
use anyhow::{Context, Result};
use dialoguer::Confirm;
use log::{debug, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What to do with files whose import block would change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Report only.
    Check,
    /// Write every change.
    Write,
    /// Ask before writing each file.
    Interactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Unchanged,
    /// Rewritten, or would be in check mode.
    Changed,
    /// Changed, but the user chose not to write it.
    Declined,
    Skipped { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
    /// Lines replaced by the rewrite, for previews.
    #[serde(skip)]
    pub hunk: Option<Hunk>,
}

/// The contiguous span of lines that differs between two versions of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// 1-indexed line where the span starts.
    pub line: usize,
    pub removed: Vec<String>,
    pub added: Vec<String>,
}

/// Summary statistics from a batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub files_declined: usize,
    pub files_skipped: usize,
}

/// Complete batch results. Unchanged files only appear in the counts.
#[derive(Debug, Serialize)]
pub struct BatchResult {
    pub files: Vec<FileReport>,
    pub diagnostics: Diagnostics,
}

impl BatchResult {
    pub fn changed(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|r| r.outcome == FileOutcome::Changed)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::Skipped { .. }))
    }

    pub fn has_changes(&self) -> bool {
        self.diagnostics.files_changed > 0
    }
}

/// Processes `files` in order.
///
/// Returns an error only when a file cannot be read or the confirmation
/// prompt fails; rewrite and write failures become [`FileOutcome::Skipped`].
pub fn run(files: &[PathBuf], classifier: &Classifier<'_>, mode: Mode) -> Result<BatchResult> {
    let mut reports = Vec::new();
    let mut diagnostics = Diagnostics {
        files_scanned: files.len(),
        ..Diagnostics::default()
    };

    for file in files {
        let (outcome, hunk) = match rewrite_file(file, classifier)? {
            Rewrite::Unchanged => continue,
            Rewrite::Skipped(err) => (
                FileOutcome::Skipped {
                    reason: err.to_string(),
                },
                None,
            ),
            Rewrite::Changed { original, text } => {
                let hunk = changed_hunk(&original, &text);
                (apply(file, &text, &hunk, mode)?, Some(hunk))
            }
        };

        match outcome {
            FileOutcome::Changed => diagnostics.files_changed += 1,
            FileOutcome::Declined => diagnostics.files_declined += 1,
            FileOutcome::Skipped { .. } => diagnostics.files_skipped += 1,
            FileOutcome::Unchanged => {}
        }
        reports.push(FileReport {
            path: file.clone(),
            outcome,
            hunk,
        });
    }

    debug!(
        "Batch done: {} scanned, {} changed, {} skipped",
        diagnostics.files_scanned, diagnostics.files_changed, diagnostics.files_skipped
    );

    Ok(BatchResult {
        files: reports,
        diagnostics,
    })
}

fn apply(file: &Path, text: &str, hunk: &Hunk, mode: Mode) -> Result<FileOutcome> {
    match mode {
        Mode::Check => return Ok(FileOutcome::Changed),
        Mode::Interactive => {
            eprintln!("{}", file.display());
            for line in render_hunk(hunk) {
                eprint!("{line}");
            }
            let confirmed = Confirm::new()
                .with_prompt("Apply these changes?")
                .default(true)
                .interact()
                .context("Failed to read confirmation")?;
            if !confirmed {
                return Ok(FileOutcome::Declined);
            }
        }
        Mode::Write => {}
    }

    Ok(match std::fs::write(file, text) {
        Ok(()) => FileOutcome::Changed,
        Err(err) => {
            warn!("Failed to write {}: {}", file.display(), err);
            FileOutcome::Skipped {
                reason: format!("write failed: {err}"),
            }
        }
    })
}

/// Finds the span between the longest common leading and trailing lines.
pub fn changed_hunk(old: &str, new: &str) -> Hunk {
    let old_lines: Vec<&str> = old.split_inclusive('\n').collect();
    let new_lines: Vec<&str> = new.split_inclusive('\n').collect();

    let head = old_lines
        .iter()
        .zip(&new_lines)
        .take_while(|(a, b)| a == b)
        .count();
    let tail = old_lines[head..]
        .iter()
        .rev()
        .zip(new_lines[head..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let owned = |lines: &[&str]| -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    };
    Hunk {
        line: head + 1,
        removed: owned(&old_lines[head..old_lines.len() - tail]),
        added: owned(&new_lines[head..new_lines.len() - tail]),
    }
}

/// Plain `-`/`+` rendering of a hunk, one entry per line.
pub fn render_hunk(hunk: &Hunk) -> Vec<String> {
    let mut out = vec![format!("@@ line {} @@\n", hunk.line)];
    out.extend(hunk.removed.iter().map(|l| format!("-{}", ensure_newline(l))));
    out.extend(hunk.added.iter().map(|l| format!("+{}", ensure_newline(l))));
    out
}

fn ensure_newline(line: &str) -> String {
    if line.ends_with('\n') {
        line.to_string()
    } else {
        format!("{line}\n")
    }
}

/// Runs `cargo fmt` in `dir`.
pub fn run_cargo_fmt(dir: &Path) -> Result<()> {
    let output = Command::new("cargo")
        .arg("fmt")
        .current_dir(dir)
        .output()
        .context("Failed to run cargo fmt")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("cargo fmt failed: {}", stderr.trim());
    }
    Ok(())
}
