//! Per-file rewriting.
//!
//! Combines the statement scanner and section renderer into the final file
//! text. Module declarations go ahead of the import section, separated by a
//! single blank line, and the file keeps the line ending it was written with.

use crate::classifier::Classifier;
use crate::error::RewriteError;
use crate::import::ImportStatement;
use crate::section::render_section;
use crate::statement::{StatementKind, scan};
use anyhow::{Context, Result};
use log::debug;
use std::borrow::Cow;
use std::path::Path;

const ENTRY_POINTS: [&str; 3] = ["main.rs", "lib.rs", "mod.rs"];

/// What a file is for, decided from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    /// `main.rs`, `lib.rs` or `mod.rs`: every module declaration must precede
    /// the first import.
    EntryPoint,
    /// Any other file: statements that are not imports stay ahead of the
    /// import section.
    Regular,
}

impl FileRole {
    pub fn for_path(path: &Path) -> Self {
        let is_entry = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| ENTRY_POINTS.contains(&name));
        if is_entry {
            FileRole::EntryPoint
        } else {
            FileRole::Regular
        }
    }
}

/// Result of rewriting one file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    Unchanged,
    Changed { original: String, text: String },
    /// The file could not be processed and is left alone.
    Skipped(RewriteError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    /// The ending of the first line decides for the whole file.
    fn detect(source: &str) -> Self {
        match source.split_inclusive('\n').next() {
            Some(line) if line.ends_with("\r\n") => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }

    fn normalize(self, source: &str) -> Cow<'_, str> {
        match self {
            LineEnding::Lf => Cow::Borrowed(source),
            LineEnding::CrLf => Cow::Owned(source.replace("\r\n", "\n")),
        }
    }

    fn restore(self, text: String) -> String {
        match self {
            LineEnding::Lf => text,
            LineEnding::CrLf => text.replace('\n', "\r\n"),
        }
    }
}

/// Rewrites the import block of `source`.
///
/// Returns `Ok(None)` when the file is ineligible, has no `use` statement, or
/// is already in canonical form. CRLF files are rewritten with CRLF endings
/// throughout.
pub fn process(
    source: &str,
    role: FileRole,
    classifier: &Classifier<'_>,
) -> Result<Option<String>, RewriteError> {
    let ending = LineEnding::detect(source);
    let Some(file) = scan(&ending.normalize(source))? else {
        return Ok(None);
    };

    let (modules, uses): (Vec<_>, Vec<_>) = file
        .statements
        .iter()
        .partition(|stmt| stmt.kind == StatementKind::Module);
    if uses.is_empty() {
        return Ok(None);
    }

    let imports: Vec<ImportStatement> = uses
        .iter()
        .map(|raw| ImportStatement::from_raw(raw, classifier))
        .collect();
    let section = render_section(&imports)?;
    let module_lines: Vec<String> = modules.iter().flat_map(|m| m.text().cloned()).collect();

    let mut lines = file.prefix;
    match role {
        FileRole::EntryPoint | FileRole::Regular => {
            if !module_lines.is_empty() {
                lines.extend(module_lines);
                push_blank(&mut lines);
            }
            lines.extend(section);
        }
    }
    if !file.suffix.is_empty() {
        push_blank(&mut lines);
        lines.extend(file.suffix);
    }

    let mut text = lines.concat();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    let text = ending.restore(text);
    Ok((text != source).then_some(text))
}

/// Reads `path` and rewrites it in memory, choosing the role from its name.
///
/// Read failures (including non-UTF-8 content) are errors; problems with the
/// import block itself are reported as [`Rewrite::Skipped`].
pub fn rewrite_file(path: &Path, classifier: &Classifier<'_>) -> Result<Rewrite> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let role = FileRole::for_path(path);

    Ok(match process(&source, role, classifier) {
        Ok(Some(text)) => {
            debug!("{}: import block rewritten ({:?})", path.display(), role);
            Rewrite::Changed {
                original: source,
                text,
            }
        }
        Ok(None) => Rewrite::Unchanged,
        Err(err) => {
            debug!("{}: skipped: {}", path.display(), err);
            Rewrite::Skipped(err)
        }
    })
}

fn push_blank(lines: &mut Vec<String>) {
    if lines.last().is_some_and(|l| !l.trim().is_empty()) {
        lines.push("\n".to_string());
    }
}
