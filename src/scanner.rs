//! Source tree walker.
//!
//! Recursively collects `.rs` files and `Cargo.toml` manifests. By default
//! hidden entries (names starting with `.`) and `target` build directories are
//! skipped; user-supplied glob patterns exclude further entries by name or by
//! path relative to the scanned root.

use anyhow::{Context, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Name of the package manifest feeding the workspace registry.
pub const MANIFEST_NAME: &str = "Cargo.toml";

/// Which entries the walker skips.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    excludes: Vec<Pattern>,
    default_excludes: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            excludes: Vec::new(),
            default_excludes: true,
        }
    }
}

impl ScanOptions {
    /// Compiles `exclude` glob patterns. Fails on an invalid pattern.
    pub fn new(exclude: &[String], default_excludes: bool) -> Result<Self> {
        let excludes = exclude
            .iter()
            .map(|p| Pattern::new(p).with_context(|| format!("Invalid exclude pattern '{}'", p)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            excludes,
            default_excludes,
        })
    }

    fn is_excluded(&self, entry: &DirEntry, root: &Path) -> bool {
        // Never filter the root itself, even when it is `.`.
        if entry.depth() == 0 {
            return false;
        }

        let name = entry.file_name().to_string_lossy();
        if self.default_excludes && (name.starts_with('.') || name == "target") {
            return true;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        self.excludes
            .iter()
            .any(|p| p.matches(&name) || p.matches_path(relative))
    }
}

/// Collects all `.rs` files under `paths`, sorted by path within each root.
pub fn collect_rust_files(paths: &[PathBuf], options: &ScanOptions) -> Result<Vec<PathBuf>> {
    collect(paths, options, |path| {
        path.extension().is_some_and(|ext| ext == "rs")
    })
}

/// Collects every `Cargo.toml` under `paths`.
pub fn collect_manifests(paths: &[PathBuf], options: &ScanOptions) -> Result<Vec<PathBuf>> {
    collect(paths, options, |path| {
        path.file_name().is_some_and(|name| name == MANIFEST_NAME)
    })
}

fn collect(
    paths: &[PathBuf],
    options: &ScanOptions,
    keep: impl Fn(&Path) -> bool,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for root in paths {
        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !options.is_excluded(e, root))
        {
            let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
            if entry.file_type().is_file() && keep(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }

    Ok(files)
}
