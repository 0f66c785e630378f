//! Recoverable failures.
//!
//! Both enums describe problems that are handled locally: a [`RewriteError`]
//! skips a single file, a [`ManifestError`] drops a single manifest from the
//! registry. Anything else travels as `anyhow::Error` and ends the run.

use std::path::PathBuf;
use thiserror::Error;

/// Why a file could not be rewritten.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RewriteError {
    #[error("`use` statement starting at line {line} has no terminating `;`")]
    UnterminatedStatement { line: usize },

    #[error("import nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },

    #[error("unbalanced braces in import path `{path}`")]
    UnbalancedBraces { path: String },

    #[error("malformed import path `{path}`")]
    MalformedPath { path: String },
}

/// Why a `Cargo.toml` did not contribute to the registry.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
