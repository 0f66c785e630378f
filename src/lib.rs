//! use-groups library for grouping and merging `use` declarations.
//!
//! This library provides programmatic access to the import rewriting
//! performed by the `use-groups` binary. The workflow has three phases:
//!
//! 1. **Discovery**: Collect `.rs` files and build a [`WorkspaceRegistry`] of
//!    crate names from the `Cargo.toml` manifests under the same roots
//! 2. **Classification**: A [`Classifier`] assigns every import path to a
//!    [`Group`]: utility crates, external crates, or the workspace itself
//! 3. **Rewriting**: Each file's leading import block is re-emitted with
//!    sibling imports merged and groups separated by single blank lines
//!
//! # Example
//!
//! ```
//! use use_groups::{Classifier, FileRole, WorkspaceRegistry, process};
//!
//! let registry = WorkspaceRegistry::default();
//! let classifier = Classifier::new(&registry);
//!
//! let source = "use std::sync::Arc;\nuse std::collections::HashMap;\nfn main() {}\n";
//! let output = process(source, FileRole::Regular, &classifier).unwrap();
//!
//! assert_eq!(
//!     output.as_deref(),
//!     Some("use std::{collections::HashMap, sync::Arc};\n\nfn main() {}\n")
//! );
//! ```

pub mod batch;
pub mod classifier;
pub mod cli;
pub mod error;
pub mod expand;
pub mod import;
pub mod registry;
pub mod rewriter;
pub mod scanner;
pub mod section;
pub mod statement;
pub mod tree;

// Re-export commonly used types at crate root
pub use batch::{BatchResult, Diagnostics, FileOutcome, FileReport, Mode};
pub use classifier::{Classifier, Group};
pub use error::{ManifestError, RewriteError};
pub use registry::WorkspaceRegistry;
pub use rewriter::{FileRole, Rewrite, process, rewrite_file};
pub use scanner::ScanOptions;
pub use tree::ImportTree;
