//! `use` statements prepared for grouping and merging.

use crate::classifier::{Classifier, Group, leading_ident};
use crate::statement::{RawStatement, strip_line_comment};
use regex::Regex;
use std::sync::LazyLock;

static PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\buse\s+([^;]+);").expect("valid use path regex"));

static ALIAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bas\b").expect("valid alias regex"));

/// A `use` path split at its leading identifier, e.g. `std` + `sync::Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeParts {
    pub base: String,
    /// Everything after `base::`; empty when the path is just `base`.
    pub remainder: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    /// Original attribute and statement lines.
    pub lines: Vec<String>,
    /// The path between `use` and `;`, comments removed and lines joined.
    pub path: Option<String>,
    pub visibility: Option<String>,
    pub group: Group,
    pub has_attrs: bool,
    /// Present only when the statement may be folded into a merged line.
    pub merge: Option<MergeParts>,
}

impl ImportStatement {
    pub fn from_raw(raw: &RawStatement, classifier: &Classifier<'_>) -> Self {
        let joined = raw
            .lines
            .iter()
            .map(|line| strip_line_comment(line).trim().to_string())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let captures = PATH_RE.captures(&joined);
        let path = captures
            .as_ref()
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string());
        let single = captures
            .as_ref()
            .and_then(|c| c.get(0))
            .is_some_and(|m| joined[m.end()..].trim().is_empty());

        let has_attrs = !raw.attrs.is_empty();
        let has_comment = raw.lines.iter().any(|l| l.contains("//") || l.contains("/*"));
        let group = classifier.classify(path.as_deref().unwrap_or_default());

        let merge = match &path {
            Some(path) if single && !has_attrs && !has_comment => merge_parts(path),
            _ => None,
        };

        Self {
            lines: raw.text().cloned().collect(),
            path,
            visibility: raw.visibility().map(str::to_string),
            group,
            has_attrs,
            merge,
        }
    }

    pub fn is_mergeable(&self) -> bool {
        self.merge.is_some()
    }
}

/// Splits a path at its leading identifier.
///
/// Glob imports, `as` renames and paths starting with `::` are never split,
/// which keeps them out of merged lines.
fn merge_parts(path: &str) -> Option<MergeParts> {
    if path.contains('*') || ALIAS_RE.is_match(path) || path.starts_with("::") {
        return None;
    }
    let base = leading_ident(path)?;
    let rest = &path[base.len()..];
    let remainder = if rest.is_empty() {
        ""
    } else {
        rest.strip_prefix("::")?
    };
    Some(MergeParts {
        base: base.to_string(),
        remainder: remainder.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::WorkspaceRegistry;
    use crate::statement::scan;

    fn imports(source: &str) -> Vec<ImportStatement> {
        let registry = WorkspaceRegistry::default();
        let classifier = Classifier::new(&registry);
        scan(source)
            .unwrap()
            .unwrap()
            .statements
            .iter()
            .map(|raw| ImportStatement::from_raw(raw, &classifier))
            .collect()
    }

    fn parts(base: &str, remainder: &str) -> Option<MergeParts> {
        Some(MergeParts {
            base: base.to_string(),
            remainder: remainder.to_string(),
        })
    }

    #[test]
    fn simple_path_is_mergeable() {
        let stmt = &imports("use std::sync::Arc;\n")[0];
        assert_eq!(stmt.path.as_deref(), Some("std::sync::Arc"));
        assert_eq!(stmt.group, Group::Utility);
        assert_eq!(stmt.merge, parts("std", "sync::Arc"));
        assert!(stmt.is_mergeable());
    }

    #[test]
    fn multi_line_path_is_joined() {
        let stmt = &imports("pub use crate::{\n    a,\n    b::C,\n};\n")[0];
        assert_eq!(stmt.path.as_deref(), Some("crate::{ a, b::C, }"));
        assert_eq!(stmt.visibility.as_deref(), Some("pub"));
        assert_eq!(stmt.group, Group::Workspace);
        assert_eq!(stmt.merge, parts("crate", "{ a, b::C, }"));
    }

    #[test]
    fn bare_crate_import_has_empty_remainder() {
        let stmt = &imports("use serde;\n")[0];
        assert_eq!(stmt.merge, parts("serde", ""));
    }

    #[test]
    fn non_mergeable_forms() {
        let stmts = imports(
            "use std::io::*;\nuse std::fmt::Result as FmtResult;\n#[cfg(unix)]\nuse std::os::unix;\nuse std::fs; // files\nuse ::log::info;\nuse std::env; use std::path;\n",
        );
        assert_eq!(stmts.len(), 6);
        for stmt in &stmts {
            assert!(!stmt.is_mergeable(), "{:?} should pass through", stmt.lines);
        }
        assert!(stmts[2].has_attrs);
        assert_eq!(stmts[2].lines, vec!["#[cfg(unix)]\n", "use std::os::unix;\n"]);
    }

    #[test]
    fn alias_detection_matches_whole_word_only() {
        assert_eq!(merge_parts("gas::assets"), parts("gas", "assets"));
        assert_eq!(merge_parts("std::fmt::Write as _"), None);
    }

    #[test]
    fn raw_identifier_base_is_not_split() {
        assert_eq!(merge_parts("r#async::x"), None);
    }
}
