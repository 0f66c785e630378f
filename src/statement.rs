//! Statement boundary scanner.
//!
//! Splits a source file into three parts:
//!
//! - a prefix of blank lines, comments, shebangs and inner attributes,
//! - the leading run of `use` and `mod name;` statements, each with its
//!   attached outer attributes,
//! - the suffix, which starts at the first line that belongs to neither.
//!
//! Boundaries come from brace balance and the `;` terminator only; this is
//! not a Rust parser. Braces or `//` inside string literals within an import
//! are not recognized.

use crate::error::RewriteError;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static USE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:(pub(?:\s*\([^)]*\))?)\s+)?use\b").expect("valid use regex")
});

static MOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:pub(?:\s*\([^)]*\))?\s+)?mod\s+(?:r#)?[A-Za-z_][A-Za-z0-9_]*\s*;")
        .expect("valid mod regex")
});

static ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\[").expect("valid attribute regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Use,
    Module,
}

/// A statement as it appears in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStatement {
    pub kind: StatementKind,
    /// Outer attribute lines preceding the statement.
    pub attrs: Vec<String>,
    /// Source lines of the statement itself, each ending in `\n`.
    pub lines: Vec<String>,
    /// 1-indexed line of the first attribute or of the statement.
    pub line: usize,
}

impl RawStatement {
    /// Attribute and statement lines in source order.
    pub fn text(&self) -> impl Iterator<Item = &String> {
        self.attrs.iter().chain(&self.lines)
    }

    /// The visibility written before `use`, such as `pub` or `pub(crate)`.
    pub fn visibility(&self) -> Option<&str> {
        let first = self.lines.first()?;
        USE_RE
            .captures(first)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// A file split around its leading statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub prefix: Vec<String>,
    pub statements: Vec<RawStatement>,
    pub suffix: Vec<String>,
}

/// Scans `source`.
///
/// Returns `Ok(None)` when the file does not start (after its prefix) with a
/// `use` statement, a module declaration or an attribute attached to one.
/// A `use` statement without a terminator is an error.
pub fn scan(source: &str) -> Result<Option<ScannedFile>, RewriteError> {
    let lines: Vec<&str> = source.split_inclusive('\n').collect();

    let Some(start) = prefix_end(&lines) else {
        return Ok(None);
    };

    let mut statements = Vec::new();
    let mut cur = start;
    while cur < lines.len() {
        let Some((statement, next)) = collect_statement(&lines, cur)? else {
            break;
        };
        statements.push(statement);
        cur = next;
        while cur < lines.len() && lines[cur].trim().is_empty() {
            cur += 1;
        }
    }

    if statements.is_empty() {
        return Ok(None);
    }

    Ok(Some(ScannedFile {
        prefix: lines[..start].iter().map(|l| l.to_string()).collect(),
        statements,
        suffix: lines[cur..].iter().map(|l| l.to_string()).collect(),
    }))
}

/// Index of the first statement line, or `None` if other code comes first.
fn prefix_end(lines: &[&str]) -> Option<usize> {
    let mut idx = 0;
    let mut in_block_comment = false;

    while idx < lines.len() {
        let line = lines[idx];
        let trimmed = line.trim();

        if in_block_comment {
            in_block_comment = !trimmed.contains("*/");
            idx += 1;
        } else if trimmed.is_empty() || trimmed.starts_with("//") {
            idx += 1;
        } else if let Some(rest) = trimmed.strip_prefix("/*") {
            in_block_comment = !rest.contains("*/");
            idx += 1;
        } else if trimmed.starts_with("#!") {
            idx = if trimmed.starts_with("#![") {
                attribute_end(lines, idx)?
            } else {
                idx + 1
            };
        } else if ATTR_RE.is_match(line) || USE_RE.is_match(line) || MOD_RE.is_match(line) {
            return Some(idx);
        } else {
            return None;
        }
    }

    None
}

/// Exclusive end of the attribute starting at `idx`.
///
/// Returns `None` when code follows the closing `]` on the same line or the
/// brackets never balance.
fn attribute_end(lines: &[&str], idx: usize) -> Option<usize> {
    let mut depth = 0isize;
    for (offset, line) in lines[idx..].iter().enumerate() {
        let code = strip_line_comment(line);
        for (pos, ch) in code.char_indices() {
            match ch {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        return code[pos + 1..]
                            .trim()
                            .is_empty()
                            .then_some(idx + offset + 1);
                    }
                }
                _ => {}
            }
        }
    }
    None
}

fn collect_statement(
    lines: &[&str],
    start: usize,
) -> Result<Option<(RawStatement, usize)>, RewriteError> {
    let mut cur = start;
    let mut attrs = Vec::new();
    while cur < lines.len() && ATTR_RE.is_match(lines[cur]) {
        let Some(end) = attribute_end(lines, cur) else {
            return Ok(None);
        };
        attrs.extend(lines[cur..end].iter().map(|l| with_newline(l)));
        cur = end;
    }
    if cur >= lines.len() {
        return Ok(None);
    }

    let first = lines[cur];
    if MOD_RE.is_match(first) {
        let statement = RawStatement {
            kind: StatementKind::Module,
            attrs,
            lines: vec![with_newline(first)],
            line: start + 1,
        };
        return Ok(Some((statement, cur + 1)));
    }
    if !USE_RE.is_match(first) {
        return Ok(None);
    }

    let use_line = cur + 1;
    let mut code = Vec::new();
    let mut depth = 0isize;
    while cur < lines.len() {
        let line = lines[cur];
        code.push(with_newline(line));
        cur += 1;

        let stripped = strip_line_comment(line);
        depth += brace_delta(&stripped);
        if depth <= 0 && stripped.contains(';') {
            let statement = RawStatement {
                kind: StatementKind::Use,
                attrs,
                lines: code,
                line: start + 1,
            };
            return Ok(Some((statement, cur)));
        }
    }

    Err(RewriteError::UnterminatedStatement { line: use_line })
}

/// Removes a trailing `//` comment from a line.
///
/// Structure written after the marker is restored: closing braces needed to
/// balance braces opened before the comment, and a `;` if the comment has one.
pub(crate) fn strip_line_comment(line: &str) -> Cow<'_, str> {
    let Some(idx) = line.find("//") else {
        return Cow::Borrowed(line);
    };
    let (code, comment) = line.split_at(idx);

    let mut restored = code.trim_end().to_string();
    let open = code.matches('{').count();
    let close = code.matches('}').count();
    if comment.contains('}') && open > close {
        restored.push_str(&"}".repeat(open - close));
    }
    if comment.contains(';') {
        restored.push(';');
    }
    Cow::Owned(restored)
}

fn brace_delta(code: &str) -> isize {
    code.chars().fold(0, |acc, ch| match ch {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

fn with_newline(line: &str) -> String {
    if line.ends_with('\n') {
        line.to_string()
    } else {
        format!("{line}\n")
    }
}
