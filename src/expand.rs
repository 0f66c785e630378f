//! Bracket-group expansion for `use` paths.
//!
//! Turns shorthand such as `a::{B, C::{D, E}}` into the flat list
//! `a::B`, `a::C::D`, `a::C::E`. Output paths are canonical: segments are
//! trimmed and a trailing `self` is folded into its parent, so `a::{self, b}`
//! expands to `a` and `a::b`, and a lone `self` expands to the empty path.

use crate::error::RewriteError;

/// Deepest bracket nesting accepted before a path is rejected.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Expands every item and concatenates the results, preserving order.
///
/// An empty item denotes the base itself and expands to the empty path.
pub fn expand<S: AsRef<str>>(items: &[S]) -> Result<Vec<String>, RewriteError> {
    let mut paths = Vec::new();
    for item in items {
        paths.extend(expand_item(item.as_ref(), 0)?);
    }
    Ok(paths)
}

fn expand_item(item: &str, depth: usize) -> Result<Vec<String>, RewriteError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(RewriteError::NestingTooDeep {
            limit: MAX_NESTING_DEPTH,
        });
    }

    let item = item.trim();
    let Some(open) = item.find('{') else {
        if item.contains('}') {
            return Err(RewriteError::UnbalancedBraces {
                path: item.to_string(),
            });
        }
        return Ok(vec![canonicalize(item)]);
    };

    let close = matching_brace(item, open).ok_or_else(|| RewriteError::UnbalancedBraces {
        path: item.to_string(),
    })?;

    // A group is either the whole item or hangs off a `::`.
    let head = item[..open].trim_end();
    let prefix = if head.is_empty() {
        ""
    } else {
        head.strip_suffix("::")
            .map(str::trim_end)
            .ok_or_else(|| RewriteError::MalformedPath {
                path: item.to_string(),
            })?
    };
    let tail = &item[close + 1..];

    let pieces = split_top_level(&item[open + 1..close]);
    if pieces.is_empty() {
        return Err(RewriteError::MalformedPath {
            path: item.to_string(),
        });
    }

    let mut expanded = Vec::new();
    for piece in pieces {
        let joined = if prefix.is_empty() {
            format!("{piece}{tail}")
        } else {
            format!("{prefix}::{piece}{tail}")
        };
        expanded.extend(expand_item(&joined, depth + 1)?);
    }
    Ok(expanded)
}

/// Returns the index of the `}` closing the `{` at `open`.
pub(crate) fn matching_brace(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in s[open..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits on commas outside nested groups. Empty pieces (trailing commas) are dropped.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in body.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                pieces.push(body[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    pieces.push(body[start..].trim());
    pieces.retain(|piece| !piece.is_empty());
    pieces
}

fn canonicalize(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let mut segments: Vec<&str> = path.split("::").map(str::trim).collect();
    if segments.last() == Some(&"self") {
        segments.pop();
    }
    segments.join("::")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_one(item: &str) -> Vec<String> {
        expand(&[item]).unwrap()
    }

    #[test]
    fn plain_path_is_unchanged() {
        assert_eq!(expand_one("collections::HashMap"), vec!["collections::HashMap"]);
    }

    #[test]
    fn expands_nested_groups() {
        assert_eq!(
            expand_one("a::b::{C, D::{E, F}}"),
            vec!["a::b::C", "a::b::D::E", "a::b::D::F"]
        );
    }

    #[test]
    fn expands_group_at_start_of_item() {
        assert_eq!(expand_one("{fs, io::Read}"), vec!["fs", "io::Read"]);
    }

    #[test]
    fn folds_self_into_parent() {
        assert_eq!(expand_one("bar::{self, baz}"), vec!["bar", "bar::baz"]);
        assert_eq!(expand_one("{self, x}"), vec!["", "x"]);
        assert_eq!(expand_one("self"), vec![""]);
    }

    #[test]
    fn empty_item_is_self_of_base() {
        assert_eq!(expand(&["", "x"]).unwrap(), vec!["", "x"]);
    }

    #[test]
    fn ignores_trailing_commas_and_newlines() {
        let item = "{\n    fs,\n    io::{self, Write},\n}";
        assert_eq!(expand_one(item), vec!["fs", "io", "io::Write"]);
    }

    #[test]
    fn appends_text_after_group() {
        assert_eq!(expand_one("a::{b, c}::d"), vec!["a::b::d", "a::c::d"]);
    }

    #[test]
    fn rejects_unclosed_group() {
        assert_eq!(
            expand(&["a::{b"]),
            Err(RewriteError::UnbalancedBraces {
                path: "a::{b".to_string()
            })
        );
    }

    #[test]
    fn rejects_stray_closer() {
        assert!(matches!(
            expand(&["a::b}"]),
            Err(RewriteError::UnbalancedBraces { .. })
        ));
    }

    #[test]
    fn rejects_group_without_separator() {
        assert!(matches!(
            expand(&["a{b}"]),
            Err(RewriteError::MalformedPath { .. })
        ));
    }

    #[test]
    fn rejects_empty_group() {
        assert!(matches!(
            expand(&["a::{}"]),
            Err(RewriteError::MalformedPath { .. })
        ));
    }

    #[test]
    fn rejects_nesting_beyond_limit() {
        let mut item = String::from("leaf");
        for _ in 0..MAX_NESTING_DEPTH + 6 {
            item = format!("a::{{{item}}}");
        }
        assert_eq!(
            expand(&[item]),
            Err(RewriteError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH
            })
        );
    }

    #[test]
    fn accepts_nesting_within_limit() {
        let mut item = String::from("leaf");
        for _ in 0..8 {
            item = format!("a::{{{item}}}");
        }
        assert_eq!(expand_one(&item), vec![format!("{}leaf", "a::".repeat(8))]);
    }

    #[test]
    fn matching_brace_skips_nested_groups() {
        let s = "x::{a::{b}, c}";
        assert_eq!(matching_brace(s, 3), Some(s.len() - 1));
        assert_eq!(matching_brace("{a", 0), None);
    }
}
