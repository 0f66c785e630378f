//! Rendering of the import block.
//!
//! Statements are partitioned into the three groups, in order. Inside a group,
//! mergeable statements with the same visibility and leading identifier are
//! folded into one line, placed where the first of them stood. Statements that
//! cannot be merged are copied verbatim and keep their relative position: they
//! flush every pending merge before being emitted, so nothing moves across them.

use crate::classifier::Group;
use crate::error::RewriteError;
use crate::expand::expand;
use crate::import::ImportStatement;
use crate::tree::ImportTree;

/// Statements waiting to be merged under one `use base::...` line.
#[derive(Debug)]
struct Bucket<'a> {
    visibility: Option<&'a str>,
    base: &'a str,
    remainders: Vec<&'a str>,
}

/// Renders the whole import section.
///
/// Adjacent non-empty groups are separated by exactly one blank line. No
/// blank line is emitted before the first group or after the last.
pub fn render_section(imports: &[ImportStatement]) -> Result<Vec<String>, RewriteError> {
    let mut rendered = Vec::new();
    for group in Group::ALL {
        let members: Vec<&ImportStatement> =
            imports.iter().filter(|stmt| stmt.group == group).collect();
        let block = render_group(&members)?;
        if block.is_empty() {
            continue;
        }
        if !rendered.is_empty() {
            rendered.push("\n".to_string());
        }
        rendered.extend(block);
    }
    Ok(rendered)
}

fn render_group(statements: &[&ImportStatement]) -> Result<Vec<String>, RewriteError> {
    let mut output = Vec::new();
    let mut pending: Vec<Bucket<'_>> = Vec::new();

    for stmt in statements {
        let Some(parts) = &stmt.merge else {
            flush(&mut pending, &mut output)?;
            output.extend(stmt.lines.iter().cloned());
            continue;
        };

        let visibility = stmt.visibility.as_deref();
        match pending
            .iter_mut()
            .find(|b| b.visibility == visibility && b.base == parts.base)
        {
            Some(bucket) => bucket.remainders.push(&parts.remainder),
            None => pending.push(Bucket {
                visibility,
                base: &parts.base,
                remainders: vec![&parts.remainder],
            }),
        }
    }
    flush(&mut pending, &mut output)?;

    Ok(output)
}

fn flush(pending: &mut Vec<Bucket<'_>>, output: &mut Vec<String>) -> Result<(), RewriteError> {
    for bucket in pending.drain(..) {
        output.push(merge_bucket(&bucket)?);
    }
    Ok(())
}

/// Builds the single `use` line for a bucket.
///
/// The longest segment prefix shared by every expanded path is moved into the
/// base, which keeps the bracket nesting as shallow as possible.
fn merge_bucket(bucket: &Bucket<'_>) -> Result<String, RewriteError> {
    let paths = expand(&bucket.remainders)?;
    let shared = common_prefix(&paths);

    let mut base = bucket.base.to_string();
    for segment in &shared {
        base.push_str("::");
        base.push_str(segment);
    }
    let stripped: Vec<String> = paths
        .iter()
        .map(|path| strip_segments(path, shared.len()))
        .collect();

    let tree = ImportTree::from_paths(&stripped).to_string();
    let visibility = bucket
        .visibility
        .map(|v| format!("{v} "))
        .unwrap_or_default();

    Ok(if tree.is_empty() {
        format!("{visibility}use {base};\n")
    } else {
        format!("{visibility}use {base}::{tree};\n")
    })
}

/// Longest run of leading segments shared by all paths.
///
/// A single path shares everything but its last segment. Any empty path (a
/// self import of the base) means nothing can be shared.
fn common_prefix(paths: &[String]) -> Vec<&str> {
    let split: Vec<Vec<&str>> = paths
        .iter()
        .map(|p| {
            if p.is_empty() {
                Vec::new()
            } else {
                p.split("::").collect()
            }
        })
        .collect();

    if split.is_empty() || split.iter().any(Vec::is_empty) {
        return Vec::new();
    }
    if let [only] = split.as_slice() {
        return only[..only.len() - 1].to_vec();
    }

    let first = &split[0];
    let shortest = split.iter().map(Vec::len).min().unwrap_or(0);
    let shared = (0..shortest)
        .take_while(|&i| split.iter().all(|segments| segments[i] == first[i]))
        .count();
    first[..shared].to_vec()
}

fn strip_segments(path: &str, count: usize) -> String {
    if count == 0 {
        return path.to_string();
    }
    path.split("::").skip(count).collect::<Vec<_>>().join("::")
}
